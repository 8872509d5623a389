use elbmon_common::types::OutputRecord;

/// Encode a record as one Graphite plaintext line: `path value timestamp\n`.
///
/// # Examples
///
/// ```
/// use elbmon_common::types::OutputRecord;
/// use elbmon_output::graphite::encode_line;
///
/// let record = OutputRecord::new("prod.app-lb.latency", 12.5, 1000);
/// assert_eq!(encode_line(&record), "prod.app-lb.latency 12.5 1000\n");
/// ```
pub fn encode_line(record: &OutputRecord) -> String {
    format!("{} {} {}\n", record.path, record.value, record.timestamp)
}
