//! Delivery of flat metric records to a time-series store.
//!
//! Records are encoded with the Graphite plaintext protocol and written to
//! a [`MetricSink`]: standard output, a carbon TCP listener, or memory.

pub mod error;
pub mod graphite;
pub mod sinks;


use async_trait::async_trait;
use elbmon_common::types::OutputRecord;

/// Destination for emitted records.
///
/// One `write` call per record; `flush` is called once at the end of a run.
#[async_trait]
pub trait MetricSink: Send {
    /// Writes a single record.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport fails.
    async fn write(&mut self, record: &OutputRecord) -> error::Result<()>;

    /// Pushes out anything buffered.
    async fn flush(&mut self) -> error::Result<()>;

    /// Returns the sink type name (e.g., `"stdout"`, `"tcp"`).
    fn sink_name(&self) -> &str;
}

/// Build a sink from a target string: `stdout`, `-`, or `tcp://host:port`.
///
/// # Errors
///
/// Returns [`error::OutputError::InvalidTarget`] for anything else, or an
/// I/O error if the TCP connection cannot be established.
pub async fn build_sink(target: &str) -> error::Result<Box<dyn MetricSink>> {
    let target = target.trim();
    match target {
        "stdout" | "-" | "" => Ok(Box::new(sinks::WriterSink::stdout())),
        _ => match target.strip_prefix("tcp://") {
            Some(addr) if !addr.is_empty() => Ok(Box::new(sinks::TcpSink::connect(addr).await?)),
            _ => Err(error::OutputError::InvalidTarget(target.to_string())),
        },
    }
}
