use elbmon_common::types::CheckOutcome;

/// Name shown in the status line.
pub const CHECK_NAME: &str = "ELBMetrics";

/// Status line in the `<check> <STATUS>: <message>` form monitoring
/// agents expect.
///
/// # Examples
///
/// ```
/// use elbmon::report::status_line;
/// use elbmon_common::types::CheckOutcome;
///
/// let line = status_line(&CheckOutcome::critical("Error: boom"));
/// assert_eq!(line, "ELBMetrics CRITICAL: Error: boom");
/// ```
pub fn status_line(outcome: &CheckOutcome) -> String {
    if outcome.message.is_empty() {
        format!("{CHECK_NAME} {}", outcome.status)
    } else {
        format!("{CHECK_NAME} {}: {}", outcome.status, outcome.message)
    }
}

/// Write the status line to stderr; stdout may be carrying metric lines.
#[allow(clippy::print_stderr)]
pub fn print_status(outcome: &CheckOutcome) {
    eprintln!("{}", status_line(outcome));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_line_carries_message() {
        let line = status_line(&CheckOutcome::ok("2 metric records emitted"));
        assert_eq!(line, "ELBMetrics OK: 2 metric records emitted");
    }

    #[test]
    fn empty_message_has_no_separator() {
        assert_eq!(status_line(&CheckOutcome::ok("")), "ELBMetrics OK");
    }
}
