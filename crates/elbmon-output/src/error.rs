/// Errors raised while delivering records.
///
/// # Examples
///
/// ```rust
/// use elbmon_output::error::OutputError;
///
/// let err = OutputError::InvalidTarget("udp://carbon:2003".to_string());
/// assert!(err.to_string().contains("udp://carbon:2003"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// The output target string is not a supported form.
    #[error("Output: unsupported target '{0}' (expected 'stdout' or 'tcp://host:port')")]
    InvalidTarget(String),

    /// Writing to or connecting to the destination failed.
    #[error("Output: I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` alias for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
