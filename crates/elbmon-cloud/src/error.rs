/// Errors that can occur when talking to the load-balancer or metric APIs.
///
/// # Examples
///
/// ```rust
/// use elbmon_cloud::error::CloudProviderError;
///
/// let err = CloudProviderError::UnknownMetric("Bandwidth".to_string());
/// assert!(err.to_string().contains("Bandwidth"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum CloudProviderError {
    /// Non-2xx status whose body is not a recognisable error document.
    #[error("{service} API HTTP error: status={status}, body={body}")]
    HttpError {
        service: String,
        status: u16,
        body: String,
    },

    /// The API answered with an error document.
    #[error("{service} API error: code={code}, message={message}")]
    ApiResponseError {
        service: String,
        code: String,
        message: String,
    },

    /// Request was throttled by the provider. Not retried here.
    #[error("{service} API rate limited: {message}")]
    RateLimited { service: String, message: String },

    /// HMAC signing failed (invalid key length).
    #[error("HMAC signing error: {0}")]
    HmacError(String),

    /// An underlying HTTP transport error from `reqwest`.
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The response body could not be decoded as the expected XML document.
    #[error("XML decode error: {0}")]
    XmlError(#[from] quick_xml::DeError),

    /// A decoded response carried a value that could not be interpreted.
    #[error("Malformed {service} response: {detail}")]
    MalformedResponse { service: String, detail: String },

    /// Metric name outside the supported load-balancer metric set.
    #[error("Unknown load balancer metric: {0}")]
    UnknownMetric(String),

    /// The requested provider type is not registered.
    #[error("Unsupported cloud provider: {0}")]
    UnsupportedProvider(String),

    /// Account configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias so callers can write `error::Result<T>`.
pub type Result<T> = std::result::Result<T, CloudProviderError>;
