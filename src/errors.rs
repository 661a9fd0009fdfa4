use thiserror::Error;

/// A document retrieval failure recorded for a single register when the
/// client runs with [`ErrorPolicy::Continue`](crate::config::ErrorPolicy::Continue).
#[derive(Debug)]
pub struct RegisterFailure {
    /// Registration id of the register whose documents could not be fetched
    pub registration_id: String,
    /// The error returned by the documents endpoint
    pub error: AppError,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Network request failed (connection, TLS, timeout)
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Upstream answered with a non-success HTTP status
    #[error("Upstream error: {endpoint} returned HTTP {status}")]
    UpstreamStatus { endpoint: String, status: u16 },
    /// Failed to parse an upstream JSON body or a local config file
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    UrlError(String),
    /// Invalid input format
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
    /// One or more registers failed while the client kept going
    #[error("{} register(s) failed: {}", .0.len(), summarize_failures(.0))]
    RegisterFailures(Vec<RegisterFailure>),
}

fn summarize_failures(failures: &[RegisterFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.registration_id, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

// Conversion implementations for common errors
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::UrlError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::ParseError(format!("Failed to parse config: {err}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;
