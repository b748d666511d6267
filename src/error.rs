use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WrappedError {
    #[error("GitHub user not found: {0}")]
    NotFound(String),

    #[error("GitHub API error: {0}")]
    UpstreamError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl WrappedError {
    /// Whether the error means the requested account does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WrappedError::NotFound(_))
    }
}

/// Recovers an owned error from one shared between concurrent loads of the
/// same username. Transport errors cannot be cloned, so extra holders get
/// their message as an upstream error.
impl From<Arc<WrappedError>> for WrappedError {
    fn from(shared: Arc<WrappedError>) -> Self {
        match Arc::try_unwrap(shared) {
            Ok(owned) => owned,
            Err(shared) => match shared.as_ref() {
                WrappedError::NotFound(m) => WrappedError::NotFound(m.clone()),
                WrappedError::UpstreamError(m) => WrappedError::UpstreamError(m.clone()),
                WrappedError::RateLimitExceeded(m) => WrappedError::RateLimitExceeded(m.clone()),
                WrappedError::InvalidUsername(m) => WrappedError::InvalidUsername(m.clone()),
                WrappedError::ConfigError(m) => WrappedError::ConfigError(m.clone()),
                WrappedError::NetworkError(e) => WrappedError::UpstreamError(e.to_string()),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, WrappedError>;
