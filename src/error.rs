use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewsError {
    #[error("Decode error: {0}")]
    DecodeError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Timed out after {0}ms")]
    Timeout(u64),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ViewsError {
    /// Errors that stop a whole run, as opposed to a single view.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ViewsError::DecodeError(_) | ViewsError::ConfigError(_))
    }
}

pub type Result<T> = std::result::Result<T, ViewsError>;
