use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Table not configured for reconciliation: {0}")]
    NotConfigured(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Batch too large: {size} queries submitted, at most {max} allowed")]
    BatchTooLarge { size: usize, max: usize },

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was caused by the caller rather than the service
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::NotConfigured(_) | Error::BadRequest(_) | Error::BatchTooLarge { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::BadRequest(e.to_string())
    }
}
