use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Invalid ticker: {0:?}")]
    InvalidTicker(String),

    /// A metrics source failed. `status` is kept when the failure came from an HTTP response.
    #[error("{message}")]
    Source {
        message: String,
        status: Option<u16>,
    },
}

impl MetricsError {
    pub fn source(message: impl Into<String>) -> Self {
        MetricsError::Source {
            message: message.into(),
            status: None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            MetricsError::Source { status, .. } => *status,
            MetricsError::InvalidTicker(_) => None,
        }
    }
}
