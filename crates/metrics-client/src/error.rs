use metrics_core::MetricsError;
use thiserror::Error;

const USER_MESSAGE: &str = "There was an error retrieving data. Please try again.";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid ticker: {0:?}")]
    InvalidTicker(String),

    #[error("Invalid base URL: {0:?}")]
    InvalidBaseUrl(String),

    /// The request never completed (DNS, connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Status: {status}, Message: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::HttpStatus { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Message suitable for showing to a user. The detail goes on a second line so
    /// nothing is lost when it ends up in a log.
    pub fn user_message(&self) -> String {
        format!("{} \n{}", USER_MESSAGE, self)
    }
}

impl From<ClientError> for MetricsError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::InvalidTicker(t) => MetricsError::InvalidTicker(t),
            other => MetricsError::Source {
                message: other.user_message(),
                status: other.status(),
            },
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
