//! Error types for the backend client.

use shopscout_core::error::ShopscoutError;

/// Errors from talking to the catalog backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error("could not decode {endpoint} response: {reason}")]
    Decode {
        endpoint: &'static str,
        reason: String,
    },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<ClientError> for ShopscoutError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::InvalidBaseUrl(url) => {
                ShopscoutError::Config(format!("invalid base URL: {}", url))
            }
            other => ShopscoutError::Backend(other.to_string()),
        }
    }
}
