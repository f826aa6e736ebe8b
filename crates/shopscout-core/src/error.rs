use thiserror::Error;

/// Top-level error type for the Shopscout workspace.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for ShopscoutError` so that `?` works across
/// crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShopscoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

impl From<toml::de::Error> for ShopscoutError {
    fn from(err: toml::de::Error) -> Self {
        ShopscoutError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ShopscoutError {
    fn from(err: toml::ser::Error) -> Self {
        ShopscoutError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ShopscoutError {
    fn from(err: serde_json::Error) -> Self {
        ShopscoutError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Shopscout operations.
pub type Result<T> = std::result::Result<T, ShopscoutError>;
