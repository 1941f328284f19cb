//! Client error types.

use phstatus_core::CoreError;
use phstatus_providers::ProviderError;
use thiserror::Error;

use crate::secret::SecretError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A secret reference could not be resolved.
    #[error("configuration error: {0}")]
    Secret(#[from] SecretError),

    /// Malformed event data reached the merge step.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An event source, status sink or notifier failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
