//! Core error types.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building holiday spans from calendar events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An event had a malformed date or an empty/inverted date range.
    #[error("invalid event data: {reason}")]
    InvalidEventData { reason: String },
}

impl CoreError {
    /// Creates an invalid event data error.
    pub fn invalid_event_data(reason: impl Into<String>) -> Self {
        Self::InvalidEventData {
            reason: reason.into(),
        }
    }
}
