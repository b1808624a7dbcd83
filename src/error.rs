//! Error types shared by the ingestion and query services

use thiserror::Error;

use crate::event_store::StoreError;

/// Result type for service operations
pub type FlowWatchResult<T> = Result<T, FlowWatchError>;

/// Every way a request against the services can be rejected
#[derive(Debug, Error)]
pub enum FlowWatchError {
    /// Missing or wrong ingestion token, or no token configured at all
    #[error("invalid token")]
    Unauthorized,
    /// Malformed ingestion body
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("event {0} not found")]
    NotFound(u64),
    /// Opaque infrastructure failure; the request had no side effects
    #[error("store failure: {0}")]
    Store(StoreError),
}

impl From<StoreError> for FlowWatchError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => FlowWatchError::NotFound(id),
            other => FlowWatchError::Store(other),
        }
    }
}

impl FlowWatchError {
    pub fn validation(message: impl Into<String>) -> Self {
        FlowWatchError::Validation(message.into())
    }

    /// Stable machine-readable code used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            FlowWatchError::Unauthorized => "UNAUTHORIZED",
            FlowWatchError::Validation(_) => "VALIDATION_ERROR",
            FlowWatchError::NotFound(_) => "NOT_FOUND",
            FlowWatchError::Store(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            FlowWatchError::Unauthorized,
            FlowWatchError::validation("error_message is required"),
            FlowWatchError::NotFound(3),
            FlowWatchError::Store(StoreError::Corrupted("bad line".to_string())),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err: FlowWatchError = StoreError::NotFound(8).into();
        assert!(matches!(err, FlowWatchError::NotFound(8)));

        let err: FlowWatchError = StoreError::Corrupted("x".to_string()).into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(FlowWatchError::NotFound(42).to_string(), "event 42 not found");
        assert_eq!(
            FlowWatchError::validation("error_message must not be empty").to_string(),
            "validation failed: error_message must not be empty"
        );
    }
}
