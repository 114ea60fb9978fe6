use thiserror::Error;

/// Errors surfaced by service adapters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Transcription request failed: {0}")]
    Transcription(String),
    #[error("Transcript download failed: {0}")]
    TranscriptFetch(String),
    #[error("Sentiment detection failed: {0}")]
    Sentiment(String),
    #[error("Storage failed: {0}")]
    Storage(String),
    #[error("Notification failed: {0}")]
    Notification(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        assert_eq!(
            ServiceError::Storage("Table not found".to_string()).to_string(),
            "Storage failed: Table not found"
        );
        assert_eq!(
            ServiceError::InvalidResponse("missing job".to_string()).to_string(),
            "Invalid response: missing job"
        );
    }
}
