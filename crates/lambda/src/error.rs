//! Errors for processing a single uploaded object.

use thiserror::Error;

use tonewatch_core::event::EventError;
use tonewatch_core::services::ServiceError;

/// Errors that end the processing of one object.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Transcription job '{job}' failed: {reason}")]
    TranscriptionFailed { job: String, reason: String },

    #[error("Transcription job '{job}' did not finish after {attempts} status checks")]
    PollLimitExceeded { job: String, attempts: u32 },

    #[error("Transcription job '{0}' completed without a transcript location")]
    MissingTranscriptUri(String),

    #[error("Transcript for job '{0}' contains no transcripts")]
    EmptyTranscriptDocument(String),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcription_failed_display() {
        let error = PipelineError::TranscriptionFailed {
            job: "req-0".to_string(),
            reason: "Unsupported media".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transcription job 'req-0' failed: Unsupported media"
        );
    }

    #[test]
    fn test_service_error_is_transparent() {
        let error = PipelineError::from(ServiceError::Notification("throttled".to_string()));
        assert_eq!(error.to_string(), "Notification failed: throttled");
    }
}
