use thiserror::Error;

/// Errors that can occur while decoding queue messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("SQS record {index} is malformed: {reason}")]
    InvalidRecord { index: usize, reason: String },
    #[error("SQS record {index} has no body")]
    MissingBody { index: usize },
    #[error("SQS record {index} body is not an S3 notification: {reason}")]
    InvalidBody { index: usize, reason: String },
    #[error("S3 record is missing the {0}")]
    MissingField(&'static str),
    #[error("Object key is not valid UTF-8 after decoding: {0}")]
    InvalidKey(String),
}

/// Result type for event decoding.
pub type Result<T> = std::result::Result<T, EventError>;
