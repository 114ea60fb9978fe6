use thiserror::Error;

/// Errors raised while interpreting sentiment labels.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SentimentError {
    #[error("Unknown sentiment label: {0}")]
    UnknownLabel(String),
}
