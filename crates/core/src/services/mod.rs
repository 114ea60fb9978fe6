//! Contracts for the managed services the event handler calls.

mod error;
mod traits;

pub use error::{Result, ServiceError};
pub use traits::{AlertPublisher, SentimentDetector, SentimentStore, TranscriptSource, Transcriber};
