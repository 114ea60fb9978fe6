use async_trait::async_trait;

use crate::sentiment::{Sentiment, SentimentRecord};
use crate::transcription::{JobSnapshot, TranscriptDocument, TranscriptionRequest};

use super::Result;

/// Batch speech-to-text jobs.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Starts an asynchronous transcription job.
    async fn start_job(&self, request: &TranscriptionRequest) -> Result<()>;

    /// Reads the current state of a job.
    async fn job_snapshot(&self, job_name: &str) -> Result<JobSnapshot>;
}

/// Downloads the transcript document a finished job produced.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<TranscriptDocument>;
}

/// Classifies the overall sentiment of a piece of text.
#[async_trait]
pub trait SentimentDetector: Send + Sync {
    async fn detect(&self, text: &str, language_code: &str) -> Result<Sentiment>;
}

/// Persists sentiment results.
#[async_trait]
pub trait SentimentStore: Send + Sync {
    /// Writes the record, replacing any earlier result for the same file.
    async fn put_record(&self, record: &SentimentRecord) -> Result<()>;
}

/// Sends alerts for alerting sentiments.
#[async_trait]
pub trait AlertPublisher: Send + Sync {
    /// Sends `message` as an SMS to `phone_number`.
    async fn publish(&self, phone_number: &str, message: &str) -> Result<()>;
}
