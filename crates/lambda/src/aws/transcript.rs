use async_trait::async_trait;

use tonewatch_core::services::{Result, ServiceError, TranscriptSource};
use tonewatch_core::transcription::TranscriptDocument;

/// Downloads transcript documents from the pre-signed URI Transcribe returns.
pub struct HttpTranscriptSource {
    client: reqwest::Client,
}

impl HttpTranscriptSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TranscriptSource for HttpTranscriptSource {
    async fn fetch(&self, uri: &str) -> Result<TranscriptDocument> {
        let response = self
            .client
            .get(uri)
            .send()
            .await
            .map_err(|e| ServiceError::TranscriptFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::TranscriptFetch(format!(
                "transcript request returned {}",
                response.status()
            )));
        }

        response
            .json::<TranscriptDocument>()
            .await
            .map_err(|e| ServiceError::InvalidResponse(format!("Invalid transcript document: {e}")))
    }
}
