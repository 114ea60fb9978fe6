use async_trait::async_trait;
use aws_sdk_comprehend::types::LanguageCode;
use aws_sdk_comprehend::Client;

use tonewatch_core::sentiment::Sentiment;
use tonewatch_core::services::{Result, SentimentDetector, ServiceError};

/// Amazon Comprehend sentiment detection.
pub struct AwsSentimentDetector {
    client: Client,
}

impl AwsSentimentDetector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SentimentDetector for AwsSentimentDetector {
    async fn detect(&self, text: &str, language_code: &str) -> Result<Sentiment> {
        let output = self
            .client
            .detect_sentiment()
            .text(text)
            .language_code(LanguageCode::from(language_code))
            .send()
            .await
            .map_err(|e| {
                ServiceError::Sentiment(format!(
                    "DetectSentiment failed: {}",
                    e.into_service_error()
                ))
            })?;

        let label = output.sentiment().ok_or_else(|| {
            ServiceError::InvalidResponse("DetectSentiment returned no sentiment".to_string())
        })?;

        label
            .as_str()
            .parse::<Sentiment>()
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))
    }
}
