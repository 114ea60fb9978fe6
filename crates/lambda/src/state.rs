//! Shared handler state.
//!
//! Built once per cold start and borrowed by every invocation. Services are
//! trait objects so the pipeline can run against in-memory fakes in tests.

use std::sync::Arc;

use tonewatch_core::services::{
    AlertPublisher, SentimentDetector, SentimentStore, TranscriptSource, Transcriber,
};

use crate::aws::{
    AwsAlertPublisher, AwsSentimentDetector, AwsTranscriber, DynamoDbSentimentStore,
    HttpTranscriptSource,
};
use crate::config::Config;

#[derive(Clone)]
pub struct HandlerState {
    pub config: Config,
    pub transcriber: Arc<dyn Transcriber>,
    pub transcripts: Arc<dyn TranscriptSource>,
    pub detector: Arc<dyn SentimentDetector>,
    pub store: Arc<dyn SentimentStore>,
    pub alerts: Arc<dyn AlertPublisher>,
}

impl HandlerState {
    /// Creates the state backed by the AWS services.
    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig, config: Config) -> Self {
        let store = DynamoDbSentimentStore::new(
            aws_sdk_dynamodb::Client::new(sdk_config),
            config.table_name.clone(),
        );

        Self {
            transcriber: Arc::new(AwsTranscriber::new(aws_sdk_transcribe::Client::new(
                sdk_config,
            ))),
            transcripts: Arc::new(HttpTranscriptSource::new(reqwest::Client::new())),
            detector: Arc::new(AwsSentimentDetector::new(aws_sdk_comprehend::Client::new(
                sdk_config,
            ))),
            store: Arc::new(store),
            alerts: Arc::new(AwsAlertPublisher::new(aws_sdk_sns::Client::new(sdk_config))),
            config,
        }
    }
}
