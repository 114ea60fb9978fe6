//! In-memory service fakes for handler tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tonewatch_core::sentiment::{Sentiment, SentimentRecord};
use tonewatch_core::services::{
    AlertPublisher, Result, SentimentDetector, SentimentStore, ServiceError, TranscriptSource,
    Transcriber,
};
use tonewatch_core::transcription::{
    JobSnapshot, TranscriptDocument, TranscriptResults, TranscriptSegment, TranscriptionRequest,
};

use crate::config::Config;
use crate::state::HandlerState;

/// Replays a fixed sequence of job snapshots, repeating the last one.
pub struct ScriptedTranscriber {
    script: Mutex<VecDeque<JobSnapshot>>,
    last: Mutex<JobSnapshot>,
    started: Mutex<Vec<TranscriptionRequest>>,
    polls: AtomicU32,
}

impl ScriptedTranscriber {
    pub fn new(script: Vec<JobSnapshot>) -> Self {
        let last = script.last().cloned().unwrap_or_else(JobSnapshot::in_progress);
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(last),
            started: Mutex::new(Vec::new()),
            polls: AtomicU32::new(0),
        }
    }

    pub fn started(&self) -> Vec<TranscriptionRequest> {
        self.started.lock().unwrap().clone()
    }

    pub fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn start_job(&self, request: &TranscriptionRequest) -> Result<()> {
        self.started.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn job_snapshot(&self, _job_name: &str) -> Result<JobSnapshot> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(snapshot) => Ok(snapshot),
            None => Ok(self.last.lock().unwrap().clone()),
        }
    }
}

/// Returns the same transcript for every URI.
pub struct StaticTranscripts {
    text: String,
}

#[async_trait]
impl TranscriptSource for StaticTranscripts {
    async fn fetch(&self, _uri: &str) -> Result<TranscriptDocument> {
        Ok(TranscriptDocument {
            job_name: None,
            results: TranscriptResults {
                transcripts: vec![TranscriptSegment {
                    transcript: self.text.clone(),
                }],
            },
        })
    }
}

/// Classifies every text with the same sentiment.
pub struct FixedDetector {
    sentiment: Sentiment,
    texts: Mutex<Vec<String>>,
}

impl FixedDetector {
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SentimentDetector for FixedDetector {
    async fn detect(&self, text: &str, _language_code: &str) -> Result<Sentiment> {
        self.texts.lock().unwrap().push(text.to_string());
        Ok(self.sentiment)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<SentimentRecord>>,
    failure: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn records(&self) -> Vec<SentimentRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl SentimentStore for MemoryStore {
    async fn put_record(&self, record: &SentimentRecord) -> Result<()> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(ServiceError::Storage(message));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingPublisher {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertPublisher for RecordingPublisher {
    async fn publish(&self, phone_number: &str, message: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((phone_number.to_string(), message.to_string()));
        Ok(())
    }
}

/// Concrete fakes kept alongside the state so tests can inspect them.
pub struct Fakes {
    pub transcriber: Arc<ScriptedTranscriber>,
    pub transcripts: Arc<StaticTranscripts>,
    pub detector: Arc<FixedDetector>,
    pub store: Arc<MemoryStore>,
    pub alerts: Arc<RecordingPublisher>,
}

impl Fakes {
    pub fn with_script(script: Vec<JobSnapshot>, transcript: &str, sentiment: Sentiment) -> Self {
        Self {
            transcriber: Arc::new(ScriptedTranscriber::new(script)),
            transcripts: Arc::new(StaticTranscripts {
                text: transcript.to_string(),
            }),
            detector: Arc::new(FixedDetector {
                sentiment,
                texts: Mutex::new(Vec::new()),
            }),
            store: Arc::new(MemoryStore::default()),
            alerts: Arc::new(RecordingPublisher::default()),
        }
    }

    /// Every job completes on the first status check.
    pub fn completing(transcript: &str, sentiment: Sentiment) -> Self {
        Self::with_script(
            vec![JobSnapshot::completed(
                "https://s3.eu-west-2.amazonaws.com/transcripts/job.json",
            )],
            transcript,
            sentiment,
        )
    }
}

pub fn test_config(alert_phone_number: Option<&str>) -> Config {
    Config {
        table_name: "results".to_string(),
        alert_phone_number: alert_phone_number.map(str::to_string),
        default_media_format: "mp3".to_string(),
        transcribe_language: "en-US".to_string(),
        comprehend_language: "en".to_string(),
        max_speaker_labels: 2,
        poll_interval_ms: 1,
        max_poll_attempts: Some(50),
    }
}

pub fn state_with(fakes: &Fakes, alert_phone_number: Option<&str>) -> HandlerState {
    HandlerState {
        config: test_config(alert_phone_number),
        transcriber: fakes.transcriber.clone(),
        transcripts: fakes.transcripts.clone(),
        detector: fakes.detector.clone(),
        store: fakes.store.clone(),
        alerts: fakes.alerts.clone(),
    }
}
