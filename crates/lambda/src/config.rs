use std::{env, time::Duration};

use tonewatch_core::resources::{ALERT_PHONE_NUMBER_ENV, DEFAULT_TABLE_NAME, TABLE_NAME_ENV};
use tonewatch_core::transcription::PollPolicy;

/// Handler configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Results table (default: "tonewatch-sentiment")
    pub table_name: String,
    /// Phone number negative results are texted to. Alerts are skipped when unset.
    pub alert_phone_number: Option<String>,
    /// Media format used when the key has no recognised extension (default: "mp3")
    pub default_media_format: String,
    /// Transcribe language (default: "en-US")
    pub transcribe_language: String,
    /// Comprehend language (default: "en")
    pub comprehend_language: String,
    /// Maximum number of speakers to label (default: 2)
    pub max_speaker_labels: i32,
    /// Delay between job status queries in milliseconds (default: 2,000)
    pub poll_interval_ms: u64,
    /// Status queries before giving up. Unset waits until the function times out.
    pub max_poll_attempts: Option<u32>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TABLE_NAME` - Results table name
    /// - `ALERT_PHONE_NUMBER` - E.164 number for negative-sentiment SMS alerts
    /// - `MEDIA_FORMAT` - Fallback media format
    /// - `TRANSCRIBE_LANGUAGE` - Transcription language code
    /// - `COMPREHEND_LANGUAGE` - Sentiment language code
    /// - `MAX_SPEAKER_LABELS` - Speaker diarization limit
    /// - `POLL_INTERVAL_MS` - Job status poll interval
    /// - `MAX_POLL_ATTEMPTS` - Optional bound on status queries
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any variable source.
    ///
    /// Unset variables and values that fail to parse fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text =
            |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Self {
            table_name: text(TABLE_NAME_ENV, DEFAULT_TABLE_NAME),
            alert_phone_number: lookup(ALERT_PHONE_NUMBER_ENV)
                .filter(|number| !number.trim().is_empty()),
            default_media_format: text("MEDIA_FORMAT", "mp3"),
            transcribe_language: text("TRANSCRIBE_LANGUAGE", "en-US"),
            comprehend_language: text("COMPREHEND_LANGUAGE", "en"),
            max_speaker_labels: lookup("MAX_SPEAKER_LABELS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            poll_interval_ms: lookup("POLL_INTERVAL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(2_000),
            max_poll_attempts: lookup("MAX_POLL_ATTEMPTS").and_then(|v| v.parse().ok()),
        }
    }

    /// Poll policy for transcription jobs.
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.max_poll_attempts,
        }
    }
}
