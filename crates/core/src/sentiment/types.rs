use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::SentimentError;

/// Overall sentiment Comprehend assigns to a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl Sentiment {
    /// The upper-case label stored in the results table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
            Sentiment::Mixed => "MIXED",
        }
    }

    /// Whether this sentiment should raise an SMS alert.
    pub fn is_alerting(&self) -> bool {
        matches!(self, Sentiment::Negative)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = SentimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Ok(Sentiment::Positive),
            "NEGATIVE" => Ok(Sentiment::Negative),
            "NEUTRAL" => Ok(Sentiment::Neutral),
            "MIXED" => Ok(Sentiment::Mixed),
            _ => Err(SentimentError::UnknownLabel(s.to_string())),
        }
    }
}

/// The item written to the results table for every processed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentRecord {
    #[serde(rename = "File")]
    pub file: String,
    #[serde(rename = "FileSentiment")]
    pub file_sentiment: Sentiment,
}

impl SentimentRecord {
    pub fn new(file: impl Into<String>, file_sentiment: Sentiment) -> Self {
        Self {
            file: file.into(),
            file_sentiment,
        }
    }
}

/// Text of the SMS sent when a file is classified as alerting.
pub fn alert_message(record: &SentimentRecord) -> String {
    format!("{} sentiment detected in {}", record.file_sentiment, record.file)
}
