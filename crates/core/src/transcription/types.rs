use std::time::Duration;

/// Lifecycle state of a batch transcription job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    /// Parses the status label Transcribe reports. Unknown labels are treated
    /// as still running so the poll keeps waiting.
    pub fn from_label(label: &str) -> Self {
        match label {
            "QUEUED" => JobStatus::Queued,
            "COMPLETED" => JobStatus::Completed,
            "FAILED" => JobStatus::Failed,
            _ => JobStatus::InProgress,
        }
    }

    /// Whether the job will no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One observation of a transcription job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub status: JobStatus,
    /// Location of the transcript document, set once the job completes.
    pub transcript_uri: Option<String>,
    pub failure_reason: Option<String>,
}

impl JobSnapshot {
    pub fn in_progress() -> Self {
        Self {
            status: JobStatus::InProgress,
            transcript_uri: None,
            failure_reason: None,
        }
    }

    pub fn completed(transcript_uri: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Completed,
            transcript_uri: Some(transcript_uri.into()),
            failure_reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            transcript_uri: None,
            failure_reason: Some(reason.into()),
        }
    }
}

/// Parameters for starting one transcription job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionRequest {
    pub job_name: String,
    pub media_uri: String,
    pub media_format: String,
    pub language_code: String,
    pub max_speaker_labels: i32,
}

/// How often and how long to wait for a job to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` waits until the job finishes or the function times out.
    pub max_attempts: Option<u32>,
}

impl PollPolicy {
    pub fn unbounded(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    /// Whether another status query is allowed after `attempts` queries.
    pub fn allows(&self, attempts: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempts < max)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::unbounded(Duration::from_secs(2))
    }
}
