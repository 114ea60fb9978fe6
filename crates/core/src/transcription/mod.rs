//! Transcription job types, naming rules and transcript documents.

mod document;
mod naming;
mod types;

pub use document::{TranscriptDocument, TranscriptResults, TranscriptSegment};
pub use naming::{job_name, media_format_for_key, MAX_JOB_NAME_LEN, SUPPORTED_MEDIA_FORMATS};
pub use types::{JobSnapshot, JobStatus, PollPolicy, TranscriptionRequest};
