use async_trait::async_trait;
use aws_sdk_transcribe::types::{LanguageCode, Media, MediaFormat, Settings, TranscriptionJob};
use aws_sdk_transcribe::Client;

use tonewatch_core::services::{Result, ServiceError, Transcriber};
use tonewatch_core::transcription::{JobSnapshot, JobStatus, TranscriptionRequest};

/// Amazon Transcribe batch jobs.
pub struct AwsTranscriber {
    client: Client,
}

impl AwsTranscriber {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transcriber for AwsTranscriber {
    async fn start_job(&self, request: &TranscriptionRequest) -> Result<()> {
        self.client
            .start_transcription_job()
            .transcription_job_name(&request.job_name)
            .media(Media::builder().media_file_uri(&request.media_uri).build())
            .media_format(MediaFormat::from(request.media_format.as_str()))
            .language_code(LanguageCode::from(request.language_code.as_str()))
            .settings(
                Settings::builder()
                    .show_speaker_labels(true)
                    .max_speaker_labels(request.max_speaker_labels)
                    .channel_identification(false)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| {
                ServiceError::Transcription(format!(
                    "StartTranscriptionJob failed: {}",
                    e.into_service_error()
                ))
            })?;

        Ok(())
    }

    async fn job_snapshot(&self, job_name: &str) -> Result<JobSnapshot> {
        let output = self
            .client
            .get_transcription_job()
            .transcription_job_name(job_name)
            .send()
            .await
            .map_err(|e| {
                ServiceError::Transcription(format!(
                    "GetTranscriptionJob failed: {}",
                    e.into_service_error()
                ))
            })?;

        let job = output.transcription_job().ok_or_else(|| {
            ServiceError::InvalidResponse(format!("No transcription job returned for '{job_name}'"))
        })?;

        Ok(job_to_snapshot(job))
    }
}

fn job_to_snapshot(job: &TranscriptionJob) -> JobSnapshot {
    JobSnapshot {
        status: job
            .transcription_job_status()
            .map(|status| JobStatus::from_label(status.as_str()))
            .unwrap_or(JobStatus::InProgress),
        transcript_uri: job
            .transcript()
            .and_then(|transcript| transcript.transcript_file_uri())
            .map(str::to_string),
        failure_reason: job.failure_reason().map(str::to_string),
    }
}
