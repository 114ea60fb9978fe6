//! Processing of a single uploaded object: transcribe, classify, store, alert.

use tonewatch_core::event::ObjectRef;
use tonewatch_core::sentiment::{
    alert_message, prepare_text, PreparedText, Sentiment, SentimentRecord,
};
use tonewatch_core::services::Transcriber;
use tonewatch_core::transcription::{
    media_format_for_key, JobSnapshot, JobStatus, PollPolicy, TranscriptionRequest,
};

use crate::error::{PipelineError, Result};
use crate::state::HandlerState;

/// What happened to the alert for a processed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertOutcome {
    Sent,
    NotNeeded,
    NoRecipient,
}

/// Result of processing one object successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedObject {
    pub record: SentimentRecord,
    pub alert: AlertOutcome,
}

/// Builds the transcription request for an object.
pub fn transcription_request(
    state: &HandlerState,
    object: &ObjectRef,
    job_name: String,
) -> TranscriptionRequest {
    TranscriptionRequest {
        job_name,
        media_uri: object.media_uri(),
        media_format: media_format_for_key(&object.key, &state.config.default_media_format),
        language_code: state.config.transcribe_language.clone(),
        max_speaker_labels: state.config.max_speaker_labels,
    }
}

/// Runs the whole pipeline for one object.
pub async fn process_object(
    state: &HandlerState,
    object: &ObjectRef,
    job_name: String,
) -> Result<ProcessedObject> {
    let request = transcription_request(state, object, job_name);

    state.transcriber.start_job(&request).await?;
    tracing::info!(
        job = %request.job_name,
        media = %request.media_uri,
        format = %request.media_format,
        "Transcription job started"
    );

    let snapshot = wait_for_completion(
        state.transcriber.as_ref(),
        &request.job_name,
        state.config.poll_policy(),
    )
    .await?;

    let transcript_uri = match snapshot.status {
        JobStatus::Completed => snapshot
            .transcript_uri
            .ok_or_else(|| PipelineError::MissingTranscriptUri(request.job_name.clone()))?,
        _ => {
            return Err(PipelineError::TranscriptionFailed {
                job: request.job_name,
                reason: snapshot
                    .failure_reason
                    .unwrap_or_else(|| "no reason given".to_string()),
            })
        }
    };

    let document = state.transcripts.fetch(&transcript_uri).await?;
    let transcript = document
        .transcript_text()
        .ok_or_else(|| PipelineError::EmptyTranscriptDocument(request.job_name.clone()))?;

    let sentiment = detect_sentiment(state, transcript, &object.key).await?;
    tracing::info!("File: {} Sentiment: {}", object.key, sentiment);

    let record = SentimentRecord::new(object.key.clone(), sentiment);
    state.store.put_record(&record).await?;

    let alert = send_alert(state, &record).await?;

    Ok(ProcessedObject { record, alert })
}

/// Queries the job until it reaches a terminal status.
///
/// Waits `policy.interval` between queries. Without `max_attempts` the loop
/// only ends when the job does.
pub async fn wait_for_completion(
    transcriber: &dyn Transcriber,
    job_name: &str,
    policy: PollPolicy,
) -> Result<JobSnapshot> {
    let mut attempts = 0;

    loop {
        let snapshot = transcriber.job_snapshot(job_name).await?;
        attempts += 1;

        if snapshot.status.is_terminal() {
            return Ok(snapshot);
        }

        if !policy.allows(attempts) {
            return Err(PipelineError::PollLimitExceeded {
                job: job_name.to_string(),
                attempts,
            });
        }

        tracing::debug!(job = job_name, attempts, "Transcription in progress");
        tokio::time::sleep(policy.interval).await;
    }
}

async fn detect_sentiment(state: &HandlerState, transcript: &str, key: &str) -> Result<Sentiment> {
    match prepare_text(transcript) {
        PreparedText::Empty => {
            tracing::info!(key, "Transcript is empty; recording NEUTRAL");
            Ok(Sentiment::Neutral)
        }
        PreparedText::Text { text, truncated } => {
            if truncated {
                tracing::warn!(
                    key,
                    bytes = transcript.len(),
                    "Transcript exceeds the sentiment size limit and was truncated"
                );
            }
            Ok(state
                .detector
                .detect(text, &state.config.comprehend_language)
                .await?)
        }
    }
}

async fn send_alert(state: &HandlerState, record: &SentimentRecord) -> Result<AlertOutcome> {
    if !record.file_sentiment.is_alerting() {
        return Ok(AlertOutcome::NotNeeded);
    }

    let Some(phone_number) = state.config.alert_phone_number.as_deref() else {
        tracing::warn!(
            file = %record.file,
            "Negative sentiment but no alert phone number configured"
        );
        return Ok(AlertOutcome::NoRecipient);
    };

    state
        .alerts
        .publish(phone_number, &alert_message(record))
        .await?;
    tracing::info!(file = %record.file, "Negative sentiment alert sent");

    Ok(AlertOutcome::Sent)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::fakes::{state_with, Fakes};
    use tonewatch_core::services::ServiceError;

    fn object(key: &str) -> ObjectRef {
        ObjectRef::new("audio-bucket", key)
    }

    #[tokio::test]
    async fn test_completed_job_is_recorded() {
        let fakes = Fakes::completing("Thanks, that was great.", Sentiment::Positive);
        let state = state_with(&fakes, Some("+447700900000"));

        let processed = process_object(&state, &object("happy.mp3"), "req-0".to_string())
            .await
            .unwrap();

        assert_eq!(
            processed.record,
            SentimentRecord::new("happy.mp3", Sentiment::Positive)
        );
        assert_eq!(processed.alert, AlertOutcome::NotNeeded);
        assert_eq!(fakes.store.records(), vec![processed.record]);
        assert!(fakes.alerts.sent().is_empty());
    }

    #[tokio::test]
    async fn test_request_uses_object_and_config() {
        let fakes = Fakes::completing("hello", Sentiment::Neutral);
        let state = state_with(&fakes, None);

        process_object(&state, &object("calls/first call.wav"), "req-3".to_string())
            .await
            .unwrap();

        let started = fakes.transcriber.started();
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].job_name, "req-3");
        assert_eq!(started[0].media_uri, "s3://audio-bucket/calls/first call.wav");
        assert_eq!(started[0].media_format, "wav");
        assert_eq!(started[0].language_code, "en-US");
        assert_eq!(started[0].max_speaker_labels, 2);
        assert_eq!(fakes.detector.texts(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_negative_sentiment_sends_one_alert() {
        let fakes = Fakes::completing("This is terrible.", Sentiment::Negative);
        let state = state_with(&fakes, Some("+447700900000"));

        let processed = process_object(&state, &object("angry.mp3"), "req-0".to_string())
            .await
            .unwrap();

        assert_eq!(processed.alert, AlertOutcome::Sent);
        assert_eq!(
            fakes.alerts.sent(),
            vec![(
                "+447700900000".to_string(),
                "NEGATIVE sentiment detected in angry.mp3".to_string()
            )]
        );
        assert_eq!(fakes.store.records().len(), 1);
    }

    #[tokio::test]
    async fn test_negative_sentiment_without_recipient() {
        let fakes = Fakes::completing("This is terrible.", Sentiment::Negative);
        let state = state_with(&fakes, None);

        let processed = process_object(&state, &object("angry.mp3"), "req-0".to_string())
            .await
            .unwrap();

        assert_eq!(processed.alert, AlertOutcome::NoRecipient);
        assert!(fakes.alerts.sent().is_empty());
        assert_eq!(fakes.store.records().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_job_stores_nothing() {
        let fakes = Fakes::with_script(
            vec![JobSnapshot::in_progress(), JobSnapshot::failed("Unsupported media")],
            "unused",
            Sentiment::Negative,
        );
        let state = state_with(&fakes, Some("+447700900000"));

        let result = process_object(&state, &object("broken.mp3"), "req-0".to_string()).await;

        assert_eq!(
            result,
            Err(PipelineError::TranscriptionFailed {
                job: "req-0".to_string(),
                reason: "Unsupported media".to_string()
            })
        );
        assert!(fakes.store.records().is_empty());
        assert!(fakes.alerts.sent().is_empty());
        assert!(fakes.detector.texts().is_empty());
    }

    #[tokio::test]
    async fn test_empty_transcript_is_neutral_without_detection() {
        let fakes = Fakes::completing("   ", Sentiment::Negative);
        let state = state_with(&fakes, Some("+447700900000"));

        let processed = process_object(&state, &object("silence.mp3"), "req-0".to_string())
            .await
            .unwrap();

        assert_eq!(processed.record.file_sentiment, Sentiment::Neutral);
        assert!(fakes.detector.texts().is_empty());
        assert!(fakes.alerts.sent().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_skips_alert() {
        let fakes = Fakes::completing("This is terrible.", Sentiment::Negative);
        fakes.store.fail_with("Table not found");
        let state = state_with(&fakes, Some("+447700900000"));

        let result = process_object(&state, &object("angry.mp3"), "req-0".to_string()).await;

        assert_eq!(
            result,
            Err(PipelineError::Service(ServiceError::Storage(
                "Table not found".to_string()
            )))
        );
        assert!(fakes.alerts.sent().is_empty());
    }

    #[tokio::test]
    async fn test_wait_polls_until_terminal() {
        let fakes = Fakes::with_script(
            vec![
                JobSnapshot::in_progress(),
                JobSnapshot::in_progress(),
                JobSnapshot::completed("https://example.com/t.json"),
            ],
            "hi",
            Sentiment::Neutral,
        );

        let snapshot = wait_for_completion(
            fakes.transcriber.as_ref(),
            "req-0",
            PollPolicy::unbounded(Duration::from_millis(1)),
        )
        .await
        .unwrap();

        assert_eq!(snapshot.status, JobStatus::Completed);
        assert_eq!(fakes.transcriber.polls(), 3);
    }

    #[tokio::test]
    async fn test_wait_respects_attempt_limit() {
        let fakes = Fakes::with_script(vec![JobSnapshot::in_progress()], "hi", Sentiment::Neutral);
        let policy = PollPolicy {
            interval: Duration::from_millis(1),
            max_attempts: Some(3),
        };

        let result = wait_for_completion(fakes.transcriber.as_ref(), "req-0", policy).await;

        assert_eq!(
            result,
            Err(PipelineError::PollLimitExceeded {
                job: "req-0".to_string(),
                attempts: 3
            })
        );
        assert_eq!(fakes.transcriber.polls(), 3);
    }
}
