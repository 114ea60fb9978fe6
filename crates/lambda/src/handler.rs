//! Lambda entry handler for SQS batches of S3 notifications.

use lambda_runtime::LambdaEvent;
use serde_json::Value;

use tonewatch_core::event::{object_refs_from_record, records_from_payload};
use tonewatch_core::transcription::job_name;

use crate::pipeline::{process_object, AlertOutcome};
use crate::state::HandlerState;

/// Handles one invocation.
///
/// Never returns an error: failures are logged per object so the rest of the
/// batch still runs. Returns `true` when at least one alert was sent.
pub async fn handle_request(
    event: LambdaEvent<Value>,
    state: &HandlerState,
) -> Result<bool, lambda_runtime::Error> {
    Ok(handle_payload(state, &event.payload, &event.context.request_id).await)
}

/// Processes every object referenced by a raw invocation payload.
pub async fn handle_payload(state: &HandlerState, payload: &Value, request_id: &str) -> bool {
    let records = records_from_payload(payload);
    if records.is_empty() {
        tracing::info!("Event has no queue records; nothing to do");
        return false;
    }

    let mut alerted = false;
    let mut object_index = 0;

    for (index, record) in records.into_iter().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                tracing::error!(error = %err, "Skipping malformed queue record");
                continue;
            }
        };

        let objects = match object_refs_from_record(index, &record) {
            Ok(objects) => objects,
            Err(err) => {
                tracing::error!(
                    error = %err,
                    message_id = record.message_id.as_deref().unwrap_or("unknown"),
                    "Skipping unreadable queue message"
                );
                continue;
            }
        };

        if objects.is_empty() {
            tracing::info!(
                message_id = record.message_id.as_deref().unwrap_or("unknown"),
                "Queue message carries no object records"
            );
        }

        for object in objects {
            let job = job_name(request_id, object_index);
            object_index += 1;

            match process_object(state, &object, job).await {
                Ok(processed) => {
                    tracing::debug!(
                        file = %processed.record.file,
                        sentiment = %processed.record.file_sentiment,
                        alert = ?processed.alert,
                        "Object processed"
                    );
                    alerted |= processed.alert == AlertOutcome::Sent;
                }
                Err(err) => {
                    tracing::error!(
                        error = %err,
                        bucket = %object.bucket,
                        key = %object.key,
                        "Failed to process uploaded object"
                    );
                }
            }
        }
    }

    alerted
}
