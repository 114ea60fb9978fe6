//! Pure functions turning queue messages into object references.

use serde::Deserialize;
use serde_json::Value;

use super::error::{EventError, Result};
use super::types::{ObjectRef, S3Notification, S3NotificationRecord, SqsRecord};

/// Splits a raw invocation payload into its queue records.
///
/// A payload whose `Records` is missing, null or not an array yields no
/// records. Each record decodes on its own, so one malformed message does not
/// hide the others.
pub fn records_from_payload(payload: &Value) -> Vec<Result<SqsRecord>> {
    let Some(Value::Array(records)) = payload.get("Records") else {
        return Vec::new();
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            SqsRecord::deserialize(record).map_err(|e| EventError::InvalidRecord {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Decodes an object key as S3 writes it into event notifications.
///
/// S3 form-encodes keys: spaces arrive as `+` and other reserved characters
/// as `%XX` sequences.
pub fn decode_object_key(raw: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|key| key.into_owned())
        .map_err(|_| EventError::InvalidKey(raw.to_string()))
}

/// Extracts every object reference carried by one SQS record.
pub fn object_refs_from_record(index: usize, record: &SqsRecord) -> Result<Vec<ObjectRef>> {
    let body = record
        .body
        .as_deref()
        .ok_or(EventError::MissingBody { index })?;

    object_refs_from_body(index, body)
}

/// Extracts every object reference from an S3 notification body.
///
/// A body without records (the S3 test event) yields an empty list.
pub fn object_refs_from_body(index: usize, body: &str) -> Result<Vec<ObjectRef>> {
    let notification: S3Notification =
        serde_json::from_str(body).map_err(|e| EventError::InvalidBody {
            index,
            reason: e.to_string(),
        })?;

    notification.records.iter().map(object_ref).collect()
}

fn object_ref(record: &S3NotificationRecord) -> Result<ObjectRef> {
    let entity = record
        .s3
        .as_ref()
        .ok_or(EventError::MissingField("s3 entity"))?;

    let bucket = entity
        .bucket
        .as_ref()
        .and_then(|bucket| bucket.name.as_deref())
        .ok_or(EventError::MissingField("bucket name"))?;

    let raw_key = entity
        .object
        .as_ref()
        .and_then(|object| object.key.as_deref())
        .ok_or(EventError::MissingField("object key"))?;

    Ok(ObjectRef::new(bucket, decode_object_key(raw_key)?))
}
