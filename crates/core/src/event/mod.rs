//! Decoding of the SQS envelopes that wrap S3 event notifications.

mod error;
mod parsing;
mod types;

pub use error::{EventError, Result};
pub use parsing::{
    decode_object_key, object_refs_from_body, object_refs_from_record, records_from_payload,
};
pub use types::{
    ObjectRef, S3Bucket, S3Entity, S3Notification, S3NotificationRecord, S3Object, SqsRecord,
};
