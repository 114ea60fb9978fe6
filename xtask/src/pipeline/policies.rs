//! IAM and SQS policy documents (Functional Core).

use serde_json::{json, Value};

/// Trust policy letting the Lambda service assume the function role.
pub fn lambda_trust_policy() -> Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": {"Service": "lambda.amazonaws.com"},
            "Action": "sts:AssumeRole"
        }]
    })
}

/// Source ARN pattern matching the bucket in any region and account.
pub fn bucket_source_arn(bucket: &str) -> String {
    format!("arn:aws:s3:*:*:{bucket}")
}

/// Queue policy allowing the bucket to send notifications to the queue.
pub fn queue_policy(queue_arn: &str, bucket: &str) -> Value {
    json!({
        "Version": "2012-10-17",
        "Id": queue_arn,
        "Statement": [{
            "Sid": "allow bucket to notify SQS queue",
            "Effect": "Allow",
            "Principal": {"AWS": "*"},
            "Action": "SQS:SendMessage",
            "Resource": queue_arn,
            "Condition": {
                "ArnLike": {"aws:SourceArn": bucket_source_arn(bucket)}
            }
        }]
    })
}

/// Whether a CloudFormation template declares a `TableName` parameter.
pub fn template_accepts_table_name(template: &Value) -> bool {
    template
        .get("Parameters")
        .and_then(|parameters| parameters.get("TableName"))
        .is_some()
}
