//! Resource names and attribute names shared by the provisioner and the
//! event handler.

/// Default name of the DynamoDB table holding sentiment results.
pub const DEFAULT_TABLE_NAME: &str = "tonewatch-sentiment";

/// Partition key attribute of the results table (the S3 object key).
pub const FILE_ATTRIBUTE: &str = "File";

/// Attribute holding the detected sentiment label.
pub const SENTIMENT_ATTRIBUTE: &str = "FileSentiment";

/// Environment variable the handler reads the table name from.
pub const TABLE_NAME_ENV: &str = "TABLE_NAME";

/// Environment variable the handler reads the alert phone number from.
pub const ALERT_PHONE_NUMBER_ENV: &str = "ALERT_PHONE_NUMBER";
