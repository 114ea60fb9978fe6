//! Pipeline configuration types (Functional Core - pure data).

use std::path::PathBuf;
use std::time::Duration;

/// Delay SQS applies before a new message becomes visible.
pub const QUEUE_DELAY_SECONDS: u32 = 10;

/// Messages handed to one Lambda invocation.
pub const EVENT_BATCH_SIZE: i32 = 10;

/// Lambda function timeout; the only bound on the transcription poll.
pub const FUNCTION_TIMEOUT_SECONDS: i32 = 30;

/// Custom runtime for the Rust `bootstrap` binary.
pub const FUNCTION_RUNTIME: &str = "provided.al2023";

/// Entry point name inside the deployment package.
pub const FUNCTION_HANDLER: &str = "bootstrap";

/// Id of the bucket → queue notification configuration.
pub const NOTIFICATION_ID: &str = "Notifications";

/// Event that triggers the pipeline.
pub const OBJECT_CREATED_EVENT: &str = "s3:ObjectCreated:*";

/// Managed policies attached to the function role.
pub const MANAGED_POLICY_ARNS: &[&str] = &[
    "arn:aws:iam::aws:policy/service-role/AWSLambdaSQSQueueExecutionRole",
    "arn:aws:iam::aws:policy/AmazonTranscribeFullAccess",
    "arn:aws:iam::aws:policy/AmazonS3ReadOnlyAccess",
    "arn:aws:iam::aws:policy/ComprehendFullAccess",
    "arn:aws:iam::aws:policy/AmazonSNSFullAccess",
    "arn:aws:iam::aws:policy/AmazonDynamoDBFullAccess",
];

/// Wait before the first role lookup; IAM is eventually consistent.
pub const ROLE_WAIT_INITIAL: Duration = Duration::from_secs(10);

/// Delay between role lookups.
pub const ROLE_WAIT_INTERVAL: Duration = Duration::from_secs(3);

/// Role lookups before giving up.
pub const ROLE_WAIT_ATTEMPTS: u32 = 20;

/// `CreateFunction` attempts while Lambda still rejects a freshly created role.
pub const FUNCTION_CREATE_ATTEMPTS: u32 = 5;

/// Instruction set the function runs on; must match the packaged binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FunctionArchitecture {
    #[default]
    #[value(name = "x86_64")]
    X8664,
    #[value(name = "arm64")]
    Arm64,
}

impl FunctionArchitecture {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionArchitecture::X8664 => "x86_64",
            FunctionArchitecture::Arm64 => "arm64",
        }
    }
}

/// Everything the provisioner needs to know about the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub region: String,
    pub bucket: String,
    pub queue: String,
    pub stack: String,
    pub table: String,
    pub template: PathBuf,
    pub role: String,
    pub function: String,
    pub artifact: PathBuf,
    pub architecture: FunctionArchitecture,
    pub alert_phone_number: Option<String>,
    pub audio_dir: PathBuf,
    pub upload_delay: Duration,
    pub skip_upload: bool,
}

impl PipelineConfig {
    /// Whether the bucket needs an explicit location constraint.
    ///
    /// `us-east-1` is the default location and S3 rejects it as a constraint.
    pub fn needs_location_constraint(&self) -> bool {
        self.region != "us-east-1"
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> PipelineConfig {
    PipelineConfig {
        region: "eu-west-2".to_string(),
        bucket: "tonewatch-audio".to_string(),
        queue: "tonewatch-queue".to_string(),
        stack: "tonewatch-database".to_string(),
        table: "tonewatch-sentiment".to_string(),
        template: PathBuf::from("infra/database.json"),
        role: "tonewatch-lambda-role".to_string(),
        function: "tonewatch-handler".to_string(),
        artifact: PathBuf::from("dist/lambda.zip"),
        architecture: FunctionArchitecture::X8664,
        alert_phone_number: None,
        audio_dir: PathBuf::from("audio"),
        upload_delay: Duration::from_secs(30),
        skip_upload: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_constraint() {
        let mut config = test_config();
        assert!(config.needs_location_constraint());

        config.region = "us-east-1".to_string();
        assert!(!config.needs_location_constraint());
    }

    #[test]
    fn test_architecture_labels() {
        assert_eq!(FunctionArchitecture::default().as_str(), "x86_64");
        assert_eq!(FunctionArchitecture::Arm64.as_str(), "arm64");
    }

    #[test]
    fn test_six_managed_policies() {
        assert_eq!(MANAGED_POLICY_ARNS.len(), 6);
        assert!(MANAGED_POLICY_ARNS
            .iter()
            .all(|arn| arn.starts_with("arn:aws:iam::aws:policy/")));
    }
}
