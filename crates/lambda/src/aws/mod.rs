//! AWS-backed implementations of the service traits.

mod comprehend;
mod dynamodb;
mod sns;
mod transcribe;
mod transcript;

pub use comprehend::AwsSentimentDetector;
pub use dynamodb::DynamoDbSentimentStore;
pub use sns::AwsAlertPublisher;
pub use transcribe::AwsTranscriber;
pub use transcript::HttpTranscriptSource;
