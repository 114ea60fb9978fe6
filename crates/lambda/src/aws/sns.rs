use async_trait::async_trait;
use aws_sdk_sns::Client;

use tonewatch_core::services::{AlertPublisher, Result, ServiceError};

/// SMS alerts through Amazon SNS direct publish.
pub struct AwsAlertPublisher {
    client: Client,
}

impl AwsAlertPublisher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AlertPublisher for AwsAlertPublisher {
    async fn publish(&self, phone_number: &str, message: &str) -> Result<()> {
        self.client
            .publish()
            .phone_number(phone_number)
            .message(message)
            .send()
            .await
            .map_err(|e| {
                ServiceError::Notification(format!("Publish failed: {}", e.into_service_error()))
            })?;

        Ok(())
    }
}
