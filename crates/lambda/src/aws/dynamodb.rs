//! Results table access.

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use tonewatch_core::resources::{FILE_ATTRIBUTE, SENTIMENT_ATTRIBUTE};
use tonewatch_core::sentiment::SentimentRecord;
use tonewatch_core::services::{Result, SentimentStore, ServiceError};

/// Stores one item per processed file, keyed by the object key.
pub struct DynamoDbSentimentStore {
    client: Client,
    table_name: String,
}

impl DynamoDbSentimentStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl SentimentStore for DynamoDbSentimentStore {
    async fn put_record(&self, record: &SentimentRecord) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, &self.table_name))?;

        Ok(())
    }
}

/// Convert a SentimentRecord to a DynamoDB item.
pub fn record_to_item(record: &SentimentRecord) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            FILE_ATTRIBUTE.to_string(),
            AttributeValue::S(record.file.clone()),
        ),
        (
            SENTIMENT_ATTRIBUTE.to_string(),
            AttributeValue::S(record.file_sentiment.as_str().to_string()),
        ),
    ])
}

/// Map a PutItem SDK error to ServiceError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table_name: &str,
) -> ServiceError {
    match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => {
            ServiceError::Storage(format!("Table '{table_name}' not found"))
        }
        PutItemError::ProvisionedThroughputExceededException(_) => {
            ServiceError::Storage("Throughput exceeded, please retry".to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            ServiceError::Storage("Request limit exceeded, please retry".to_string())
        }
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            ServiceError::Storage("Item collection size limit exceeded".to_string())
        }
        PutItemError::TransactionConflictException(_) => {
            ServiceError::Storage("Transaction conflict, please retry".to_string())
        }
        PutItemError::InternalServerError(_) => {
            ServiceError::Storage("DynamoDB internal server error".to_string())
        }
        err => ServiceError::Storage(format!("PutItem failed: {:?}", err)),
    }
}
