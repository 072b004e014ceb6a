use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;
use thiserror::Error;

use crate::record::Record;

const PROVISIONED_THROUGHPUT_EXCEEDED: &str = "ProvisionedThroughputExceededException";
const REQUEST_LIMIT_EXCEEDED: &str = "RequestLimitExceeded";

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum StoreError {
    /// The table is over capacity; the caller should retry later.
    #[error("{code}: capacity exceeded")]
    Throttled { code: String },
    #[error("{code}: {message}")]
    Service { code: String, message: String },
    /// No service response was received.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    fn from_service_error(err: PutItemError) -> Self {
        match &err {
            PutItemError::ProvisionedThroughputExceededException(_) => StoreError::Throttled {
                code: PROVISIONED_THROUGHPUT_EXCEEDED.to_string(),
            },
            PutItemError::RequestLimitExceeded(_) => StoreError::Throttled {
                code: REQUEST_LIMIT_EXCEEDED.to_string(),
            },
            _ => match err.code() {
                Some(code @ (PROVISIONED_THROUGHPUT_EXCEEDED | REQUEST_LIMIT_EXCEEDED)) => {
                    StoreError::Throttled {
                        code: code.to_string(),
                    }
                }
                code => StoreError::Service {
                    code: code.unwrap_or("Unknown").to_string(),
                    message: err.message().unwrap_or_default().to_string(),
                },
            },
        }
    }
}

impl From<SdkError<PutItemError>> for StoreError {
    fn from(err: SdkError<PutItemError>) -> Self {
        match err {
            SdkError::ServiceError(service) => StoreError::from_service_error(service.into_err()),
            other => StoreError::Unavailable(DisplayErrorContext(&other).to_string()),
        }
    }
}

/// Write capability the handler depends on.
#[async_trait]
pub(crate) trait RecordStore: Send + Sync {
    /// Insert or replace `record` in `table`.
    async fn put_record(&self, table: &str, record: &Record) -> Result<(), StoreError>;
}

pub(crate) struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordStore for DynamoStore {
    async fn put_record(&self, table: &str, record: &Record) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(to_item(record)))
            .send()
            .await?;
        Ok(())
    }
}

fn to_item(record: &Record) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert("id".to_string(), AttributeValue::S(record.id.clone()));
    item.insert("title".to_string(), AttributeValue::S(record.title.clone()));
    item.insert("year".to_string(), AttributeValue::N(record.year.clone()));
    item
}
