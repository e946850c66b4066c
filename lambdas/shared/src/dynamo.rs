//! DynamoDB operations for SurveyPipeline
//!
//! One row per user:
//!
//! | Attribute  | Type | Purpose                         |
//! |------------|------|---------------------------------|
//! | userid     | S    | Partition key                   |
//! | Version    | S    | Schema version of latest write  |
//! | response   | M    | Answers of latest write         |

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};
use std::collections::HashMap;

use crate::config::ConsumerConfig;
use crate::consumer::UserStore;
use crate::errors::{Error, Result};
use crate::models::StoredUserRecord;

const KEY_ATTR: &str = "userid";

/// DynamoDB client for the user table
pub struct DynamoClient {
    client: Client,
    table_name: String,
}

impl DynamoClient {
    /// Create a new DynamoDB client
    pub fn new(client: Client, config: &ConsumerConfig) -> Self {
        Self::with_table_name(client, config.table_name.clone())
    }

    /// Create with explicit table name (for testing)
    pub fn with_table_name(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Get a user row by key
    pub async fn get_user(&self, user_id: &str) -> Result<Option<StoredUserRecord>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(KEY_ATTR, AttributeValue::S(user_id.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| Error::Database(DisplayErrorContext(&e).to_string()))?;

        match result.item {
            Some(item) => Ok(Some(
                from_item(item).map_err(|e| Error::DynamoSerialization(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserStore for DynamoClient {
    /// Replace `Version` and `response` on an existing row
    async fn update_user(&self, record: &StoredUserRecord) -> Result<()> {
        let response_value: AttributeValue = to_attribute_value(&record.response)
            .map_err(|e| Error::DynamoSerialization(e.to_string()))?;

        self.client
            .update_item()
            .table_name(&self.table_name)
            .key(KEY_ATTR, AttributeValue::S(record.user_id.clone()))
            .update_expression("SET Version = :version, #response_attr = :response_value")
            .condition_expression("attribute_exists(userid)")
            .expression_attribute_names("#response_attr", "response")
            .expression_attribute_values(":version", AttributeValue::S(record.version.clone()))
            .expression_attribute_values(":response_value", response_value)
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
            .map_err(|e| {
                let missing = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);
                if missing {
                    Error::UserNotFound(record.user_id.clone())
                } else {
                    Error::Database(DisplayErrorContext(&e).to_string())
                }
            })?;

        Ok(())
    }

    /// Write a full row
    async fn insert_user(&self, record: &StoredUserRecord) -> Result<()> {
        let item: HashMap<String, AttributeValue> =
            to_item(record).map_err(|e| Error::DynamoSerialization(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| Error::Database(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}
