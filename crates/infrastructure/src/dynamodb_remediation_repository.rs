//! DynamoDB-backed remediation request store.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;

use shutoff_application::{RemediationRecord, RemediationRepository};
use shutoff_core::{AppError, AppResult};

use crate::aws_context::AwsContext;
use crate::aws_error::aws_error;
use crate::remediation_attributes::{self, REQUEST_ID};

/// Table used when none is configured.
pub const DEFAULT_REMEDIATION_TABLE_NAME: &str = "shutdown-table";

/// Stores one item per remediation request, keyed by `request_id`.
#[derive(Clone, Debug)]
pub struct DynamoDbRemediationRepository {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoDbRemediationRepository {
    /// Creates a repository on `table_name` in the home region.
    #[must_use]
    pub fn new(aws: &AwsContext, table_name: impl Into<String>) -> Self {
        Self {
            client: aws.dynamodb_client(),
            table_name: table_name.into(),
        }
    }
}

fn to_item(record: &RemediationRecord) -> HashMap<String, AttributeValue> {
    remediation_attributes::record_attributes(record)
        .into_iter()
        .map(|(name, value)| (name.to_owned(), AttributeValue::S(value)))
        .collect()
}

fn from_item(item: &HashMap<String, AttributeValue>) -> AppResult<RemediationRecord> {
    remediation_attributes::record_from_attributes(|name| {
        item.get(name)
            .and_then(|value| value.as_s().ok())
            .cloned()
    })
}

#[async_trait]
impl RemediationRepository for DynamoDbRemediationRepository {
    async fn insert_request(&self, record: RemediationRecord) -> AppResult<()> {
        self.client
            .put_item()
            .table_name(self.table_name.as_str())
            .set_item(Some(to_item(&record)))
            .condition_expression(format!("attribute_not_exists({REQUEST_ID})"))
            .send()
            .await
            .map_err(|error| {
                let collided = error
                    .as_service_error()
                    .is_some_and(|service_error| service_error.is_conditional_check_failed_exception());
                if collided {
                    AppError::Conflict(format!(
                        "remediation request '{}' already exists",
                        record.request_id
                    ))
                } else {
                    aws_error("dynamodb:PutItem", &error)
                }
            })?;

        Ok(())
    }

    async fn find_request(&self, request_id: &str) -> AppResult<Option<RemediationRecord>> {
        let response = self
            .client
            .get_item()
            .table_name(self.table_name.as_str())
            .key(REQUEST_ID, AttributeValue::S(request_id.to_owned()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|error| aws_error("dynamodb:GetItem", &error))?;

        response.item().map(from_item).transpose()
    }
}
