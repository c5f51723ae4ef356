//! Redis-backed remediation request store.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::{AsyncCommands, Script};

use shutoff_application::{RemediationRecord, RemediationRepository};
use shutoff_core::{AppError, AppResult};

use crate::remediation_attributes;

const INSERT_IF_ABSENT_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
  return 0
end
redis.call('HSET', KEYS[1], unpack(ARGV))
return 1
"#;

/// `HSET` arguments for the insert script, alternating attribute name and value.
fn insert_arguments(record: &RemediationRecord) -> Vec<String> {
    remediation_attributes::record_attributes(record)
        .into_iter()
        .flat_map(|(name, value)| [name.to_owned(), value])
        .collect()
}

/// Redis implementation of the remediation repository port.
///
/// Each request is a hash under `<key_prefix>:<request_id>`.
#[derive(Clone)]
pub struct RedisRemediationRepository {
    client: redis::Client,
    key_prefix: String,
}

impl RedisRemediationRepository {
    /// Creates a repository with a configured Redis client and key prefix.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    fn key_for(&self, request_id: &str) -> String {
        format!("{}:{request_id}", self.key_prefix)
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))
    }
}

#[async_trait]
impl RemediationRepository for RedisRemediationRepository {
    async fn insert_request(&self, record: RemediationRecord) -> AppResult<()> {
        let mut connection = self.connection().await?;

        let mut invocation = Script::new(INSERT_IF_ABSENT_SCRIPT).prepare_invoke();
        invocation.key(self.key_for(record.request_id.as_str()));
        for argument in insert_arguments(&record) {
            invocation.arg(argument);
        }

        let inserted: i32 = invocation
            .invoke_async(&mut connection)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to store remediation request: {error}"))
            })?;

        if inserted == 0 {
            return Err(AppError::Conflict(format!(
                "remediation request '{}' already exists",
                record.request_id
            )));
        }

        Ok(())
    }

    async fn find_request(&self, request_id: &str) -> AppResult<Option<RemediationRecord>> {
        let mut connection = self.connection().await?;

        let stored: HashMap<String, String> = connection
            .hgetall(self.key_for(request_id))
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to load remediation request: {error}"))
            })?;

        if stored.is_empty() {
            return Ok(None);
        }

        remediation_attributes::record_from_attributes(|name| stored.get(name).cloned()).map(Some)
    }
}
