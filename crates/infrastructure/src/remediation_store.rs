//! Selection of the remediation store backend.

use std::sync::Arc;

use shutoff_application::RemediationRepository;
use shutoff_core::{AppError, AppResult};

use crate::aws_context::AwsContext;
use crate::dynamodb_remediation_repository::{
    DEFAULT_REMEDIATION_TABLE_NAME, DynamoDbRemediationRepository,
};
use crate::in_memory_remediation_repository::InMemoryRemediationRepository;
use crate::redis_remediation_repository::RedisRemediationRepository;

const REDIS_KEY_PREFIX: &str = "shutoff:remediation";

/// Configured remediation store backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemediationStore {
    /// DynamoDB table in the home region.
    DynamoDb {
        /// Table name.
        table_name: String,
    },
    /// Redis hashes.
    Redis {
        /// Connection URL.
        url: String,
    },
    /// Process-local map. Requests do not survive a restart and are not
    /// shared between the worker and the callback.
    Memory,
}

impl RemediationStore {
    /// Parses the backend name and its settings.
    ///
    /// A missing backend name selects DynamoDB.
    pub fn parse(
        backend: Option<&str>,
        table_name: Option<&str>,
        redis_url: Option<&str>,
    ) -> AppResult<Self> {
        let non_blank =
            |value: Option<&str>| value.map(str::trim).filter(|value| !value.is_empty());

        match non_blank(backend)
            .map(str::to_ascii_lowercase)
            .as_deref()
            .unwrap_or("dynamodb")
        {
            "dynamodb" => Ok(Self::DynamoDb {
                table_name: non_blank(table_name)
                    .unwrap_or(DEFAULT_REMEDIATION_TABLE_NAME)
                    .to_owned(),
            }),
            "redis" => {
                let url = non_blank(redis_url).ok_or_else(|| {
                    AppError::Validation(
                        "REDIS_URL is required when REMEDIATION_STORE=redis".to_owned(),
                    )
                })?;
                Ok(Self::Redis {
                    url: url.to_owned(),
                })
            }
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Validation(format!(
                "unsupported REMEDIATION_STORE '{other}', expected dynamodb, redis or memory"
            ))),
        }
    }

    /// Builds the repository for this backend.
    pub fn connect(&self, aws: &AwsContext) -> AppResult<Arc<dyn RemediationRepository>> {
        match self {
            Self::DynamoDb { table_name } => Ok(Arc::new(DynamoDbRemediationRepository::new(
                aws,
                table_name.as_str(),
            ))),
            Self::Redis { url } => {
                let client = redis::Client::open(url.as_str()).map_err(|error| {
                    AppError::Validation(format!("invalid REDIS_URL: {error}"))
                })?;
                Ok(Arc::new(RedisRemediationRepository::new(
                    client,
                    REDIS_KEY_PREFIX,
                )))
            }
            Self::Memory => Ok(Arc::new(InMemoryRemediationRepository::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use shutoff_core::AppError;

    use super::RemediationStore;

    #[test]
    fn dynamodb_is_the_default_backend() {
        assert_eq!(
            RemediationStore::parse(None, None, None).ok(),
            Some(RemediationStore::DynamoDb {
                table_name: "shutdown-table".to_owned()
            })
        );
        assert_eq!(
            RemediationStore::parse(Some(" DynamoDB "), Some("requests"), None).ok(),
            Some(RemediationStore::DynamoDb {
                table_name: "requests".to_owned()
            })
        );
    }

    #[test]
    fn redis_requires_a_url() {
        assert!(matches!(
            RemediationStore::parse(Some("redis"), None, Some(" ")),
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            RemediationStore::parse(Some("redis"), None, Some("redis://127.0.0.1:6379")).ok(),
            Some(RemediationStore::Redis {
                url: "redis://127.0.0.1:6379".to_owned()
            })
        );
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(matches!(
            RemediationStore::parse(Some("postgres"), None, None),
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            RemediationStore::parse(Some("memory"), None, None).ok(),
            Some(RemediationStore::Memory)
        );
    }
}
