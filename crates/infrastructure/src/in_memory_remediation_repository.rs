use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use shutoff_application::{RemediationRecord, RemediationRepository};
use shutoff_core::{AppError, AppResult};

/// In-memory remediation store for tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryRemediationRepository {
    records: RwLock<HashMap<String, RemediationRecord>>,
}

impl InMemoryRemediationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RemediationRepository for InMemoryRemediationRepository {
    async fn insert_request(&self, record: RemediationRecord) -> AppResult<()> {
        let mut records = self.records.write().await;

        if records.contains_key(&record.request_id) {
            return Err(AppError::Conflict(format!(
                "remediation request '{}' already exists",
                record.request_id
            )));
        }

        records.insert(record.request_id.clone(), record);
        Ok(())
    }

    async fn find_request(&self, request_id: &str) -> AppResult<Option<RemediationRecord>> {
        Ok(self.records.read().await.get(request_id).cloned())
    }
}
