use async_trait::async_trait;
use chrono::{DateTime, Utc};

use shutoff_core::{AppError, AppResult};
use shutoff_domain::{RemediationRequest, RemediationToken, ResourceKind};

/// Remediation request as persisted in the key-value store.
///
/// Every attribute is stored as a string so records written by other tools
/// stay readable; `kind` is only validated when the record is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediationRecord {
    /// Token the record is keyed by.
    pub request_id: String,
    /// Stored resource kind value.
    pub kind: String,
    /// Resource to stop.
    pub resource_id: String,
    /// Region of the resource.
    pub region: String,
    /// Insert time. Informational only; records never expire.
    pub created_at: Option<DateTime<Utc>>,
}

impl RemediationRecord {
    /// Builds the persisted form of a new request.
    #[must_use]
    pub fn from_request(request: &RemediationRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            request_id: request.token().as_str().to_owned(),
            kind: request.kind().as_str().to_owned(),
            resource_id: request.resource_id().to_owned(),
            region: request.region().to_owned(),
            created_at: Some(created_at),
        }
    }

    /// Converts the stored attributes back into a request.
    ///
    /// Unknown kinds surface as [`AppError::Unsupported`]; any other invalid
    /// attribute is a store integrity problem.
    pub fn into_request(self) -> AppResult<RemediationRequest> {
        let kind = self.kind.parse::<ResourceKind>()?;
        let token = RemediationToken::parse(self.request_id.as_str()).map_err(|error| {
            AppError::Internal(format!("stored remediation request is invalid: {error}"))
        })?;

        RemediationRequest::new(token, kind, self.resource_id, self.region).map_err(|error| {
            AppError::Internal(format!("stored remediation request is invalid: {error}"))
        })
    }
}

/// Repository port for remediation request persistence.
#[async_trait]
pub trait RemediationRepository: Send + Sync {
    /// Inserts a new record.
    ///
    /// Must fail with [`AppError::Conflict`] instead of overwriting when a
    /// record with the same `request_id` exists.
    async fn insert_request(&self, record: RemediationRecord) -> AppResult<()>;

    /// Point lookup by token.
    async fn find_request(&self, request_id: &str) -> AppResult<Option<RemediationRecord>>;
}
