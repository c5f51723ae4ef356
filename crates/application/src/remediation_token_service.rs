//! Remediation token issuance and lookup.
//!
//! Tokens carry 128 bits from the OS random source and are inserted with a
//! conditional write, so an existing request is never overwritten. Tokens do
//! not expire and are not consumed on use.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use shutoff_core::{AppError, AppResult};
use shutoff_domain::{RemediationRequest, RemediationToken, ResourceKind};

use crate::remediation_ports::{RemediationRecord, RemediationRepository};

mod token_crypto;

use token_crypto::generate_token;

/// Insert attempts before giving up on finding an unused token.
const MAX_CREATE_ATTEMPTS: usize = 3;

/// Application service persisting and resolving remediation requests.
#[derive(Clone)]
pub struct RemediationTokenService {
    repository: Arc<dyn RemediationRepository>,
}

impl RemediationTokenService {
    /// Creates a new remediation token service.
    #[must_use]
    pub fn new(repository: Arc<dyn RemediationRepository>) -> Self {
        Self { repository }
    }

    /// Persists a request to stop one resource and returns its fresh token.
    pub async fn create(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        region: &str,
    ) -> AppResult<RemediationToken> {
        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let request = RemediationRequest::new(generate_token()?, kind, resource_id, region)?;
            let record = RemediationRecord::from_request(&request, Utc::now());

            match self.repository.insert_request(record).await {
                Ok(()) => return Ok(request.token().clone()),
                Err(AppError::Conflict(message)) => {
                    warn!(
                        attempt,
                        kind = %kind,
                        resource_id,
                        region,
                        reason = %message,
                        "remediation token collided with an existing request"
                    );
                }
                Err(error) => return Err(error),
            }
        }

        Err(AppError::Internal(format!(
            "failed to allocate an unused remediation token after {MAX_CREATE_ATTEMPTS} attempts"
        )))
    }

    /// Resolves a token back to the request it was created for.
    pub async fn resolve(&self, token: &RemediationToken) -> AppResult<RemediationRequest> {
        let record = self
            .repository
            .find_request(token.as_str())
            .await?
            .ok_or_else(|| AppError::NotFound("remediation request does not exist".to_owned()))?;

        record.into_request()
    }
}

#[cfg(test)]
mod tests;
