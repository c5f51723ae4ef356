use serde::{Deserialize, Serialize};

/// API response for health checks.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Query string of the remediation callback.
#[derive(Debug, Default, Deserialize)]
pub struct RemediationQuery {
    pub request_id: Option<String>,
}
