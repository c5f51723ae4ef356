use async_trait::async_trait;

use shutoff_core::AppResult;
use shutoff_domain::AuditEvent;

/// Port for the region-scoped audit log.
#[async_trait]
pub trait AuditTrail: Send + Sync {
    /// Returns at most `max_results` events named `event_name` recorded in
    /// `region`, in the order the audit log returns them.
    ///
    /// An empty result is not an error.
    async fn lookup_events(
        &self,
        region: &str,
        event_name: &str,
        max_results: i32,
    ) -> AppResult<Vec<AuditEvent>>;
}
