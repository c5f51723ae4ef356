use shutoff_core::AppResult;
use shutoff_domain::{AuditEvent, Ownership, ResourceKind, RunningResource};

use crate::audit_ports::AuditTrail;
use crate::ownership_resolver::resolve_ownership;

/// Most audit events read per region and kind.
///
/// Older creation events beyond this cap are never read.
pub const AUDIT_LOOKUP_LIMIT: i32 = 100;

/// Creation events of one resource kind in one region.
#[derive(Debug, Clone)]
pub struct AuditEventIndex {
    kind: ResourceKind,
    region: String,
    events: Vec<AuditEvent>,
}

impl AuditEventIndex {
    /// Fetches the creation events for `kind` in `region`.
    pub async fn load(
        audit_trail: &dyn AuditTrail,
        region: &str,
        kind: ResourceKind,
    ) -> AppResult<Self> {
        let events = audit_trail
            .lookup_events(region, kind.creation_event_name(), AUDIT_LOOKUP_LIMIT)
            .await?;

        Ok(Self::from_events(kind, region, events))
    }

    /// Builds an index from already fetched events.
    #[must_use]
    pub fn from_events(kind: ResourceKind, region: &str, events: Vec<AuditEvent>) -> Self {
        Self {
            kind,
            region: region.to_owned(),
            events,
        }
    }

    /// Returns the indexed region.
    #[must_use]
    pub fn region(&self) -> &str {
        self.region.as_str()
    }

    /// Returns the events in audit log order.
    #[must_use]
    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    /// Resolves who created `resource`.
    #[must_use]
    pub fn owner_of(&self, resource: &RunningResource) -> Ownership {
        match resource.audit_match_key() {
            Some(match_key) => resolve_ownership(self.kind, match_key, &self.events),
            None => Ownership::Unknown,
        }
    }
}
