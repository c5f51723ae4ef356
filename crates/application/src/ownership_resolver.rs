use shutoff_domain::{AuditEvent, Ownership, ResourceKind};
use tracing::debug;

/// Attributes a resource to the principal of the first audit event that
/// references it.
///
/// Events are scanned in the order the audit log returned them and the first
/// reference with the kind's resource type and an id equal to `match_key`
/// wins. A resource that was re-created under another principal is attributed
/// to whichever event comes first; there is no disambiguation. Events whose
/// payload lacks the expected linkage are skipped.
#[must_use]
pub fn resolve_ownership(kind: ResourceKind, match_key: &str, events: &[AuditEvent]) -> Ownership {
    let expected_type = kind.audit_resource_type();

    for event in events {
        let references = match event.references(kind) {
            Ok(references) => references,
            Err(error) => {
                debug!(kind = %kind, error = %error, "skipping malformed audit event");
                continue;
            }
        };

        let matched = references.iter().any(|reference| {
            reference.resource_type == expected_type && reference.resource_id == match_key
        });

        if matched {
            return Ownership::from_actor(event.actor());
        }
    }

    Ownership::Unknown
}
