//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod notification;
mod remediation;
mod resource;

pub use audit::{
    AuditEvent, AuditResourceRef, MalformedAuditPayload, Ownership, ResourceReference,
    UNKNOWN_OWNER_PLACEHOLDER,
};
pub use notification::{NOTIFICATION_SUBJECT, NotificationMessage};
pub use remediation::{REMEDIATION_TOKEN_BYTES, RemediationRequest, RemediationToken};
pub use resource::{InstanceSummary, ResourceKind, RunningResource};
