//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_event_index;
mod audit_ports;
mod inventory_ports;
mod notification_composer;
mod notification_ports;
mod ownership_resolver;
mod remediation_executor;
mod remediation_ports;
mod remediation_token_service;
mod resource_scanner;
mod scan_orchestrator;

#[cfg(test)]
mod test_support;

pub use audit_event_index::{AUDIT_LOOKUP_LIMIT, AuditEventIndex};
pub use audit_ports::AuditTrail;
pub use inventory_ports::{RegionDirectory, ResourceProvider, ResourceProviders};
pub use notification_composer::{
    NotificationComposer, REQUEST_ID_PARAMETER, RemediationLinkBuilder,
};
pub use notification_ports::EmailService;
pub use ownership_resolver::resolve_ownership;
pub use remediation_executor::RemediationExecutor;
pub use remediation_ports::{RemediationRecord, RemediationRepository};
pub use remediation_token_service::RemediationTokenService;
pub use resource_scanner::{ResourceScanner, ScanReport};
pub use scan_orchestrator::{DEFAULT_SCAN_CONCURRENCY, PassSummary, ScanOrchestrator};
