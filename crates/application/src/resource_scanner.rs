use std::sync::Arc;

use tracing::{info, warn};

use shutoff_core::AppResult;
use shutoff_domain::{Ownership, ResourceKind, RunningResource};

use crate::audit_event_index::AuditEventIndex;
use crate::audit_ports::AuditTrail;
use crate::inventory_ports::ResourceProvider;
use crate::notification_composer::{NotificationComposer, RemediationLinkBuilder};
use crate::notification_ports::EmailService;
use crate::remediation_token_service::RemediationTokenService;

/// Outcome of scanning one region for one resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Scanned resource kind.
    pub kind: ResourceKind,
    /// Scanned region.
    pub region: String,
    /// Resources found in a reportable state.
    pub running: usize,
    /// Resources attributed to an actor.
    pub attributed: usize,
    /// Notifications handed to the email service.
    pub notified: usize,
    /// Resources whose notification could not be prepared or delivered.
    pub failed: usize,
}

impl ScanReport {
    fn empty(kind: ResourceKind, region: &str) -> Self {
        Self {
            kind,
            region: region.to_owned(),
            running: 0,
            attributed: 0,
            notified: 0,
            failed: 0,
        }
    }
}

#[derive(Clone)]
struct Remediation {
    token_service: RemediationTokenService,
    link_builder: RemediationLinkBuilder,
}

/// Scans one resource kind and notifies the owners of running resources.
#[derive(Clone)]
pub struct ResourceScanner {
    provider: Arc<dyn ResourceProvider>,
    audit_trail: Arc<dyn AuditTrail>,
    composer: NotificationComposer,
    email_service: Arc<dyn EmailService>,
    remediation: Option<Remediation>,
}

impl ResourceScanner {
    /// Creates a scanner that notifies without remediation links.
    #[must_use]
    pub fn new(
        provider: Arc<dyn ResourceProvider>,
        audit_trail: Arc<dyn AuditTrail>,
        composer: NotificationComposer,
        email_service: Arc<dyn EmailService>,
    ) -> Self {
        Self {
            provider,
            audit_trail,
            composer,
            email_service,
            remediation: None,
        }
    }

    /// Enables one-click remediation links in notifications.
    #[must_use]
    pub fn with_remediation(
        mut self,
        token_service: RemediationTokenService,
        link_builder: RemediationLinkBuilder,
    ) -> Self {
        self.remediation = Some(Remediation {
            token_service,
            link_builder,
        });
        self
    }

    /// Returns the resource kind this scanner covers.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.provider.kind()
    }

    /// Scans `region` and notifies about every running resource found.
    ///
    /// Listing and audit failures abort the scan of this region. Failures
    /// preparing or delivering a single notification are logged and counted.
    pub async fn scan(&self, region: &str) -> AppResult<ScanReport> {
        let kind = self.kind();
        let mut report = ScanReport::empty(kind, region);

        let resources: Vec<RunningResource> = self
            .provider
            .list_instances(region)
            .await?
            .into_iter()
            .filter(|summary| kind.is_reportable_state(summary.state.as_str()))
            .filter_map(
                |summary| match RunningResource::from_summary(kind, region, summary) {
                    Ok(resource) => Some(resource),
                    Err(error) => {
                        warn!(kind = %kind, region, error = %error, "skipping unnamed instance");
                        None
                    }
                },
            )
            .collect();

        report.running = resources.len();
        if resources.is_empty() {
            return Ok(report);
        }

        let audit_index = AuditEventIndex::load(self.audit_trail.as_ref(), region, kind).await?;

        for resource in &resources {
            let ownership = audit_index.owner_of(resource);
            if ownership.actor().is_some() {
                report.attributed += 1;
            }

            match self.notify(resource, &ownership).await {
                Ok(delivery_id) => {
                    report.notified += 1;
                    info!(
                        kind = %kind,
                        region,
                        resource_id = resource.id(),
                        owner = ownership.greeting_name(),
                        delivery_id = %delivery_id,
                        "running resource notification sent"
                    );
                }
                Err(error) => {
                    report.failed += 1;
                    warn!(
                        kind = %kind,
                        region,
                        resource_id = resource.id(),
                        error = %error,
                        "failed to notify about running resource"
                    );
                }
            }
        }

        Ok(report)
    }

    async fn notify(&self, resource: &RunningResource, ownership: &Ownership) -> AppResult<String> {
        let remediation_link = match &self.remediation {
            Some(remediation) => {
                let token = remediation
                    .token_service
                    .create(resource.kind(), resource.id(), resource.region())
                    .await?;
                Some(remediation.link_builder.link_for(&token))
            }
            None => None,
        };

        let message = self
            .composer
            .compose(ownership, resource, remediation_link.as_ref());

        self.email_service.send_email(&message).await
    }
}
