//! Port fakes shared by the service tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;

use shutoff_core::{AppError, AppResult};
use shutoff_domain::{
    AuditEvent, AuditResourceRef, InstanceSummary, NotificationMessage, ResourceKind,
};

use crate::{
    AuditTrail, EmailService, RegionDirectory, RemediationRecord, RemediationRepository,
    ResourceProvider,
};

pub(crate) fn run_instances_event(actor: &str, instance_ids: &[&str]) -> AuditEvent {
    AuditEvent::new(
        "RunInstances",
        Some(actor.to_owned()),
        instance_ids
            .iter()
            .map(|instance_id| AuditResourceRef {
                resource_type: "AWS::EC2::Instance".to_owned(),
                resource_name: (*instance_id).to_owned(),
            })
            .collect(),
        None,
    )
}

pub(crate) fn notebook_created_event(actor: &str, arn: &str) -> AuditEvent {
    AuditEvent::new(
        "CreateNotebookInstance",
        Some(actor.to_owned()),
        Vec::new(),
        Some(json!({"responseElements": {"notebookInstanceArn": arn}})),
    )
}

pub(crate) fn instance(id: &str, state: &str) -> InstanceSummary {
    InstanceSummary {
        id: id.to_owned(),
        state: state.to_owned(),
        arn: None,
    }
}

#[derive(Default)]
pub(crate) struct FakeAuditTrail {
    events: HashMap<(String, String), Vec<AuditEvent>>,
    failing_regions: HashSet<String>,
    pub(crate) lookups: Mutex<Vec<(String, String, i32)>>,
}

impl FakeAuditTrail {
    pub(crate) fn with_events(
        mut self,
        region: &str,
        event_name: &str,
        events: Vec<AuditEvent>,
    ) -> Self {
        self.events
            .insert((region.to_owned(), event_name.to_owned()), events);
        self
    }

    pub(crate) fn failing_in(mut self, region: &str) -> Self {
        self.failing_regions.insert(region.to_owned());
        self
    }
}

#[async_trait]
impl AuditTrail for FakeAuditTrail {
    async fn lookup_events(
        &self,
        region: &str,
        event_name: &str,
        max_results: i32,
    ) -> AppResult<Vec<AuditEvent>> {
        self.lookups
            .lock()
            .await
            .push((region.to_owned(), event_name.to_owned(), max_results));

        if self.failing_regions.contains(region) {
            return Err(AppError::Internal(format!(
                "simulated audit lookup failure in '{region}'"
            )));
        }

        Ok(self
            .events
            .get(&(region.to_owned(), event_name.to_owned()))
            .cloned()
            .unwrap_or_default())
    }
}

pub(crate) struct FakeResourceProvider {
    kind: ResourceKind,
    instances: HashMap<String, Vec<InstanceSummary>>,
    failing_regions: HashSet<String>,
    pub(crate) stopped: Mutex<Vec<(String, String)>>,
}

impl FakeResourceProvider {
    pub(crate) fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            instances: HashMap::new(),
            failing_regions: HashSet::new(),
            stopped: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_instances(mut self, region: &str, instances: Vec<InstanceSummary>) -> Self {
        self.instances.insert(region.to_owned(), instances);
        self
    }

    pub(crate) fn failing_in(mut self, region: &str) -> Self {
        self.failing_regions.insert(region.to_owned());
        self
    }
}

#[async_trait]
impl ResourceProvider for FakeResourceProvider {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    async fn list_instances(&self, region: &str) -> AppResult<Vec<InstanceSummary>> {
        if self.failing_regions.contains(region) {
            return Err(AppError::Internal(format!(
                "simulated listing failure in '{region}'"
            )));
        }

        Ok(self.instances.get(region).cloned().unwrap_or_default())
    }

    async fn stop_instance(&self, region: &str, resource_id: &str) -> AppResult<()> {
        if self.failing_regions.contains(region) {
            return Err(AppError::Internal(format!(
                "simulated stop failure in '{region}'"
            )));
        }

        self.stopped
            .lock()
            .await
            .push((region.to_owned(), resource_id.to_owned()));
        Ok(())
    }
}

pub(crate) struct FakeRegionDirectory {
    regions: AppResult<Vec<String>>,
}

impl FakeRegionDirectory {
    pub(crate) fn new(regions: &[&str]) -> Self {
        Self {
            regions: Ok(regions.iter().map(|region| (*region).to_owned()).collect()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            regions: Err(AppError::Internal(
                "simulated region listing failure".to_owned(),
            )),
        }
    }
}

#[async_trait]
impl RegionDirectory for FakeRegionDirectory {
    async fn list_regions(&self) -> AppResult<Vec<String>> {
        match &self.regions {
            Ok(regions) => Ok(regions.clone()),
            Err(error) => Err(AppError::Internal(error.to_string())),
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingEmailService {
    failing_recipient: Option<String>,
    pub(crate) sent: Mutex<Vec<NotificationMessage>>,
}

impl RecordingEmailService {
    pub(crate) fn failing_for(recipient: &str) -> Self {
        Self {
            failing_recipient: Some(recipient.to_owned()),
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send_email(&self, message: &NotificationMessage) -> AppResult<String> {
        if let Some(failing_recipient) = &self.failing_recipient
            && message.recipients().contains(failing_recipient)
        {
            return Err(AppError::Internal(format!(
                "simulated delivery failure for '{failing_recipient}'"
            )));
        }

        let mut sent = self.sent.lock().await;
        sent.push(message.clone());
        Ok(format!("delivery-{}", sent.len()))
    }
}

#[derive(Default)]
pub(crate) struct FakeRemediationRepository {
    pub(crate) records: Mutex<HashMap<String, RemediationRecord>>,
    pub(crate) conflicts_remaining: Mutex<usize>,
    pub(crate) insert_attempts: Mutex<usize>,
    fail_storage: bool,
}

impl FakeRemediationRepository {
    pub(crate) fn failing() -> Self {
        Self {
            fail_storage: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl RemediationRepository for FakeRemediationRepository {
    async fn insert_request(&self, record: RemediationRecord) -> AppResult<()> {
        *self.insert_attempts.lock().await += 1;

        if self.fail_storage {
            return Err(AppError::Internal(
                "simulated remediation store failure".to_owned(),
            ));
        }

        let mut conflicts_remaining = self.conflicts_remaining.lock().await;
        if *conflicts_remaining > 0 {
            *conflicts_remaining -= 1;
            return Err(AppError::Conflict(
                "remediation request already exists".to_owned(),
            ));
        }

        let mut records = self.records.lock().await;
        if records.contains_key(&record.request_id) {
            return Err(AppError::Conflict(
                "remediation request already exists".to_owned(),
            ));
        }

        records.insert(record.request_id.clone(), record);
        Ok(())
    }

    async fn find_request(&self, request_id: &str) -> AppResult<Option<RemediationRecord>> {
        if self.fail_storage {
            return Err(AppError::Internal(
                "simulated remediation store failure".to_owned(),
            ));
        }

        Ok(self.records.lock().await.get(request_id).cloned())
    }
}
