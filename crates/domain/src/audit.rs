//! Audit trail events and the ownership derived from them.

use serde_json::Value;
use thiserror::Error;

use crate::ResourceKind;

/// Greeting used when no audit event names the resource owner.
pub const UNKNOWN_OWNER_PLACEHOLDER: &str = "unknown owner";

/// Resource touched by an audit event, as reported by the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditResourceRef {
    /// Provider resource type tag, e.g. `AWS::EC2::Instance`.
    pub resource_type: String,
    /// Free-text resource identifier.
    pub resource_name: String,
}

/// Borrowed view of one resource reference extracted from an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceReference<'a> {
    /// Resource type tag.
    pub resource_type: &'a str,
    /// Resource identifier.
    pub resource_id: &'a str,
}

/// Raised when an event lacks the linkage a resource kind reads from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("audit event '{event_name}' has no '{key}' in its payload")]
pub struct MalformedAuditPayload {
    /// Name of the offending event.
    pub event_name: String,
    /// Payload path that was expected.
    pub key: &'static str,
}

/// Immutable audit log record of an API action.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    event_name: String,
    actor: Option<String>,
    resources: Vec<AuditResourceRef>,
    payload: Option<Value>,
}

const RESPONSE_ELEMENTS_KEY: &str = "responseElements";
const NOTEBOOK_ARN_KEY: &str = "responseElements.notebookInstanceArn";

impl AuditEvent {
    /// Creates an audit event.
    #[must_use]
    pub fn new(
        event_name: impl Into<String>,
        actor: Option<String>,
        resources: Vec<AuditResourceRef>,
        payload: Option<Value>,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            actor: actor.filter(|value| !value.trim().is_empty()),
            resources,
            payload,
        }
    }

    /// Returns the event name.
    #[must_use]
    pub fn event_name(&self) -> &str {
        self.event_name.as_str()
    }

    /// Returns the principal that performed the action, if recorded.
    #[must_use]
    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    /// Returns the resources attached to the event by the audit log.
    #[must_use]
    pub fn resources(&self) -> &[AuditResourceRef] {
        &self.resources
    }

    /// Returns the raw event payload.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Extracts the references this event holds for resources of `kind`.
    ///
    /// Compute events list their instances in the resource table. Notebook
    /// events only report the created ARN inside the response payload, which
    /// is not guaranteed to be present.
    pub fn references(
        &self,
        kind: ResourceKind,
    ) -> Result<Vec<ResourceReference<'_>>, MalformedAuditPayload> {
        match kind {
            ResourceKind::Compute => Ok(self
                .resources
                .iter()
                .map(|resource| ResourceReference {
                    resource_type: resource.resource_type.as_str(),
                    resource_id: resource.resource_name.as_str(),
                })
                .collect()),
            ResourceKind::Notebook => {
                let response = self
                    .payload
                    .as_ref()
                    .and_then(|payload| payload.get(RESPONSE_ELEMENTS_KEY))
                    .ok_or_else(|| self.malformed(RESPONSE_ELEMENTS_KEY))?;
                let arn = response
                    .get("notebookInstanceArn")
                    .and_then(Value::as_str)
                    .ok_or_else(|| self.malformed(NOTEBOOK_ARN_KEY))?;

                Ok(vec![ResourceReference {
                    resource_type: kind.audit_resource_type(),
                    resource_id: arn,
                }])
            }
        }
    }

    fn malformed(&self, key: &'static str) -> MalformedAuditPayload {
        MalformedAuditPayload {
            event_name: self.event_name.clone(),
            key,
        }
    }
}

/// Who a running resource is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ownership {
    /// Principal recorded by the matching audit event.
    Known(String),
    /// No audit event matched, or the match carried no principal.
    Unknown,
}

impl Ownership {
    /// Builds ownership from an optional actor.
    #[must_use]
    pub fn from_actor(actor: Option<&str>) -> Self {
        match actor {
            Some(actor) => Self::Known(actor.to_owned()),
            None => Self::Unknown,
        }
    }

    /// Returns the resolved actor.
    #[must_use]
    pub fn actor(&self) -> Option<&str> {
        match self {
            Self::Known(actor) => Some(actor.as_str()),
            Self::Unknown => None,
        }
    }

    /// Returns the actor when it can receive mail.
    #[must_use]
    pub fn email_address(&self) -> Option<&str> {
        self.actor().filter(|actor| actor.contains('@'))
    }

    /// Name used to greet the owner.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        self.actor().unwrap_or(UNKNOWN_OWNER_PLACEHOLDER)
    }
}
