use std::fmt::{Display, Formatter};
use std::str::FromStr;

use shutoff_core::{AppError, AppResult, NonEmptyString};

/// Compute categories the scanner reports on and the callback can stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// General purpose compute instance (EC2).
    Compute,
    /// Managed notebook instance (SageMaker).
    Notebook,
}

impl ResourceKind {
    /// Returns the stable storage value persisted with remediation requests.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compute => "ec2",
            Self::Notebook => "sagemaker",
        }
    }

    /// Returns all known resource kinds.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ResourceKind] = &[ResourceKind::Compute, ResourceKind::Notebook];

        ALL
    }

    /// Human readable label used in notifications and logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Compute => "instance",
            Self::Notebook => "notebook instance",
        }
    }

    /// Audit event name emitted when a resource of this kind is created.
    #[must_use]
    pub fn creation_event_name(&self) -> &'static str {
        match self {
            Self::Compute => "RunInstances",
            Self::Notebook => "CreateNotebookInstance",
        }
    }

    /// Resource type tag carried by audit resource references of this kind.
    #[must_use]
    pub fn audit_resource_type(&self) -> &'static str {
        match self {
            Self::Compute => "AWS::EC2::Instance",
            Self::Notebook => "AWS::SageMaker::NotebookInstance",
        }
    }

    /// Lifecycle states that count as "still running" for this kind.
    #[must_use]
    pub fn reportable_states(&self) -> &'static [&'static str] {
        match self {
            Self::Compute => &["running"],
            Self::Notebook => &["Pending", "InService"],
        }
    }

    /// Returns whether an instance in `state` should be reported.
    #[must_use]
    pub fn is_reportable_state(&self, state: &str) -> bool {
        self.reportable_states().contains(&state)
    }
}

impl Display for ResourceKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ec2" => Ok(Self::Compute),
            "sagemaker" => Ok(Self::Notebook),
            _ => Err(AppError::Unsupported(format!(
                "resource kind '{value}' is not supported"
            ))),
        }
    }
}

/// One row of a resource listing before lifecycle filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSummary {
    /// Instance id (compute) or notebook name (notebook).
    pub id: String,
    /// Provider lifecycle state, verbatim.
    pub state: String,
    /// Full resource name, when the listing reports one.
    pub arn: Option<String>,
}

/// A resource found running during one scan pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningResource {
    kind: ResourceKind,
    id: NonEmptyString,
    region: NonEmptyString,
    arn: Option<String>,
}

impl RunningResource {
    /// Creates a running resource.
    pub fn new(
        kind: ResourceKind,
        id: impl Into<String>,
        region: impl Into<String>,
        arn: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            kind,
            id: NonEmptyString::new(id)?,
            region: NonEmptyString::new(region)?,
            arn: arn.filter(|value| !value.trim().is_empty()),
        })
    }

    /// Builds a running resource from a listing row.
    pub fn from_summary(
        kind: ResourceKind,
        region: &str,
        summary: InstanceSummary,
    ) -> AppResult<Self> {
        Self::new(kind, summary.id, region, summary.arn)
    }

    /// Returns the resource kind.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns the id used to stop the resource.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the region the resource runs in.
    #[must_use]
    pub fn region(&self) -> &str {
        self.region.as_str()
    }

    /// Returns the full resource name, if known.
    #[must_use]
    pub fn arn(&self) -> Option<&str> {
        self.arn.as_deref()
    }

    /// Identifier audit events reference this resource by.
    ///
    /// Notebook creation events only carry the ARN, so a notebook without one
    /// cannot be attributed.
    #[must_use]
    pub fn audit_match_key(&self) -> Option<&str> {
        match self.kind {
            ResourceKind::Compute => Some(self.id()),
            ResourceKind::Notebook => self.arn(),
        }
    }
}
