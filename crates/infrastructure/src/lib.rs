//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod aws_context;
mod aws_error;
mod cloudtrail_audit_trail;
mod console_email_service;
mod dynamodb_remediation_repository;
mod ec2_compute_provider;
mod ec2_region_directory;
mod in_memory_remediation_repository;
mod redis_remediation_repository;
mod remediation_attributes;
mod remediation_store;
mod sagemaker_notebook_provider;
mod ses_email_service;
mod smtp_email_service;

pub use aws_context::AwsContext;
pub use cloudtrail_audit_trail::CloudTrailAuditTrail;
pub use console_email_service::ConsoleEmailService;
pub use dynamodb_remediation_repository::{
    DEFAULT_REMEDIATION_TABLE_NAME, DynamoDbRemediationRepository,
};
pub use ec2_compute_provider::Ec2ComputeProvider;
pub use ec2_region_directory::Ec2RegionDirectory;
pub use in_memory_remediation_repository::InMemoryRemediationRepository;
pub use redis_remediation_repository::RedisRemediationRepository;
pub use remediation_store::RemediationStore;
pub use sagemaker_notebook_provider::SageMakerNotebookProvider;
pub use ses_email_service::SesEmailService;
pub use smtp_email_service::{SmtpEmailConfig, SmtpEmailService};
