//! Shutoff scan worker runtime.

#![forbid(unsafe_code)]

mod worker_config;

use std::sync::Arc;

use shutoff_application::{
    AuditTrail, EmailService, NotificationComposer, RemediationTokenService, ResourceProvider,
    ResourceScanner, ScanOrchestrator,
};
use shutoff_core::{AppError, AppResult};
use shutoff_infrastructure::{
    AwsContext, CloudTrailAuditTrail, ConsoleEmailService, Ec2ComputeProvider,
    Ec2RegionDirectory, SageMakerNotebookProvider, SesEmailService, SmtpEmailService,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::worker_config::{EmailProvider, WorkerConfig};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let aws = AwsContext::load(config.home_region.as_str()).await;
    let orchestrator = build_orchestrator(&config, &aws)?;

    info!(
        home_region = %config.home_region,
        email_provider = config.email_provider.name(),
        remediation_enabled = config.remediation_link.is_some(),
        scan_concurrency = config.scan_concurrency,
        scan_interval_seconds = config.scan_interval.map(|interval| interval.as_secs()),
        "shutoff-worker started"
    );

    let Some(scan_interval) = config.scan_interval else {
        orchestrator.run().await?;
        return Ok(());
    };

    loop {
        if let Err(error) = orchestrator.run().await {
            error!(error = %error, "scan pass failed");
        }
        tokio::time::sleep(scan_interval).await;
    }
}

fn build_orchestrator(config: &WorkerConfig, aws: &AwsContext) -> AppResult<ScanOrchestrator> {
    let audit_trail: Arc<dyn AuditTrail> = Arc::new(CloudTrailAuditTrail::new(aws.clone()));
    let email_service = build_email_service(config, aws);
    let composer = NotificationComposer::new(config.distribution_list.iter().cloned());

    let remediation = match &config.remediation_link {
        Some(link_builder) => {
            let repository = config.remediation_store.connect(aws)?;
            Some((RemediationTokenService::new(repository), link_builder.clone()))
        }
        None => None,
    };

    let providers: [Arc<dyn ResourceProvider>; 2] = [
        Arc::new(Ec2ComputeProvider::new(aws.clone())),
        Arc::new(SageMakerNotebookProvider::new(aws.clone())),
    ];

    let scanners = providers
        .into_iter()
        .map(|provider| {
            let scanner = ResourceScanner::new(
                provider,
                audit_trail.clone(),
                composer.clone(),
                email_service.clone(),
            );
            match &remediation {
                Some((token_service, link_builder)) => {
                    scanner.with_remediation(token_service.clone(), link_builder.clone())
                }
                None => scanner,
            }
        })
        .collect();

    Ok(ScanOrchestrator::new(
        Arc::new(Ec2RegionDirectory::new(aws.clone())),
        scanners,
    )
    .with_concurrency(config.scan_concurrency))
}

fn build_email_service(config: &WorkerConfig, aws: &AwsContext) -> Arc<dyn EmailService> {
    match &config.email_provider {
        EmailProvider::Ses { sender } => Arc::new(SesEmailService::new(aws, sender.as_str())),
        EmailProvider::Smtp(smtp) => Arc::new(SmtpEmailService::new(smtp.clone())),
        EmailProvider::Console => Arc::new(ConsoleEmailService::new()),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
