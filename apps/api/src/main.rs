//! Shutoff remediation callback API.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use shutoff_application::{RemediationExecutor, RemediationTokenService, ResourceProviders};
use shutoff_core::AppError;
use shutoff_infrastructure::{AwsContext, Ec2ComputeProvider, SageMakerNotebookProvider};
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let aws = AwsContext::load(config.home_region.as_str()).await;

    let repository = config.remediation_store.connect(&aws)?;
    let providers = ResourceProviders::new()
        .with_provider(Arc::new(Ec2ComputeProvider::new(aws.clone())))
        .with_provider(Arc::new(SageMakerNotebookProvider::new(aws.clone())));
    let app_state = AppState {
        remediation_executor: RemediationExecutor::new(
            RemediationTokenService::new(repository),
            providers,
        ),
    };

    let app = api_router::build_router(app_state);
    let address = config.socket_address()?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, home_region = %config.home_region, "shutoff-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
