use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use shutoff_core::AppError;
use shutoff_infrastructure::RemediationStore;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub home_region: String,
    pub remediation_store: RemediationStore,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let home_region = optional_env("SHUTOFF_HOME_REGION")
            .unwrap_or_else(|| "eu-west-1".to_owned());

        let remediation_store = RemediationStore::parse(
            optional_env("REMEDIATION_STORE").as_deref(),
            optional_env("REMEDIATION_TABLE_NAME").as_deref(),
            optional_env("REDIS_URL").as_deref(),
        )?;

        Ok(Self {
            api_host,
            api_port,
            home_region,
            remediation_store,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
