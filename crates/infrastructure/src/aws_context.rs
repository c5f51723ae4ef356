//! Shared AWS configuration.
//!
//! Credentials and defaults are loaded once for the home region. Regional
//! clients are derived from the same configuration with the region replaced.

use std::sync::Arc;

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Loaded AWS configuration used to build service clients.
#[derive(Clone)]
pub struct AwsContext {
    config: Arc<SdkConfig>,
    home_region: String,
}

impl AwsContext {
    /// Loads AWS configuration from the environment for `home_region`.
    pub async fn load(home_region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(home_region.to_owned()))
            .load()
            .await;

        Self::from_sdk_config(config, home_region)
    }

    /// Wraps an already loaded configuration.
    #[must_use]
    pub fn from_sdk_config(config: SdkConfig, home_region: &str) -> Self {
        Self {
            config: Arc::new(config),
            home_region: home_region.to_owned(),
        }
    }

    /// Returns the region used for account-wide clients.
    #[must_use]
    pub fn home_region(&self) -> &str {
        self.home_region.as_str()
    }

    fn regional_config(&self, region: &str) -> SdkConfig {
        self.config
            .to_builder()
            .region(Region::new(region.to_owned()))
            .build()
    }

    /// EC2 client for `region`.
    #[must_use]
    pub fn ec2_client(&self, region: &str) -> aws_sdk_ec2::Client {
        aws_sdk_ec2::Client::new(&self.regional_config(region))
    }

    /// SageMaker client for `region`.
    #[must_use]
    pub fn sagemaker_client(&self, region: &str) -> aws_sdk_sagemaker::Client {
        aws_sdk_sagemaker::Client::new(&self.regional_config(region))
    }

    /// CloudTrail client for `region`.
    #[must_use]
    pub fn cloudtrail_client(&self, region: &str) -> aws_sdk_cloudtrail::Client {
        aws_sdk_cloudtrail::Client::new(&self.regional_config(region))
    }

    /// DynamoDB client in the home region.
    #[must_use]
    pub fn dynamodb_client(&self) -> aws_sdk_dynamodb::Client {
        aws_sdk_dynamodb::Client::new(&self.config)
    }

    /// SES client in the home region.
    #[must_use]
    pub fn ses_client(&self) -> aws_sdk_sesv2::Client {
        aws_sdk_sesv2::Client::new(&self.config)
    }
}

impl std::fmt::Debug for AwsContext {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AwsContext")
            .field("home_region", &self.home_region)
            .finish_non_exhaustive()
    }
}
