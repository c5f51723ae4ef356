//! EC2-backed compute instance provider.

use async_trait::async_trait;
use aws_sdk_ec2::types::{Filter, Instance};
use tracing::debug;

use shutoff_application::ResourceProvider;
use shutoff_core::AppResult;
use shutoff_domain::{InstanceSummary, ResourceKind};

use crate::aws_context::AwsContext;
use crate::aws_error::aws_error;

/// Lists and stops EC2 instances.
#[derive(Clone, Debug)]
pub struct Ec2ComputeProvider {
    aws: AwsContext,
}

impl Ec2ComputeProvider {
    /// Creates a provider deriving regional clients from `aws`.
    #[must_use]
    pub fn new(aws: AwsContext) -> Self {
        Self { aws }
    }
}

fn summarize(instance: &Instance) -> Option<InstanceSummary> {
    let id = instance.instance_id()?;
    let state = instance
        .state()
        .and_then(|state| state.name())
        .map(|name| name.as_str().to_owned())
        .unwrap_or_default();

    Some(InstanceSummary {
        id: id.to_owned(),
        state,
        arn: None,
    })
}

#[async_trait]
impl ResourceProvider for Ec2ComputeProvider {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Compute
    }

    async fn list_instances(&self, region: &str) -> AppResult<Vec<InstanceSummary>> {
        let client = self.aws.ec2_client(region);
        let mut instances = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = client
                .describe_instances()
                .filters(
                    Filter::builder()
                        .name("instance-state-name")
                        .values("running")
                        .build(),
                )
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|error| aws_error("ec2:DescribeInstances", &error))?;

            instances.extend(
                response
                    .reservations()
                    .iter()
                    .flat_map(|reservation| reservation.instances())
                    .filter_map(summarize),
            );

            match response.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_owned()),
                _ => break,
            }
        }

        debug!(region, count = instances.len(), "listed running ec2 instances");
        Ok(instances)
    }

    async fn stop_instance(&self, region: &str, resource_id: &str) -> AppResult<()> {
        self.aws
            .ec2_client(region)
            .stop_instances()
            .instance_ids(resource_id)
            .send()
            .await
            .map_err(|error| aws_error("ec2:StopInstances", &error))?;

        Ok(())
    }
}
