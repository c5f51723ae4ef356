use async_trait::async_trait;

use shutoff_application::RegionDirectory;
use shutoff_core::AppResult;

use crate::aws_context::AwsContext;
use crate::aws_error::aws_error;

/// Lists the regions enabled for the account through EC2 in the home region.
#[derive(Clone, Debug)]
pub struct Ec2RegionDirectory {
    aws: AwsContext,
}

impl Ec2RegionDirectory {
    /// Creates a region directory.
    #[must_use]
    pub fn new(aws: AwsContext) -> Self {
        Self { aws }
    }
}

#[async_trait]
impl RegionDirectory for Ec2RegionDirectory {
    async fn list_regions(&self) -> AppResult<Vec<String>> {
        let response = self
            .aws
            .ec2_client(self.aws.home_region())
            .describe_regions()
            .send()
            .await
            .map_err(|error| aws_error("ec2:DescribeRegions", &error))?;

        let mut regions: Vec<String> = response
            .regions()
            .iter()
            .filter_map(|region| region.region_name())
            .map(str::to_owned)
            .collect();
        regions.sort();

        Ok(regions)
    }
}
