//! SageMaker-backed notebook instance provider.

use async_trait::async_trait;
use aws_sdk_sagemaker::types::NotebookInstanceSummary;
use tracing::debug;

use shutoff_application::ResourceProvider;
use shutoff_core::AppResult;
use shutoff_domain::{InstanceSummary, ResourceKind};

use crate::aws_context::AwsContext;
use crate::aws_error::aws_error;

/// Lists and stops SageMaker notebook instances.
#[derive(Clone, Debug)]
pub struct SageMakerNotebookProvider {
    aws: AwsContext,
}

impl SageMakerNotebookProvider {
    /// Creates a provider deriving regional clients from `aws`.
    #[must_use]
    pub fn new(aws: AwsContext) -> Self {
        Self { aws }
    }
}

// Accepts both required (`&str`) and optional (`Option<&str>`) SDK accessors.
fn non_blank<'a>(value: impl Into<Option<&'a str>>) -> Option<&'a str> {
    value.into().filter(|value| !value.trim().is_empty())
}

fn summarize(notebook: &NotebookInstanceSummary) -> Option<InstanceSummary> {
    let name = non_blank(notebook.notebook_instance_name())?;
    let state = notebook
        .notebook_instance_status()
        .map(|status| status.as_str().to_owned())
        .unwrap_or_default();

    Some(InstanceSummary {
        id: name.to_owned(),
        state,
        arn: non_blank(notebook.notebook_instance_arn()).map(str::to_owned),
    })
}

#[async_trait]
impl ResourceProvider for SageMakerNotebookProvider {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Notebook
    }

    async fn list_instances(&self, region: &str) -> AppResult<Vec<InstanceSummary>> {
        let client = self.aws.sagemaker_client(region);
        let mut notebooks = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = client
                .list_notebook_instances()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|error| aws_error("sagemaker:ListNotebookInstances", &error))?;

            notebooks.extend(response.notebook_instances().iter().filter_map(summarize));

            match response.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_owned()),
                _ => break,
            }
        }

        debug!(region, count = notebooks.len(), "listed notebook instances");
        Ok(notebooks)
    }

    async fn stop_instance(&self, region: &str, resource_id: &str) -> AppResult<()> {
        self.aws
            .sagemaker_client(region)
            .stop_notebook_instance()
            .notebook_instance_name(resource_id)
            .send()
            .await
            .map_err(|error| aws_error("sagemaker:StopNotebookInstance", &error))?;

        Ok(())
    }
}
