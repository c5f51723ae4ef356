use tracing::info;

use shutoff_core::{AppError, AppResult};
use shutoff_domain::{RemediationRequest, RemediationToken};

use crate::inventory_ports::ResourceProviders;
use crate::remediation_token_service::RemediationTokenService;

/// Stops the resource a remediation token was issued for.
#[derive(Clone)]
pub struct RemediationExecutor {
    token_service: RemediationTokenService,
    providers: ResourceProviders,
}

impl RemediationExecutor {
    /// Creates a new remediation executor.
    #[must_use]
    pub fn new(token_service: RemediationTokenService, providers: ResourceProviders) -> Self {
        Self {
            token_service,
            providers,
        }
    }

    /// Resolves `token` and issues the stop call for its resource.
    ///
    /// Redeeming the same token again issues the stop call again.
    pub async fn execute(&self, token: &RemediationToken) -> AppResult<RemediationRequest> {
        let request = self.token_service.resolve(token).await?;

        let provider = self.providers.for_kind(request.kind()).ok_or_else(|| {
            AppError::Unsupported(format!(
                "no provider can stop resources of type '{}'",
                request.kind()
            ))
        })?;

        provider
            .stop_instance(request.region(), request.resource_id())
            .await?;

        info!(
            kind = %request.kind(),
            resource_id = request.resource_id(),
            region = request.region(),
            "remediation stop issued"
        );

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shutoff_core::AppError;
    use shutoff_domain::{RemediationToken, ResourceKind};

    use super::RemediationExecutor;
    use crate::test_support::{FakeRemediationRepository, FakeResourceProvider};
    use crate::{RemediationTokenService, ResourceProviders};

    struct Fixture {
        compute: Arc<FakeResourceProvider>,
        notebooks: Arc<FakeResourceProvider>,
        token_service: RemediationTokenService,
        executor: RemediationExecutor,
    }

    fn fixture() -> Fixture {
        let compute = Arc::new(FakeResourceProvider::new(ResourceKind::Compute));
        let notebooks = Arc::new(FakeResourceProvider::new(ResourceKind::Notebook));
        let token_service =
            RemediationTokenService::new(Arc::new(FakeRemediationRepository::default()));
        let providers = ResourceProviders::new()
            .with_provider(compute.clone())
            .with_provider(notebooks.clone());

        Fixture {
            compute,
            notebooks,
            executor: RemediationExecutor::new(token_service.clone(), providers),
            token_service,
        }
    }

    #[tokio::test]
    async fn redeeming_a_token_stops_its_compute_instance() {
        let fixture = fixture();
        let token = fixture
            .token_service
            .create(ResourceKind::Compute, "i-1", "r1")
            .await;
        assert!(token.is_ok());

        let request = fixture
            .executor
            .execute(&token.unwrap_or_else(|_| unreachable!()))
            .await;
        assert!(request.is_ok());
        assert_eq!(request.unwrap_or_else(|_| unreachable!()).resource_id(), "i-1");

        assert_eq!(
            fixture.compute.stopped.lock().await.clone(),
            vec![("r1".to_owned(), "i-1".to_owned())]
        );
        assert!(fixture.notebooks.stopped.lock().await.is_empty());
    }

    #[tokio::test]
    async fn redeeming_a_notebook_token_stops_the_notebook_by_name() {
        let fixture = fixture();
        let token = fixture
            .token_service
            .create(ResourceKind::Notebook, "analysis", "r2")
            .await
            .unwrap_or_else(|_| unreachable!());

        assert!(fixture.executor.execute(&token).await.is_ok());
        assert_eq!(
            fixture.notebooks.stopped.lock().await.clone(),
            vec![("r2".to_owned(), "analysis".to_owned())]
        );
    }

    #[tokio::test]
    async fn unknown_token_stops_nothing() {
        let fixture = fixture();
        let token = RemediationToken::parse("unknown").unwrap_or_else(|_| unreachable!());

        let result = fixture.executor.execute(&token).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(fixture.compute.stopped.lock().await.is_empty());
        assert!(fixture.notebooks.stopped.lock().await.is_empty());
    }

    #[tokio::test]
    async fn kind_without_provider_is_unsupported() {
        let compute = Arc::new(FakeResourceProvider::new(ResourceKind::Compute));
        let token_service =
            RemediationTokenService::new(Arc::new(FakeRemediationRepository::default()));
        let executor = RemediationExecutor::new(
            token_service.clone(),
            ResourceProviders::new().with_provider(compute.clone()),
        );

        let token = token_service
            .create(ResourceKind::Notebook, "analysis", "r2")
            .await
            .unwrap_or_else(|_| unreachable!());

        let result = executor.execute(&token).await;
        assert!(matches!(result, Err(AppError::Unsupported(_))));
        assert!(compute.stopped.lock().await.is_empty());
    }

    #[tokio::test]
    async fn redeeming_twice_issues_the_stop_twice() {
        let fixture = fixture();
        let token = fixture
            .token_service
            .create(ResourceKind::Compute, "i-1", "r1")
            .await
            .unwrap_or_else(|_| unreachable!());

        assert!(fixture.executor.execute(&token).await.is_ok());
        assert!(fixture.executor.execute(&token).await.is_ok());
        assert_eq!(fixture.compute.stopped.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn stop_failure_is_propagated() {
        let compute = Arc::new(FakeResourceProvider::new(ResourceKind::Compute).failing_in("r1"));
        let token_service =
            RemediationTokenService::new(Arc::new(FakeRemediationRepository::default()));
        let executor = RemediationExecutor::new(
            token_service.clone(),
            ResourceProviders::new().with_provider(compute),
        );

        let token = token_service
            .create(ResourceKind::Compute, "i-1", "r1")
            .await
            .unwrap_or_else(|_| unreachable!());

        assert!(matches!(
            executor.execute(&token).await,
            Err(AppError::Internal(_))
        ));
    }
}
