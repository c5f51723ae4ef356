use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use shutoff_core::AppResult;
use shutoff_domain::{InstanceSummary, ResourceKind};

/// Port listing the regions enabled for the account.
#[async_trait]
pub trait RegionDirectory: Send + Sync {
    /// Returns every enabled region name.
    async fn list_regions(&self) -> AppResult<Vec<String>>;
}

/// Port for listing and stopping resources of one kind.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Kind of resource this provider manages.
    fn kind(&self) -> ResourceKind;

    /// Lists instances in `region`. Providers may pre-filter by lifecycle
    /// state; callers still apply [`ResourceKind::is_reportable_state`].
    async fn list_instances(&self, region: &str) -> AppResult<Vec<InstanceSummary>>;

    /// Issues the stop command for one resource.
    async fn stop_instance(&self, region: &str, resource_id: &str) -> AppResult<()>;
}

/// Resource providers keyed by the kind they manage.
#[derive(Clone, Default)]
pub struct ResourceProviders {
    providers: BTreeMap<ResourceKind, Arc<dyn ResourceProvider>>,
}

impl ResourceProviders {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider, replacing any earlier one for the same kind.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn ResourceProvider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    /// Returns the provider registered for `kind`.
    #[must_use]
    pub fn for_kind(&self, kind: ResourceKind) -> Option<Arc<dyn ResourceProvider>> {
        self.providers.get(&kind).cloned()
    }
}
