use shutoff_application::RemediationExecutor;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub remediation_executor: RemediationExecutor,
}
