use shutoff_core::{AppError, AppResult};
use shutoff_domain::{REMEDIATION_TOKEN_BYTES, RemediationToken};

/// Generates a cryptographically random remediation token.
pub(super) fn generate_token() -> AppResult<RemediationToken> {
    let mut bytes = [0u8; REMEDIATION_TOKEN_BYTES];
    getrandom::fill(&mut bytes).map_err(|error| {
        AppError::Internal(format!("failed to generate remediation token: {error}"))
    })?;

    Ok(RemediationToken::from_random_bytes(bytes))
}
