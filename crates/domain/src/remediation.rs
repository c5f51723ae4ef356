use std::fmt::{Display, Formatter, Write};

use shutoff_core::{AppError, AppResult, NonEmptyString};

use crate::ResourceKind;

/// Number of random bytes behind every remediation token.
pub const REMEDIATION_TOKEN_BYTES: usize = 16;

const MAX_TOKEN_LENGTH: usize = 256;

/// Opaque, unguessable reference to a pending stop action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemediationToken(String);

impl RemediationToken {
    /// Encodes freshly generated random bytes as a lowercase hex token.
    #[must_use]
    pub fn from_random_bytes(bytes: [u8; REMEDIATION_TOKEN_BYTES]) -> Self {
        let encoded = bytes.iter().fold(
            String::with_capacity(REMEDIATION_TOKEN_BYTES * 2),
            |mut acc, byte| {
                let _ = write!(acc, "{byte:02x}");
                acc
            },
        );

        Self(encoded)
    }

    /// Parses a token received from a callback.
    ///
    /// Only shape is checked here. Whether the token was ever issued is the
    /// store's concern.
    pub fn parse(value: &str) -> AppResult<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::Validation(
                "request_id must not be empty".to_owned(),
            ));
        }

        if value.len() > MAX_TOKEN_LENGTH {
            return Err(AppError::Validation(format!(
                "request_id must not exceed {MAX_TOKEN_LENGTH} characters"
            )));
        }

        Ok(Self(value.to_owned()))
    }

    /// Returns the token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RemediationToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// A persisted request to stop one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediationRequest {
    token: RemediationToken,
    kind: ResourceKind,
    resource_id: NonEmptyString,
    region: NonEmptyString,
}

impl RemediationRequest {
    /// Creates a remediation request.
    pub fn new(
        token: RemediationToken,
        kind: ResourceKind,
        resource_id: impl Into<String>,
        region: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            token,
            kind,
            resource_id: NonEmptyString::new(resource_id)?,
            region: NonEmptyString::new(region)?,
        })
    }

    /// Returns the token the request is stored under.
    #[must_use]
    pub fn token(&self) -> &RemediationToken {
        &self.token
    }

    /// Returns the kind of resource to stop.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns the id of the resource to stop.
    #[must_use]
    pub fn resource_id(&self) -> &str {
        self.resource_id.as_str()
    }

    /// Returns the region of the resource to stop.
    #[must_use]
    pub fn region(&self) -> &str {
        self.region.as_str()
    }
}
