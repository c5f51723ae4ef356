//! Attribute layout shared by the key-value remediation stores.

use chrono::{DateTime, SecondsFormat, Utc};

use shutoff_application::RemediationRecord;
use shutoff_core::{AppError, AppResult};

pub(crate) const REQUEST_ID: &str = "request_id";
pub(crate) const TYPE: &str = "type";
pub(crate) const INSTANCE: &str = "instance";
pub(crate) const REGION: &str = "region";
pub(crate) const CREATED_AT: &str = "created_at";

/// Flattens a record into attribute name and value pairs.
pub(crate) fn record_attributes(record: &RemediationRecord) -> Vec<(&'static str, String)> {
    let mut attributes = vec![
        (REQUEST_ID, record.request_id.clone()),
        (TYPE, record.kind.clone()),
        (INSTANCE, record.resource_id.clone()),
        (REGION, record.region.clone()),
    ];
    if let Some(created_at) = record.created_at {
        attributes.push((
            CREATED_AT,
            created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        ));
    }

    attributes
}

/// Rebuilds a record from stored attributes.
///
/// `created_at` is informational, so a missing or unreadable value is dropped.
pub(crate) fn record_from_attributes<F>(attribute: F) -> AppResult<RemediationRecord>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |name: &'static str| {
        attribute(name).ok_or_else(|| {
            AppError::Internal(format!(
                "stored remediation request is missing attribute '{name}'"
            ))
        })
    };

    Ok(RemediationRecord {
        request_id: required(REQUEST_ID)?,
        kind: required(TYPE)?,
        resource_id: required(INSTANCE)?,
        region: required(REGION)?,
        created_at: attribute(CREATED_AT)
            .and_then(|value| DateTime::parse_from_rfc3339(value.as_str()).ok())
            .map(|value| value.with_timezone(&Utc)),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{TimeZone, Utc};
    use shutoff_application::RemediationRecord;
    use shutoff_core::AppError;

    use super::{record_attributes, record_from_attributes};

    fn record() -> RemediationRecord {
        RemediationRecord {
            request_id: "token-1".to_owned(),
            kind: "ec2".to_owned(),
            resource_id: "i-1".to_owned(),
            region: "r1".to_owned(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single(),
        }
    }

    #[test]
    fn attributes_use_the_stored_names() {
        let attributes: HashMap<&str, String> = record_attributes(&record()).into_iter().collect();

        assert_eq!(attributes.get("request_id").map(String::as_str), Some("token-1"));
        assert_eq!(attributes.get("type").map(String::as_str), Some("ec2"));
        assert_eq!(attributes.get("instance").map(String::as_str), Some("i-1"));
        assert_eq!(attributes.get("region").map(String::as_str), Some("r1"));
        assert_eq!(
            attributes.get("created_at").map(String::as_str),
            Some("2026-03-01T12:00:00Z")
        );
    }

    #[test]
    fn records_written_without_created_at_are_readable() {
        let stored = HashMap::from([
            ("request_id", "legacy"),
            ("type", "sagemaker"),
            ("instance", "analysis"),
            ("region", "r2"),
        ]);

        let restored = record_from_attributes(|name| stored.get(name).map(|value| (*value).to_owned()));
        assert!(restored.is_ok());
        let restored = restored.unwrap_or_else(|_| unreachable!());
        assert_eq!(restored.kind, "sagemaker");
        assert!(restored.created_at.is_none());
    }

    #[test]
    fn missing_instance_is_an_integrity_error() {
        let stored = HashMap::from([("request_id", "t"), ("type", "ec2"), ("region", "r1")]);

        let restored = record_from_attributes(|name| stored.get(name).map(|value| (*value).to_owned()));
        assert!(matches!(restored, Err(AppError::Internal(message)) if message.contains("instance")));
    }
}
