//! CloudTrail-backed audit trail.

use std::future::Future;

use async_trait::async_trait;
use aws_sdk_cloudtrail::types::{Event, LookupAttribute, LookupAttributeKey};
use serde_json::Value;
use tracing::debug;

use shutoff_application::AuditTrail;
use shutoff_core::{AppError, AppResult};
use shutoff_domain::{AuditEvent, AuditResourceRef};

use crate::aws_context::AwsContext;
use crate::aws_error::aws_error;

/// Largest `MaxResults` CloudTrail `LookupEvents` accepts in one request.
const LOOKUP_EVENTS_MAX_PAGE_SIZE: usize = 50;

/// Looks up management events through CloudTrail `LookupEvents`.
#[derive(Clone, Debug)]
pub struct CloudTrailAuditTrail {
    aws: AwsContext,
}

impl CloudTrailAuditTrail {
    /// Creates an audit trail adapter.
    #[must_use]
    pub fn new(aws: AwsContext) -> Self {
        Self { aws }
    }
}

/// Size of the next page to request, or `None` once `limit` items are held.
fn next_page_size(collected: usize, limit: usize) -> Option<i32> {
    let remaining = limit.saturating_sub(collected);
    if remaining == 0 {
        return None;
    }

    i32::try_from(remaining.min(LOOKUP_EVENTS_MAX_PAGE_SIZE)).ok()
}

/// Follows continuation tokens until `limit` items are collected or the
/// service stops returning a token.
async fn collect_pages<T, F, Fut>(limit: usize, mut fetch_page: F) -> AppResult<Vec<T>>
where
    F: FnMut(i32, Option<String>) -> Fut,
    Fut: Future<Output = AppResult<(Vec<T>, Option<String>)>>,
{
    let mut collected = Vec::new();
    let mut next_token: Option<String> = None;

    while let Some(page_size) = next_page_size(collected.len(), limit) {
        let (items, token) = fetch_page(page_size, next_token.take()).await?;
        collected.extend(items);

        match token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }

    collected.truncate(limit);
    Ok(collected)
}

fn to_audit_event(event: &Event) -> AuditEvent {
    let resources = event
        .resources()
        .iter()
        .filter_map(|resource| {
            Some(AuditResourceRef {
                resource_type: resource.resource_type()?.to_owned(),
                resource_name: resource.resource_name()?.to_owned(),
            })
        })
        .collect();

    // A payload that is not JSON is treated as absent.
    let payload = event
        .cloud_trail_event()
        .and_then(|raw| serde_json::from_str::<Value>(raw).ok());

    AuditEvent::new(
        event.event_name().unwrap_or_default(),
        event.username().map(str::to_owned),
        resources,
        payload,
    )
}

#[async_trait]
impl AuditTrail for CloudTrailAuditTrail {
    async fn lookup_events(
        &self,
        region: &str,
        event_name: &str,
        max_results: i32,
    ) -> AppResult<Vec<AuditEvent>> {
        let attribute = LookupAttribute::builder()
            .attribute_key(LookupAttributeKey::EventName)
            .attribute_value(event_name)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build cloudtrail lookup attribute: {error}"))
            })?;

        let client = self.aws.cloudtrail_client(region);
        let limit = usize::try_from(max_results).unwrap_or_default();

        let events = collect_pages(limit, |page_size, next_token| {
            let request = client
                .lookup_events()
                .lookup_attributes(attribute.clone())
                .max_results(page_size)
                .set_next_token(next_token);

            async move {
                let response = request
                    .send()
                    .await
                    .map_err(|error| aws_error("cloudtrail:LookupEvents", &error))?;

                let page: Vec<AuditEvent> =
                    response.events().iter().map(to_audit_event).collect();
                Ok::<_, AppError>((page, response.next_token().map(str::to_owned)))
            }
        })
        .await?;

        debug!(region, event_name, count = events.len(), "looked up audit events");

        Ok(events)
    }
}
