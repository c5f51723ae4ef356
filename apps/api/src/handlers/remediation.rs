use axum::extract::{Query, State};
use axum::response::Html;
use shutoff_domain::RemediationToken;
use tracing::info;

use crate::dto::RemediationQuery;
use crate::error::ApiResult;
use crate::state::AppState;

/// Stops the resource behind a remediation link.
///
/// Possession of the token is the only authorization.
pub async fn remediation_handler(
    State(state): State<AppState>,
    Query(query): Query<RemediationQuery>,
) -> ApiResult<Html<String>> {
    let token = RemediationToken::parse(query.request_id.as_deref().unwrap_or_default())?;

    let request = state.remediation_executor.execute(&token).await?;
    info!(
        kind = %request.kind(),
        resource_id = request.resource_id(),
        region = request.region(),
        "remediation link redeemed"
    );

    Ok(Html(confirmation_page(request.resource_id())))
}

fn confirmation_page(resource_id: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Your instance has been shut down</title></head>\n\
         <body><p>Congrats, your machine `{}` has been turned off</p></body>\n</html>\n",
        escape_html(resource_id)
    )
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}
