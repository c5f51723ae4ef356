use std::collections::BTreeSet;

use url::Url;

use shutoff_core::{AppError, AppResult};
use shutoff_domain::{
    NOTIFICATION_SUBJECT, NotificationMessage, Ownership, RemediationToken, RunningResource,
};

/// Query parameter carrying the token on the remediation callback.
pub const REQUEST_ID_PARAMETER: &str = "request_id";

/// Builds one-click stop links pointing at the remediation callback.
#[derive(Debug, Clone)]
pub struct RemediationLinkBuilder {
    callback_url: Url,
}

impl RemediationLinkBuilder {
    /// Parses the absolute callback base URL.
    pub fn parse(callback_url: &str) -> AppResult<Self> {
        let callback_url = Url::parse(callback_url.trim()).map_err(|error| {
            AppError::Validation(format!(
                "invalid remediation callback url '{callback_url}': {error}"
            ))
        })?;

        if !matches!(callback_url.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "remediation callback url must use http or https, got '{}'",
                callback_url.scheme()
            )));
        }

        Ok(Self { callback_url })
    }

    /// Returns the link that redeems `token`.
    #[must_use]
    pub fn link_for(&self, token: &RemediationToken) -> Url {
        let mut link = self.callback_url.clone();
        link.query_pairs_mut()
            .append_pair(REQUEST_ID_PARAMETER, token.as_str());
        link
    }
}

/// Renders running-resource notifications.
#[derive(Debug, Clone)]
pub struct NotificationComposer {
    distribution_list: BTreeSet<String>,
}

impl NotificationComposer {
    /// Creates a composer that always copies `distribution_list`.
    #[must_use]
    pub fn new<I, S>(distribution_list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let distribution_list = distribution_list
            .into_iter()
            .map(|address| {
                let address: String = address.into();
                address.trim().to_owned()
            })
            .filter(|address| !address.is_empty())
            .collect();

        Self { distribution_list }
    }

    /// Renders the notification for one running resource.
    ///
    /// The owner is only added as a recipient when it looks like an email
    /// address. Any string content is rendered verbatim.
    #[must_use]
    pub fn compose(
        &self,
        ownership: &Ownership,
        resource: &RunningResource,
        remediation_link: Option<&Url>,
    ) -> NotificationMessage {
        let mut recipients = self.distribution_list.clone();
        if let Some(address) = ownership.email_address() {
            recipients.insert(address.to_owned());
        }

        let remediation_paragraph = remediation_link
            .map(|link| {
                format!(
                    "\nYou can also turn it off directly by opening this link:\n{link}\n"
                )
            })
            .unwrap_or_default();

        let body = format!(
            "Hi {greeting},\n\n\
             You have left {label} {resource_id} on in region {region}. If this is \
             intentional that's fine, if not please turn off your machine.\n\
             {remediation_paragraph}\n\
             Thank you very much in advance,\n\n\
             Shutoff bot\n",
            greeting = ownership.greeting_name(),
            label = resource.kind().label(),
            resource_id = resource.id(),
            region = resource.region(),
        );

        NotificationMessage::new(recipients, NOTIFICATION_SUBJECT, body)
    }
}
