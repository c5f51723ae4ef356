use std::collections::BTreeSet;

/// Subject line of every running-resource notification.
pub const NOTIFICATION_SUBJECT: &str = "Your instance is still running";

/// A rendered notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    recipients: BTreeSet<String>,
    subject: String,
    body: String,
}

impl NotificationMessage {
    /// Creates a notification message.
    #[must_use]
    pub fn new(
        recipients: BTreeSet<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            recipients,
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Returns the deduplicated recipient set.
    #[must_use]
    pub fn recipients(&self) -> &BTreeSet<String> {
        &self.recipients
    }

    /// Returns the recipients as an owned list, in set order.
    #[must_use]
    pub fn recipient_list(&self) -> Vec<String> {
        self.recipients.iter().cloned().collect()
    }

    /// Returns the subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the plain text body.
    #[must_use]
    pub fn body(&self) -> &str {
        self.body.as_str()
    }
}
