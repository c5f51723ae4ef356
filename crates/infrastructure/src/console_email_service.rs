//! Console email service for development. Logs notifications to tracing output.

use async_trait::async_trait;
use shutoff_application::EmailService;
use shutoff_core::AppResult;
use shutoff_domain::NotificationMessage;
use tracing::info;
use uuid::Uuid;

/// Development email service that logs notifications to the console.
#[derive(Clone)]
pub struct ConsoleEmailService;

impl ConsoleEmailService {
    /// Creates a new console email service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailService for ConsoleEmailService {
    async fn send_email(&self, message: &NotificationMessage) -> AppResult<String> {
        let delivery_id = format!("console-{}", Uuid::new_v4());
        let to = message.recipient_list().join(", ");

        info!(
            delivery_id = %delivery_id,
            to = %to,
            subject = message.subject(),
            "--- EMAIL (console) ---\nTo: {}\nSubject: {}\n\n{}\n--- END EMAIL ---",
            to,
            message.subject(),
            message.body()
        );

        Ok(delivery_id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use shutoff_application::EmailService;
    use shutoff_domain::NotificationMessage;

    use super::ConsoleEmailService;

    #[tokio::test]
    async fn console_delivery_returns_a_unique_id() {
        let service = ConsoleEmailService::new();
        let message = NotificationMessage::new(
            BTreeSet::from(["ops@example.com".to_owned()]),
            "Your instance is still running",
            "Hi unknown owner,",
        );

        let first = service.send_email(&message).await;
        let second = service.send_email(&message).await;
        assert!(first.is_ok());
        assert!(second.is_ok());

        let first = first.unwrap_or_default();
        assert!(first.starts_with("console-"));
        assert_ne!(first, second.unwrap_or_default());
    }
}
