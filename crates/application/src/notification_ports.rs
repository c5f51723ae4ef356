use async_trait::async_trait;

use shutoff_core::AppResult;
use shutoff_domain::NotificationMessage;

/// Port for sending emails. Infrastructure provides SES, SMTP or console implementations.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Sends the message to all of its recipients and returns the delivery id.
    async fn send_email(&self, message: &NotificationMessage) -> AppResult<String>;
}
