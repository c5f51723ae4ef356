//! SMTP email service using the `lettre` crate.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use shutoff_application::EmailService;
use shutoff_core::{AppError, AppResult};
use shutoff_domain::NotificationMessage;

/// SMTP email service configuration.
#[derive(Clone)]
pub struct SmtpEmailConfig {
    /// SMTP server hostname.
    pub host: String,
    /// SMTP server port.
    pub port: u16,
    /// SMTP username.
    pub username: String,
    /// SMTP password.
    pub password: String,
    /// Sender email address.
    pub from_address: String,
}

/// Email service relaying notifications through an SMTP server.
#[derive(Clone)]
pub struct SmtpEmailService {
    config: SmtpEmailConfig,
}

impl SmtpEmailService {
    /// Creates a new SMTP email service.
    #[must_use]
    pub fn new(config: SmtpEmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, notification: &NotificationMessage) -> AppResult<Message> {
        let from: Mailbox = self
            .config
            .from_address
            .parse()
            .map_err(|error| AppError::Internal(format!("invalid from address: {error}")))?;

        let mut builder = Message::builder()
            .from(from)
            .subject(notification.subject())
            .header(ContentType::TEXT_PLAIN);

        for recipient in notification.recipients() {
            let mailbox: Mailbox = recipient.parse().map_err(|error| {
                AppError::Internal(format!("invalid recipient address '{recipient}': {error}"))
            })?;
            builder = builder.to(mailbox);
        }

        builder
            .body(notification.body().to_owned())
            .map_err(|error| AppError::Internal(format!("failed to build email: {error}")))
    }
}

#[async_trait]
impl EmailService for SmtpEmailService {
    async fn send_email(&self, message: &NotificationMessage) -> AppResult<String> {
        if message.recipients().is_empty() {
            return Err(AppError::Validation(
                "notification has no recipients".to_owned(),
            ));
        }

        let email = self.build_message(message)?;

        let credentials =
            Credentials::new(self.config.username.clone(), self.config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)
            .map_err(|error| {
                AppError::Internal(format!("failed to create SMTP transport: {error}"))
            })?
            .port(self.config.port)
            .credentials(credentials)
            .build();

        let response = mailer
            .send(email)
            .await
            .map_err(|error| AppError::Internal(format!("failed to send email: {error}")))?;

        Ok(response
            .message()
            .map(ToString::to_string)
            .collect::<Vec<String>>()
            .join(" "))
    }
}
