//! Amazon SES (v2) email service.

use async_trait::async_trait;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

use shutoff_application::EmailService;
use shutoff_core::{AppError, AppResult};
use shutoff_domain::NotificationMessage;

use crate::aws_context::AwsContext;
use crate::aws_error::aws_error;

const CHARSET: &str = "UTF-8";

/// Production email service sending through SES in the home region.
#[derive(Clone, Debug)]
pub struct SesEmailService {
    client: aws_sdk_sesv2::Client,
    sender: String,
}

impl SesEmailService {
    /// Creates a service sending from the verified `sender` identity.
    #[must_use]
    pub fn new(aws: &AwsContext, sender: impl Into<String>) -> Self {
        Self {
            client: aws.ses_client(),
            sender: sender.into(),
        }
    }
}

fn text_content(data: &str) -> AppResult<Content> {
    Content::builder()
        .data(data)
        .charset(CHARSET)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build email content: {error}")))
}

fn email_content(message: &NotificationMessage) -> AppResult<EmailContent> {
    let simple = Message::builder()
        .subject(text_content(message.subject())?)
        .body(Body::builder().text(text_content(message.body())?).build())
        .build();

    Ok(EmailContent::builder().simple(simple).build())
}

#[async_trait]
impl EmailService for SesEmailService {
    async fn send_email(&self, message: &NotificationMessage) -> AppResult<String> {
        if message.recipients().is_empty() {
            return Err(AppError::Validation(
                "notification has no recipients".to_owned(),
            ));
        }

        let destination = Destination::builder()
            .set_to_addresses(Some(message.recipient_list()))
            .build();

        let response = self
            .client
            .send_email()
            .from_email_address(self.sender.as_str())
            .destination(destination)
            .content(email_content(message)?)
            .send()
            .await
            .map_err(|error| aws_error("ses:SendEmail", &error))?;

        Ok(response.message_id().unwrap_or_default().to_owned())
    }
}
