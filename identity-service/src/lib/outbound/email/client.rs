use async_trait::async_trait;
use reqwest::Client;
use reqwest::Url;
use serde::Serialize;

use crate::identity::errors::EmailDeliveryError;
use crate::identity::models::EmailAddress;
use crate::identity::ports::EmailMessage;
use crate::identity::ports::EmailSender;

const MESSAGE_STREAM: &str = "outbound";
const AUTH_HEADER: &str = "X-Postmark-Server-Token";

/// Transactional email over a Postmark-compatible HTTP API.
pub struct HttpEmailClient {
    http_client: Client,
    base_url: String,
    sender: EmailAddress,
    api_token: String,
}

impl HttpEmailClient {
    pub fn new(base_url: String, sender: EmailAddress, api_token: String, http_client: Client) -> Self {
        Self {
            http_client,
            base_url,
            sender,
            api_token,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
}

#[async_trait]
impl EmailSender for HttpEmailClient {
    #[tracing::instrument(name = "Sending email", skip_all, fields(recipient = %message.recipient))]
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailDeliveryError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| EmailDeliveryError::InvalidUrl(e.to_string()))?;
        let url = base
            .join("/email")
            .map_err(|e| EmailDeliveryError::InvalidUrl(e.to_string()))?;

        let request_body = SendEmailRequest {
            from: self.sender.as_str(),
            to: message.recipient.as_str(),
            subject: &message.subject,
            html_body: &message.html_body,
            text_body: &message.text_body,
            message_stream: MESSAGE_STREAM,
        };

        let response = self
            .http_client
            .post(url)
            .header(AUTH_HEADER, &self.api_token)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EmailDeliveryError::Transport(e.to_string()))?;

        response.error_for_status().map_err(|e| match e.status() {
            Some(status) => EmailDeliveryError::Rejected(status.as_u16()),
            None => EmailDeliveryError::Transport(e.to_string()),
        })?;

        Ok(())
    }
}
