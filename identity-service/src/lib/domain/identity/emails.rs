use chrono::Duration;

use crate::identity::models::EmailAddress;
use crate::identity::ports::EmailMessage;

const VERIFY_PATH: &str = "/auth/verify";
const RESET_PATH: &str = "/reset-password";

/// Builds the verification and password reset emails.
#[derive(Debug, Clone)]
pub struct EmailTemplates {
    product_name: String,
    verify_base_url: String,
    reset_base_url: String,
}

impl EmailTemplates {
    /// # Arguments
    /// * `product_name` - Shown in subjects and greetings
    /// * `verify_base_url` - Public base url of this service (behind the gateway)
    /// * `reset_base_url` - Base url of the frontend that hosts the reset form
    pub fn new(product_name: String, verify_base_url: String, reset_base_url: String) -> Self {
        Self {
            product_name,
            verify_base_url: verify_base_url.trim_end_matches('/').to_string(),
            reset_base_url: reset_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn verification_link(&self, token: &str) -> String {
        format!("{}{}?token={}", self.verify_base_url, VERIFY_PATH, token)
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!("{}{}?token={}", self.reset_base_url, RESET_PATH, token)
    }

    pub fn verification_email(
        &self,
        recipient: &EmailAddress,
        token: &str,
        ttl: Duration,
    ) -> EmailMessage {
        let link = self.verification_link(token);
        let minutes = ttl.num_minutes();

        EmailMessage {
            recipient: recipient.clone(),
            subject: format!("Verify your email for {}", self.product_name),
            html_body: format!(
                "<p>Welcome to {product}!</p>\
                 <p>Please confirm your email address by clicking the link below:</p>\
                 <p><a href=\"{link}\">Verify your email</a></p>\
                 <p>This link will expire in {minutes} minutes.</p>",
                product = self.product_name,
            ),
            text_body: format!(
                "Welcome to {product}!\n\n\
                 Please confirm your email address by opening this link:\n{link}\n\n\
                 This link will expire in {minutes} minutes.",
                product = self.product_name,
            ),
        }
    }

    pub fn reset_email(&self, recipient: &EmailAddress, token: &str, ttl: Duration) -> EmailMessage {
        let link = self.reset_link(token);
        let minutes = ttl.num_minutes();

        EmailMessage {
            recipient: recipient.clone(),
            subject: format!("Reset your {} password", self.product_name),
            html_body: format!(
                "<p>We received a request to reset your password.</p>\
                 <p><a href=\"{link}\">Reset your password</a></p>\
                 <p>This link will expire in {minutes} minutes. \
                 If you did not ask for a reset you can ignore this email.</p>"
            ),
            text_body: format!(
                "We received a request to reset your password.\n\n\
                 Open this link to choose a new one:\n{link}\n\n\
                 This link will expire in {minutes} minutes. \
                 If you did not ask for a reset you can ignore this email."
            ),
        }
    }
}
