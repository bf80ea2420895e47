use std::time::Duration;

use async_trait::async_trait;
use prost::Message;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use reqwest::StatusCode;

use crate::identity::errors::NotificationError;
use crate::identity::events::UserRegisteredEvent;
use crate::identity::ports::FallbackNotifier;
use crate::outbound::events::messages::UserRegistrationMessage;

const USER_EVENTS_PATH: &str = "/internal/user-events";
const PROTOBUF_CONTENT_TYPE: &str = "application/x-protobuf";

/// Posts registration events straight to a dependent service.
pub struct HttpFallbackNotifier {
    name: String,
    endpoint: String,
    http_client: Client,
}

impl HttpFallbackNotifier {
    /// # Arguments
    /// * `name` - Service name used in logs
    /// * `base_url` - Base url of the service, e.g. `http://profile-service:8082`
    /// * `timeout` - Upper bound for a single delivery attempt
    pub fn new(name: &str, base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            name: name.to_string(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), USER_EVENTS_PATH),
            http_client,
        })
    }
}

#[async_trait]
impl FallbackNotifier for HttpFallbackNotifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn notify_user_registered(
        &self,
        event: &UserRegisteredEvent,
    ) -> Result<(), NotificationError> {
        let payload = UserRegistrationMessage::from(event).encode_to_vec();

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, PROTOBUF_CONTENT_TYPE)
            .body(payload)
            .send()
            .await
            .map_err(|e| NotificationError::Transport {
                service: self.name.clone(),
                reason: e.to_string(),
            })?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => Ok(()),
            status => Err(NotificationError::UnexpectedStatus {
                service: self.name.clone(),
                status: status.as_u16(),
            }),
        }
    }
}
