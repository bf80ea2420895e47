use std::sync::Arc;

use futures::StreamExt;
use prost::Message as ProstMessage;
use rdkafka::consumer::Consumer;
use rdkafka::consumer::StreamConsumer;
use rdkafka::error::KafkaError;
use rdkafka::ClientConfig;
use rdkafka::Message;
use thiserror::Error;

use super::messages::ClinicCreatedMessage;
use crate::config::Config;
use crate::identity::errors::AuthError;
use crate::identity::events::ClinicCreatedEvent;
use crate::identity::models::UserId;
use crate::identity::ports::AuthServicePort;

#[derive(Debug, Error)]
enum MessageProcessingError {
    #[error("Kafka consumer error: {0}")]
    KafkaError(#[from] KafkaError),

    #[error("Message has no payload")]
    NoPayload,

    #[error("Failed to decode event: {0}")]
    DecodeError(#[from] prost::DecodeError),

    #[error("Failed to handle event: {0}")]
    HandlingError(#[from] AuthError),
}

/// Kafka consumer for clinics created by the profile service.
///
/// Links each clinic admin to the clinic provisioned for them.
pub struct ClinicEventsConsumer<S: AuthServicePort> {
    consumer: StreamConsumer,
    auth_service: Arc<S>,
}

impl<S: AuthServicePort> ClinicEventsConsumer<S> {
    pub fn new(config: &Config, auth_service: Arc<S>) -> Result<Self, anyhow::Error> {
        tracing::info!(
            brokers = %config.kafka.brokers,
            group_id = %config.kafka.group_id,
            topic = %config.kafka.clinic_events_topic,
            "Initializing clinic events consumer"
        );

        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.kafka.brokers)
            .set("group.id", &config.kafka.group_id)
            .set("enable.auto.commit", "true")
            .set("auto.commit.interval.ms", "5000")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "30000")
            .set("enable.partition.eof", "false")
            .create()?;

        consumer.subscribe(&[&config.kafka.clinic_events_topic])?;

        Ok(Self {
            consumer,
            auth_service,
        })
    }

    /// Long-running; spawn it on its own task.
    pub async fn start_consuming(self) {
        tracing::info!("Starting clinic events consumer loop");

        let mut message_stream = self.consumer.stream();

        while let Some(result) = message_stream.next().await {
            if let Err(error) = self.process_message(result).await {
                tracing::error!(error = %error, "Error processing clinic event");

                if matches!(error, MessageProcessingError::KafkaError(_)) {
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
            }
        }

        tracing::warn!("Clinic events consumer loop ended");
    }

    async fn process_message(
        &self,
        result: Result<rdkafka::message::BorrowedMessage<'_>, KafkaError>,
    ) -> Result<(), MessageProcessingError> {
        let message = result?;
        let payload = message.payload().ok_or(MessageProcessingError::NoPayload)?;
        let event: ClinicCreatedEvent = ClinicCreatedMessage::decode(payload)?.into();

        handle_clinic_created(self.auth_service.as_ref(), event).await?;
        Ok(())
    }
}

async fn handle_clinic_created<S: AuthServicePort>(
    auth_service: &S,
    event: ClinicCreatedEvent,
) -> Result<(), AuthError> {
    tracing::debug!(
        clinic_id = event.clinic_id,
        admin_user_id = %event.admin_user_id,
        name = %event.name,
        "Received clinic created event"
    );

    let user_id = UserId::from_string(&event.admin_user_id)?;
    auth_service.assign_clinic(&user_id, event.clinic_id).await
}
