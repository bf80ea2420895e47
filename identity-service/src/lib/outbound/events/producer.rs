use std::time::Duration;

use async_trait::async_trait;
use prost::Message;
use rdkafka::config::ClientConfig;
use rdkafka::message::Header;
use rdkafka::message::OwnedHeaders;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;
use thiserror::Error;

use super::messages::ClinicUpdateMessage;
use super::messages::UserRegistrationMessage;
use super::messages::CONTENT_TYPE;
use crate::config::Config;
use crate::identity::errors::EventPublisherError;
use crate::identity::events::ClinicUpdatedEvent;
use crate::identity::events::UserRegisteredEvent;
use crate::identity::ports::EventPublisher;

#[derive(Debug, Error)]
pub enum KafkaProducerError {
    #[error("Failed to send message to Kafka: {0}")]
    SendError(String),
}

impl From<KafkaProducerError> for EventPublisherError {
    fn from(err: KafkaProducerError) -> Self {
        match err {
            KafkaProducerError::SendError(msg) => EventPublisherError::PublishFailed(msg),
        }
    }
}

/// Publishes identity events to a single topic, keyed by routing key.
pub struct KafkaEventProducer {
    producer: FutureProducer,
    topic: String,
    timeout: Duration,
}

impl KafkaEventProducer {
    /// Create a new Kafka event producer with "at least once" delivery semantics
    ///
    /// # Arguments
    /// * `config` - Application configuration
    ///
    /// # Notes:
    /// - `acks=all`: Wait for all in-sync replicas to acknowledge
    /// - `enable.idempotence=true`: Prevents duplicate messages during retries
    /// - `message.timeout.ms=10000`: A dead broker surfaces quickly so fallbacks can run
    pub fn new(config: &Config) -> Result<Self, anyhow::Error> {
        tracing::info!(
            brokers = %config.kafka.brokers,
            topic = %config.kafka.topic,
            "Initializing Kafka producer for identity events"
        );

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.kafka.brokers)
            .set("message.timeout.ms", "10000")
            .set("queue.buffering.max.messages", "10000")
            .set("compression.type", "gzip")
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("retries", "5")
            .set("max.in.flight.requests.per.connection", "5")
            .set("retry.backoff.ms", "100")
            .create()?;

        tracing::info!("Kafka producer initialized successfully");

        Ok(Self {
            producer,
            topic: config.kafka.topic.to_string(),
            timeout: Duration::from_secs(10),
        })
    }

    /// Publish an encoded payload, keyed by its routing key.
    async fn publish(&self, routing_key: &str, payload: &[u8]) -> Result<(), KafkaProducerError> {
        let headers = OwnedHeaders::new().insert(Header {
            key: "content-type",
            value: Some(CONTENT_TYPE),
        });

        let record = FutureRecord::to(&self.topic)
            .key(routing_key)
            .payload(payload)
            .headers(headers);

        self.producer
            .send(record, Timeout::After(self.timeout))
            .await
            .map(|(partition, offset)| {
                tracing::debug!(
                    topic = %self.topic,
                    routing_key,
                    partition,
                    offset,
                    "Event published"
                );
            })
            .map_err(|(err, _)| KafkaProducerError::SendError(err.to_string()))
    }
}

#[async_trait]
impl EventPublisher for KafkaEventProducer {
    async fn publish_user_registered(
        &self,
        event: &UserRegisteredEvent,
    ) -> Result<(), EventPublisherError> {
        let payload = UserRegistrationMessage::from(event).encode_to_vec();

        self.publish(&event.routing_key(), &payload)
            .await
            .map_err(|e| {
                tracing::warn!(user_id = %event.user_id, error = %e, "Failed to publish registration event");
                e.into()
            })
    }

    async fn publish_clinic_updated(
        &self,
        event: &ClinicUpdatedEvent,
    ) -> Result<(), EventPublisherError> {
        let payload = ClinicUpdateMessage::from(event).encode_to_vec();

        self.publish(event.routing_key(), &payload)
            .await
            .map_err(|e| {
                tracing::error!(clinic_id = event.clinic_id, error = %e, "Failed to publish clinic update");
                e.into()
            })
    }
}
