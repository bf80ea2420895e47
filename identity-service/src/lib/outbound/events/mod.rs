pub mod consumer;
pub mod messages;
pub mod producer;

pub use consumer::ClinicEventsConsumer;
pub use producer::KafkaEventProducer;
