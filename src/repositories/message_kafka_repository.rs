use crate::ports::message_queue::{MessageConsumer, MessagePublisher, MessageQueueError};
use async_trait::async_trait;
use rdkafka::{
    consumer::{Consumer, StreamConsumer},
    error::KafkaError,
    producer::{FutureProducer, FutureRecord},
    util::Timeout,
    ClientConfig, Message,
};
use std::time::Duration;
use tokio::time::timeout;
use tracing::info;

/// Extra wait applied while draining messages that are already buffered,
/// once a first message arrived within the poll timeout
const DRAIN_WAIT: Duration = Duration::from_millis(50);

const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

fn broker_error(error: KafkaError) -> MessageQueueError {
    MessageQueueError::Broker(error.to_string())
}

/// Kafka consumer bound to a single topic
pub struct KafkaMessageConsumer {
    consumer: StreamConsumer,
    topic: String,
}

impl KafkaMessageConsumer {
    // TODO: fail fast when the broker is unreachable; creating the consumer
    // succeeds even without a broker and the error only shows on the first poll
    pub fn new(client_config: &ClientConfig, topic: &str) -> Result<Self, MessageQueueError> {
        let consumer: StreamConsumer = client_config.create().map_err(broker_error)?;
        consumer.subscribe(&[topic]).map_err(broker_error)?;

        info!("Subscribed consumer to topic {}", topic);

        Ok(Self {
            consumer,
            topic: topic.to_string(),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl MessageConsumer for KafkaMessageConsumer {
    async fn poll_batch(
        &self,
        max_wait: Duration,
        max_messages: usize,
    ) -> Result<Vec<Vec<u8>>, MessageQueueError> {
        let mut batch = Vec::new();
        if max_messages == 0 {
            return Ok(batch);
        }

        let first = match timeout(max_wait, self.consumer.recv()).await {
            // Nothing arrived within the poll timeout
            Err(_) => return Ok(batch),
            Ok(received) => received.map_err(broker_error)?,
        };
        batch.push(first.payload().unwrap_or_default().to_vec());

        // Keeps collecting whatever is already waiting, without re-paying
        // the full poll timeout; untaken messages stay on the stream
        while batch.len() < max_messages {
            match timeout(DRAIN_WAIT, self.consumer.recv()).await {
                Err(_) => break,
                Ok(received) => {
                    let message = received.map_err(broker_error)?;
                    batch.push(message.payload().unwrap_or_default().to_vec());
                }
            }
        }

        Ok(batch)
    }
}

/// Kafka producer shared by all workers
///
/// `FutureProducer` is thread safe, cloning only clones the handle.
#[derive(Clone)]
pub struct KafkaMessagePublisher {
    producer: FutureProducer,
}

impl KafkaMessagePublisher {
    pub fn new(client_config: &ClientConfig) -> Result<Self, MessageQueueError> {
        let producer: FutureProducer = client_config.create().map_err(broker_error)?;

        Ok(Self { producer })
    }
}

#[async_trait]
impl MessagePublisher for KafkaMessagePublisher {
    #[tracing::instrument(name = "Publishing message", skip(self, payload))]
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), MessageQueueError> {
        let record = FutureRecord::<str, [u8]>::to(topic).payload(payload);

        self.producer
            .send(record, Timeout::After(PUBLISH_TIMEOUT))
            .await
            .map_err(|(error, _message)| broker_error(error))?;

        Ok(())
    }
}
