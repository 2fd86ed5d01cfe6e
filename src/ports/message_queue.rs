use crate::helper::error_chain_fmt;
use async_trait::async_trait;
use std::time::Duration;

/// Consuming side of the message broker, one consumer per topic
///
/// `poll_batch` waits at most `max_wait` for messages and returns the raw
/// payloads that were ready, possibly none and never more than
/// `max_messages`; what is not taken stays queued for the next poll.
/// Implementations must return (not block) once their underlying connection
/// is closed.
#[async_trait]
pub trait MessageConsumer: Send + Sync {
    async fn poll_batch(
        &self,
        max_wait: Duration,
        max_messages: usize,
    ) -> Result<Vec<Vec<u8>>, MessageQueueError>;
}

/// Producing side of the message broker
///
/// A single publisher instance is shared by all workers, so `publish` must
/// be safe to call concurrently.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), MessageQueueError>;
}

#[derive(thiserror::Error)]
pub enum MessageQueueError {
    #[error("Broker error: {0}")]
    Broker(String),
}

impl std::fmt::Debug for MessageQueueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
