use crate::helper::error_chain_fmt;
use async_trait::async_trait;

/// Access to a chat-completion LLM service
///
/// One rendered prompt in, the raw completion text out. Implemented against
/// the real service in `repositories`, and by in-memory fakes in tests.
#[async_trait]
pub trait ChatCompletionPort: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[derive(thiserror::Error)]
pub enum CompletionError {
    #[error("Failed to reach the completion service: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Completion service returned an error: status {status}, body: {body}")]
    Api { status: u16, body: String },
    #[error("Completion service returned no choices")]
    EmptyResponse,
}

impl std::fmt::Debug for CompletionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
