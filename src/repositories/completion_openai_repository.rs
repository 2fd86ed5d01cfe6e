use crate::ports::chat_completion::{ChatCompletionPort, CompletionError};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How many times a request is re-sent after a transport failure
const MAX_TRANSPORT_RETRIES: usize = 2;

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage>,
    model: &'a str,
    temperature: f32,
    stream: bool,
    // No max_tokens on purpose: the analysis tasks must not be truncated
}

#[derive(Serialize, Deserialize, Debug)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMessage,
}

/// Chat-completion repository for an OpenAI-compatible endpoint
///
/// Sampling is pinned to temperature 0 so the structured-output tasks stay
/// deterministic enough to parse.
pub struct OpenAiCompletionRepository {
    client: ReqwestClient,
    api_url: String,
    model: String,
    api_key: Option<Secret<String>>,
}

impl OpenAiCompletionRepository {
    pub fn new(
        api_url: String,
        model: String,
        api_key: Option<Secret<String>>,
    ) -> Result<Self, CompletionError> {
        let client = ReqwestClient::builder().build()?;

        Ok(Self {
            client,
            api_url,
            model,
            api_key,
        })
    }
}

#[async_trait]
impl ChatCompletionPort for OpenAiCompletionRepository {
    #[tracing::instrument(name = "Requesting chat completion", skip(self, prompt))]
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request_body = ChatRequest {
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            model: &self.model,
            temperature: 0.0,
            stream: false,
        };

        let mut attempt = 0;
        let response = loop {
            let mut request_builder = self.client.post(&self.api_url);

            if let Some(key) = &self.api_key {
                request_builder = request_builder.bearer_auth(key.expose_secret());
            }

            match request_builder.json(&request_body).send().await {
                Ok(response) => break response,
                Err(error) if attempt < MAX_TRANSPORT_RETRIES => {
                    attempt += 1;
                    warn!(
                        ?error,
                        attempt, "Completion request failed to send, retrying"
                    );
                }
                Err(error) => return Err(error.into()),
            }
        };

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api { status, body });
        }

        let completion: ChatResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(CompletionError::EmptyResponse)
    }
}
