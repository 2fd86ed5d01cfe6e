#![allow(dead_code)]
//! Shared test utilities: tracing init, canned LLM responses, and mock
//! implementations of the queue and chat-completion ports.

use async_trait::async_trait;
use content_enrichment_worker::domain::services::analysis_pipeline::AnalysisPipeline;
use content_enrichment_worker::domain::services::article_extractor::ArticleExtractor;
use content_enrichment_worker::domain::services::speech_to_text::SpeechToTextService;
use content_enrichment_worker::handlers::modality_worker::{Modality, WorkerContext};
use content_enrichment_worker::ports::chat_completion::{ChatCompletionPort, CompletionError};
use content_enrichment_worker::ports::message_queue::{
    MessageConsumer, MessagePublisher, MessageQueueError,
};
use content_enrichment_worker::telemetry::{get_tracing_subscriber, init_tracing_subscriber};
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

// Ensures that the `tracing` stack is only initialized once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "integration_tests".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber =
            get_tracing_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_tracing_subscriber(subscriber);
    } else {
        let subscriber =
            get_tracing_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_tracing_subscriber(subscriber);
    };
});

pub fn init_tracing() {
    Lazy::force(&TRACING);
}

// --- Canned LLM task responses ---

pub const ARTICLE_JSON: &str = r#"{"summary": "the summary", "title": "the title", "keywords": ["k1", "k2"], "tags": ["t1", "t2"], "spelling": {"wrnog": "wrong"}, "personage": ["John Doe"]}"#;

pub const SEGMENTS_JSON: &str = r#"{"segments": [{"start": "00:00:01", "end": "00:00:05", "content": "the segment", "title": "segment title", "keywords": "k1,k2", "tags": "t1"}]}"#;

pub const GRAMMAR_JSON: &str = r#"{"grammar_errors": [{"wrong_word": "teh", "alter_word": "the"}]}"#;

pub const SEO_JSON: &str =
    r#"{"keyword_use": 80, "readability": 70, "content_length": 60, "content_quality": 90}"#;

/// Picks the canned response matching the task a prompt belongs to
pub fn canned_response_for(prompt: &str) -> String {
    if prompt.contains("grammar and spelling corrector") {
        GRAMMAR_JSON.to_string()
    } else if prompt.contains("Act as a text analyzer") {
        SEGMENTS_JSON.to_string()
    } else if prompt.contains("SEO") {
        SEO_JSON.to_string()
    } else {
        ARTICLE_JSON.to_string()
    }
}

// --- Mock chat-completion port ---

/// In-memory LLM double: records every prompt and answers with the canned
/// response of the matching task
#[derive(Default)]
pub struct MockChatCompletion {
    pub prompts: std::sync::Mutex<Vec<String>>,
}

impl MockChatCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletionPort for MockChatCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        Ok(canned_response_for(prompt))
    }
}

// --- Mock queue ports ---

/// Scripted consumer: hands out the prepared batches one poll at a time,
/// honoring `max_messages` by deferring the surplus, then behaves like an
/// idle topic (waits out `max_wait` and returns nothing)
pub struct MockMessageConsumer {
    pending: Mutex<VecDeque<Vec<u8>>>,
    pub poll_caps: std::sync::Mutex<Vec<usize>>,
}

impl MockMessageConsumer {
    pub fn with_messages(messages: Vec<Vec<u8>>) -> Self {
        Self {
            pending: Mutex::new(messages.into()),
            poll_caps: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn idle() -> Self {
        Self::with_messages(Vec::new())
    }

    pub fn recorded_poll_caps(&self) -> Vec<usize> {
        self.poll_caps.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageConsumer for MockMessageConsumer {
    async fn poll_batch(
        &self,
        max_wait: Duration,
        max_messages: usize,
    ) -> Result<Vec<Vec<u8>>, MessageQueueError> {
        self.poll_caps.lock().unwrap().push(max_messages);

        let mut pending = self.pending.lock().await;
        if pending.is_empty() {
            drop(pending);
            tokio::time::sleep(max_wait).await;
            return Ok(Vec::new());
        }

        let taken = max_messages.min(pending.len());
        Ok(pending.drain(..taken).collect())
    }
}

/// Records everything published, per topic
#[derive(Default)]
pub struct MockMessagePublisher {
    records: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MockMessagePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<(String, Vec<u8>)> {
        self.records.lock().await.clone()
    }

    pub async fn published_json(&self) -> Vec<(String, serde_json::Value)> {
        self.records()
            .await
            .into_iter()
            .map(|(topic, payload)| (topic, serde_json::from_slice(&payload).unwrap()))
            .collect()
    }
}

#[async_trait]
impl MessagePublisher for MockMessagePublisher {
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), MessageQueueError> {
        self.records
            .lock()
            .await
            .push((topic.to_string(), payload.to_vec()));

        Ok(())
    }
}

// --- Worker context assembly ---

/// Builds a fast-cycling worker context around mocked ports
///
/// The speech-to-text service is real and points at `stt_url` (a wiremock
/// server in the tests that exercise it, a dead address otherwise).
pub fn worker_context(
    modality: Modality,
    consumer: Arc<MockMessageConsumer>,
    publisher: Arc<MockMessagePublisher>,
    completion: Arc<MockChatCompletion>,
    stt_url: &str,
) -> WorkerContext {
    WorkerContext {
        modality,
        produce_topic: format!("enriched.{}", modality.as_str()),
        consumer,
        publisher,
        pipeline: Arc::new(AnalysisPipeline::new(completion)),
        stt: Arc::new(
            SpeechToTextService::new(stt_url.to_string(), Duration::from_secs(5)).unwrap(),
        ),
        extractor: Arc::new(ArticleExtractor::new()),
        poll_delay: Duration::from_millis(10),
        poll_timeout: Duration::from_millis(20),
    }
}

/// Inbound audio/video payload pointing at a media file
pub fn media_message(id: &str, ref_id: &str, file_path: &str) -> Vec<u8> {
    serde_json::json!({
        "Id": id,
        "RefId": ref_id,
        "Metadata": { "FilePath": file_path }
    })
    .to_string()
    .into_bytes()
}

/// Inbound document payload carrying inline HTML
pub fn document_message(id: &str, ref_id: &str, content: &str) -> Vec<u8> {
    serde_json::json!({
        "Id": id,
        "RefId": ref_id,
        "Metadata": { "Content": content }
    })
    .to_string()
    .into_bytes()
}

/// Successful STT response body for a wiremock server
pub fn stt_success_body(raw: &str, srt: &str) -> serde_json::Value {
    serde_json::json!({ "code": 200, "data": { "raw": raw, "srt": srt } })
}
