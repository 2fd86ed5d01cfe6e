use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::domain::entities::inbound_message::InboundMessage;
use crate::domain::entities::outbound_message::OutboundMessage;
use crate::domain::services::analysis_pipeline::{AnalysisError, AnalysisPipeline};
use crate::domain::services::article_extractor::ArticleExtractor;
use crate::domain::services::speech_to_text::{SpeechToTextError, SpeechToTextService};
use crate::helper::error_chain_fmt;
use crate::ports::message_queue::{MessageConsumer, MessagePublisher, MessageQueueError};

/// The three independent input streams handled by this process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Audio,
    Video,
    Document,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Audio => "audio",
            Modality::Video => "video",
            Modality::Document => "document",
        }
    }

    /// Video envelopes omit the personage list
    fn includes_personage(&self) -> bool {
        !matches!(self, Modality::Video)
    }

    /// The document stream is throttled to one message per poll cycle; the
    /// other streams take everything a poll has ready
    pub fn max_messages_per_poll(&self) -> usize {
        match self {
            Modality::Document => 1,
            Modality::Audio | Modality::Video => usize::MAX,
        }
    }
}

/// Everything one worker needs, injected at startup
///
/// The publisher and the analysis pipeline are shared across workers; each
/// worker owns its consumer. Audio/video workers use the speech-to-text
/// service, the document worker the article extractor.
pub struct WorkerContext {
    pub modality: Modality,
    pub produce_topic: String,
    pub consumer: Arc<dyn MessageConsumer>,
    pub publisher: Arc<dyn MessagePublisher>,
    pub pipeline: Arc<AnalysisPipeline>,
    pub stt: Arc<SpeechToTextService>,
    pub extractor: Arc<ArticleExtractor>,
    /// Fixed pause between poll attempts, keeps the loop from spinning
    pub poll_delay: Duration,
    /// Upper bound on how long one poll waits for messages
    pub poll_timeout: Duration,
}

/// Runs one modality's consume-enrich-publish loop until cancelled
///
/// Every failure is contained at the granularity of a single message: the
/// message is logged and dropped, the loop moves on. Only cancellation ends
/// the loop, and it is honored at every suspension point so an in-flight
/// STT or LLM call is interrupted rather than awaited to completion.
#[tracing::instrument(
    name = "Running modality worker",
    skip(context, cancel_token),
    fields(modality = context.modality.as_str())
)]
pub async fn run_worker(context: WorkerContext, cancel_token: CancellationToken) {
    info!(
        "📡 {} worker consuming, waiting for messages ...",
        context.modality.as_str()
    );

    'poll: loop {
        tokio::select! {
            _ = cancel_token.cancelled() => break 'poll,
            _ = tokio::time::sleep(context.poll_delay) => {}
        }

        let batch = tokio::select! {
            _ = cancel_token.cancelled() => break 'poll,
            polled = context
                .consumer
                .poll_batch(context.poll_timeout, context.modality.max_messages_per_poll())
            => match polled {
                Ok(batch) => batch,
                Err(error) => {
                    error!(?error, "Failed to poll the consume topic");
                    continue;
                }
            }
        };

        for payload in batch {
            tokio::select! {
                _ = cancel_token.cancelled() => break 'poll,
                _ = handle_payload(&context, &payload).instrument(info_span!(
                    "Handling consumed message",
                    modality = context.modality.as_str(),
                    message_id = %Uuid::new_v4(),
                )) => {}
            }
        }
    }

    info!("👋 {} worker stopped", context.modality.as_str());
}

/// Decodes and processes one raw payload
///
/// This is the error wall: nothing below it may escape the loop.
async fn handle_payload(context: &WorkerContext, payload: &[u8]) {
    let message = match InboundMessage::try_parsing(payload) {
        Ok(message) => message,
        Err(error) => {
            error!(?error, "Failed to parse inbound message data: {}", error);
            return;
        }
    };

    info!(
        message_id = %message.id,
        "{} consuming message", context.modality.as_str()
    );

    match process_message(context, &message).await {
        // Ok(false): dropped on purpose, already logged
        Ok(_) => {}
        Err(error) => {
            error!(
                ?error,
                message_id = %message.id,
                "Failed to handle inbound message"
            );
        }
    }
}

/// Text derivation + analysis + publish for one decoded message
///
/// Returns Ok(false) when the message is dropped on purpose (audio/video
/// without a transcribable file path).
async fn process_message(
    context: &WorkerContext,
    message: &InboundMessage,
) -> Result<bool, ProcessMessageError> {
    let (text, subtitle) = match context.modality {
        Modality::Audio | Modality::Video => {
            let file_path = message
                .metadata
                .file_path
                .as_deref()
                .ok_or(ProcessMessageError::MissingField("FilePath"))?;

            if file_path.is_empty() || !file_path.starts_with("http") {
                info!(
                    message_id = %message.id,
                    "Skipping message: file path is not an HTTP(S) URL"
                );
                return Ok(false);
            }

            let transcript = context.stt.transcribe(file_path).await?;
            (transcript.raw, transcript.srt)
        }
        Modality::Document => {
            let content = message
                .metadata
                .content
                .as_deref()
                .ok_or(ProcessMessageError::MissingField("Content"))?;

            // Extraction always yields usable (possibly empty) text
            let body = context.extractor.extract(content);
            (body.clone(), body)
        }
    };

    let report = context.pipeline.analyze(&text).await?;

    let outbound = OutboundMessage::from_report(
        message.id.clone(),
        message.ref_id.clone(),
        subtitle,
        &report,
        context.modality.includes_personage(),
    )?;
    let payload = serde_json::to_vec(&outbound)?;

    context
        .publisher
        .publish(&context.produce_topic, &payload)
        .await?;

    info!(
        message_id = %message.id,
        "Published enriched {} message", context.modality.as_str()
    );

    Ok(true)
}

#[derive(thiserror::Error)]
pub enum ProcessMessageError {
    #[error("Message metadata is missing the `{0}` field")]
    MissingField(&'static str),
    #[error(transparent)]
    SpeechToText(#[from] SpeechToTextError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("Failed to encode the outbound message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Publish(#[from] MessageQueueError),
}

impl std::fmt::Debug for ProcessMessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
