use std::sync::Arc;
use std::time::Duration;

use rdkafka::ClientConfig;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::configuration::Settings;
use crate::domain::services::analysis_pipeline::AnalysisPipeline;
use crate::domain::services::article_extractor::ArticleExtractor;
use crate::domain::services::speech_to_text::{SpeechToTextError, SpeechToTextService};
use crate::handlers::modality_worker::{run_worker, Modality, WorkerContext};
use crate::ports::chat_completion::CompletionError;
use crate::ports::message_queue::MessageQueueError;
use crate::repositories::completion_openai_repository::OpenAiCompletionRepository;
use crate::repositories::message_kafka_repository::{KafkaMessageConsumer, KafkaMessagePublisher};

/// Holds the three worker contexts until they are spawned
pub struct Application {
    workers: Vec<WorkerContext>,
    shutdown_grace: Duration,
}

impl Application {
    /// Builds every client and one worker context per modality
    #[tracing::instrument(name = "Building worker application", skip(settings))]
    pub async fn build(settings: Settings) -> Result<Self, ApplicationError> {
        let mut consumer_config = ClientConfig::new();
        consumer_config
            .set("group.id", &settings.kafka.group_id)
            .set("bootstrap.servers", settings.kafka.bootstrap_servers())
            .set("enable.partition.eof", "false")
            .set("session.timeout.ms", "6000")
            .set("auto.offset.reset", "earliest")
            // Offsets are never committed: after a restart the group replays,
            // downstream consumers must tolerate duplicates
            .set("enable.auto.commit", "false");

        let mut producer_config = ClientConfig::new();
        producer_config.set("bootstrap.servers", settings.kafka.bootstrap_servers());

        let publisher = Arc::new(KafkaMessagePublisher::new(&producer_config)?);

        let completion = OpenAiCompletionRepository::new(
            settings.llm.chat_completions_endpoint(),
            settings.llm.model.clone(),
            settings.llm.api_key.clone(),
        )?;
        let pipeline = Arc::new(AnalysisPipeline::new(Arc::new(completion)));

        let stt = Arc::new(SpeechToTextService::new(
            settings.stt.url.clone(),
            settings.stt.timeout(),
        )?);
        let extractor = Arc::new(ArticleExtractor::new());

        let topics = [
            (
                Modality::Audio,
                &settings.kafka.consume_topics.audio,
                &settings.kafka.produce_topics.audio,
            ),
            (
                Modality::Video,
                &settings.kafka.consume_topics.video,
                &settings.kafka.produce_topics.video,
            ),
            (
                Modality::Document,
                &settings.kafka.consume_topics.document,
                &settings.kafka.produce_topics.document,
            ),
        ];

        let mut workers = Vec::new();
        for (modality, consume_topic, produce_topic) in topics {
            let consumer = Arc::new(KafkaMessageConsumer::new(&consumer_config, consume_topic)?);

            workers.push(WorkerContext {
                modality,
                produce_topic: produce_topic.clone(),
                consumer,
                publisher: publisher.clone(),
                pipeline: pipeline.clone(),
                stt: stt.clone(),
                extractor: extractor.clone(),
                poll_delay: settings.application.poll_delay(),
                poll_timeout: settings.application.poll_timeout(),
            });
        }

        Ok(Self::with_workers(
            workers,
            settings.application.shutdown_grace(),
        ))
    }

    /// Assembles an application from prepared worker contexts
    ///
    /// Used by `build`, and by tests that inject mocked queue connections
    pub fn with_workers(workers: Vec<WorkerContext>, shutdown_grace: Duration) -> Self {
        Self {
            workers,
            shutdown_grace,
        }
    }

    /// Spawns the workers and blocks until the cancellation token fires
    ///
    /// On cancellation each worker is joined with a bounded grace timeout;
    /// a worker that misses the window is abandoned with a warning.
    ///
    /// self is moved in order for the application not to drop out of scope
    pub async fn run_until_stopped(
        self,
        cancel_token: CancellationToken,
    ) -> Result<(), ApplicationError> {
        let mut handlers = Vec::new();
        for context in self.workers {
            let modality = context.modality.as_str();
            handlers.push((
                modality,
                tokio::spawn(run_worker(context, cancel_token.clone())),
            ));
        }

        info!("📡 Running {} workers until stopped", handlers.len());
        cancel_token.cancelled().await;

        info!("Stop signal received, shutting the workers down");
        for (modality, handler) in handlers {
            match timeout(self.shutdown_grace, handler).await {
                Ok(Ok(())) => info!("{} worker joined", modality),
                Ok(Err(error)) => error!(?error, "{} worker panicked", modality),
                Err(_) => warn!(
                    "{} worker did not stop within the grace period, abandoning it",
                    modality
                ),
            }
        }

        info!("👋 Bye!");
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ApplicationError {
    #[error(transparent)]
    QueueError(#[from] MessageQueueError),
    #[error(transparent)]
    CompletionError(#[from] CompletionError),
    #[error(transparent)]
    SpeechToTextError(#[from] SpeechToTextError),
}
