use crate::domain::entities::analysis::{
    parse_structured_response, AnalysisReport, ArticleMetadata, GrammarErrorSet, SegmentSet,
    SeoScore, StructuredResponseError,
};
use crate::domain::prompts;
use crate::helper::error_chain_fmt;
use crate::ports::chat_completion::{ChatCompletionPort, CompletionError};
use std::sync::Arc;

/// Orchestrates the LLM tasks run against one body of text
///
/// `analyze` fans out the three enrichment tasks concurrently and merges
/// their structured results into one report. There is no retry at this
/// layer and no partial success: if any task fails, the whole run fails.
pub struct AnalysisPipeline {
    completion: Arc<dyn ChatCompletionPort>,
}

impl AnalysisPipeline {
    pub fn new(completion: Arc<dyn ChatCompletionPort>) -> Self {
        Self { completion }
    }

    /// Runs full-text analysis, grammar check and segmentation concurrently
    ///
    /// Empty text is passed through to the LLM unchecked; the tasks then
    /// simply come back with empty structures.
    #[tracing::instrument(name = "Analyzing text", skip_all)]
    pub async fn analyze(&self, text: &str) -> Result<AnalysisReport, AnalysisError> {
        let (article, grammar, segments) = tokio::try_join!(
            self.analyze_text(text),
            self.check_grammar(text),
            self.segment_text(text),
        )?;

        Ok(AnalysisReport {
            article,
            segments,
            grammar,
        })
    }

    /// Extracts summary, title, keywords, tags, spelling fixes and person names
    #[tracing::instrument(name = "Running full-text analysis", skip_all)]
    pub async fn analyze_text(&self, text: &str) -> Result<ArticleMetadata, AnalysisError> {
        let prompt = prompts::render(prompts::ANALYZE_PROMPT, text);
        let response = self.completion.complete(&prompt).await?;

        Ok(parse_structured_response(&response)?)
    }

    /// Flags single-word grammar and spelling errors
    #[tracing::instrument(name = "Running grammar check", skip_all)]
    pub async fn check_grammar(&self, text: &str) -> Result<GrammarErrorSet, AnalysisError> {
        let prompt = prompts::render_with_instructions(
            prompts::GRAMMAR_CHECK_PROMPT,
            text,
            prompts::GRAMMAR_FORMAT_INSTRUCTIONS,
        );
        let response = self.completion.complete(&prompt).await?;

        Ok(parse_structured_response(&response)?)
    }

    /// Splits subtitle-formatted text into summarized, time-bounded segments
    #[tracing::instrument(name = "Running segmentation", skip_all)]
    pub async fn segment_text(&self, text: &str) -> Result<SegmentSet, AnalysisError> {
        let prompt = prompts::render_with_instructions(
            prompts::SEGMENTATION_PROMPT,
            text,
            prompts::SEGMENTS_FORMAT_INSTRUCTIONS,
        );
        let response = self.completion.complete(&prompt).await?;

        Ok(parse_structured_response(&response)?)
    }

    /// Scores the text on SEO criteria, outside the `analyze` fan-out
    #[tracing::instrument(name = "Running SEO scoring", skip_all)]
    pub async fn score_seo(&self, text: &str) -> Result<SeoScore, AnalysisError> {
        let prompt = prompts::render(prompts::SEO_PROMPT, text);
        let response = self.completion.complete(&prompt).await?;

        Ok(parse_structured_response(&response)?)
    }
}

#[derive(thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error(transparent)]
    Contract(#[from] StructuredResponseError),
}

impl std::fmt::Debug for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
