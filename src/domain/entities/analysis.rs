use crate::helper::error_chain_fmt;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;

/// Article-level result of the full-text analysis task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleMetadata {
    pub summary: String,
    /// Intended to stay under 50 characters, enforced by the prompt only
    pub title: String,
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
    /// Wrong word -> suggested replacement
    pub spelling: BTreeMap<String, String>,
    /// Person names found in the text
    pub personage: Vec<String>,
}

/// A time-bounded portion of a transcript with its own summary and labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Start timestamp in HH:MM:SS format, matching the subtitle timestamps
    pub start: String,
    /// End timestamp in HH:MM:SS format, matching the subtitle timestamps
    pub end: String,
    /// Segment content, summarized when needed, at most 150 words
    pub content: String,
    pub title: String,
    /// At most 3 keywords, comma-joined
    pub keywords: String,
    /// At most 3 tags, comma-joined
    pub tags: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSet {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarError {
    /// The word carrying the grammar or spelling error
    pub wrong_word: String,
    /// The suggested correction
    pub alter_word: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarErrorSet {
    pub grammar_errors: Vec<GrammarError>,
}

/// SEO criteria scores, each in the 0-100 range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoScore {
    pub keyword_use: u8,
    pub readability: u8,
    pub content_length: u8,
    pub content_quality: u8,
}

/// Combined output of one `analyze` run
///
/// The three task results are kept as named sections instead of being merged
/// into one flat map, so a field name shared by two tasks can never silently
/// overwrite the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub article: ArticleMetadata,
    pub segments: SegmentSet,
    pub grammar: GrammarErrorSet,
}

/// Parses an LLM response into one of the structured-output contracts
///
/// Models routinely wrap the JSON document in a markdown code fence, so the
/// fence is stripped before parsing. Anything that then fails to deserialize
/// (malformed JSON, missing field, wrong type) surfaces as
/// `StructuredResponseError` instead of being coerced.
pub fn parse_structured_response<T: DeserializeOwned>(
    raw: &str,
) -> Result<T, StructuredResponseError> {
    let cleaned = raw
        .trim()
        .strip_prefix("```json")
        .or_else(|| raw.trim().strip_prefix("```"))
        .unwrap_or(raw.trim());
    let cleaned = cleaned.strip_suffix("```").unwrap_or(cleaned).trim();

    serde_json::from_str(cleaned)
        .map_err(|e| StructuredResponseError::InvalidJsonData(e, cleaned.to_string()))
}

#[derive(thiserror::Error)]
pub enum StructuredResponseError {
    #[error("Response did not match the expected contract: {0}. Response: {1}")]
    InvalidJsonData(serde_json::Error, String),
}

impl std::fmt::Debug for StructuredResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_JSON: &str = r#"{
        "summary": "A short summary",
        "title": "A title",
        "keywords": ["k1", "k2"],
        "tags": ["t1"],
        "spelling": {"wrnog": "wrong"},
        "personage": ["John Doe"]
    }"#;

    #[test]
    fn parses_a_bare_json_document() {
        let article: ArticleMetadata = parse_structured_response(ARTICLE_JSON).unwrap();

        assert_eq!(article.title, "A title");
        assert_eq!(article.keywords, vec!["k1", "k2"]);
        assert_eq!(article.spelling.get("wrnog").unwrap(), "wrong");
    }

    #[test]
    fn strips_a_markdown_code_fence_before_parsing() {
        let fenced = format!("```json\n{}\n```", ARTICLE_JSON);

        let article: ArticleMetadata = parse_structured_response(&fenced).unwrap();

        assert_eq!(article.personage, vec!["John Doe"]);
    }

    #[test]
    fn a_missing_required_field_is_a_contract_error() {
        // No `summary` field
        let incomplete = r#"{"title": "A title", "keywords": [], "tags": [], "spelling": {}, "personage": []}"#;

        let result: Result<ArticleMetadata, _> = parse_structured_response(incomplete);

        assert!(matches!(
            result.unwrap_err(),
            StructuredResponseError::InvalidJsonData(_, _)
        ));
    }

    #[test]
    fn a_wrong_field_type_is_a_contract_error() {
        let wrong_type = r#"{"grammar_errors": "not-a-list"}"#;

        let result: Result<GrammarErrorSet, _> = parse_structured_response(wrong_type);

        assert!(result.is_err());
    }

    #[test]
    fn parses_segments_and_grammar_errors() {
        let segments: SegmentSet = parse_structured_response(
            r#"{"segments": [{"start": "00:00:01", "end": "00:00:05", "content": "c", "title": "t", "keywords": "k1,k2", "tags": "t1"}]}"#,
        )
        .unwrap();
        assert_eq!(segments.segments.len(), 1);
        assert_eq!(segments.segments[0].start, "00:00:01");

        let grammar: GrammarErrorSet = parse_structured_response(
            r#"{"grammar_errors": [{"wrong_word": "teh", "alter_word": "the"}]}"#,
        )
        .unwrap();
        assert_eq!(grammar.grammar_errors[0].alter_word, "the");
    }
}
