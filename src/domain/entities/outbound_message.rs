use super::analysis::AnalysisReport;
use serde::{Deserialize, Serialize};

/// Enriched envelope published to the produce topics
///
/// `Id` and `RefId` are carried over from the inbound message. The list and
/// map fields are JSON-encoded strings nested inside the JSON envelope: the
/// double encoding is part of the downstream contract.
#[derive(Debug, Serialize, Deserialize)]
pub struct OutboundMessage {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "RefId")]
    pub ref_id: String,
    #[serde(rename = "Metadata")]
    pub metadata: EnrichedMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnrichedMetadata {
    /// The .srt text for audio/video, the extracted article body for documents
    #[serde(rename = "Subtitle")]
    pub subtitle: String,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Keyword")]
    pub keyword: String,
    #[serde(rename = "Tags")]
    pub tags: String,
    #[serde(rename = "Spelling")]
    pub spelling: String,
    /// Omitted on the video path
    #[serde(rename = "Personage", skip_serializing_if = "Option::is_none")]
    pub personage: Option<String>,
}

impl OutboundMessage {
    /// Builds the outbound envelope from an analysis report
    ///
    /// # Arguments
    /// - `subtitle`: the text carried through unmodified next to the analysis fields
    /// - `include_personage`: false on the video path, true otherwise
    pub fn from_report(
        id: String,
        ref_id: String,
        subtitle: String,
        report: &AnalysisReport,
        include_personage: bool,
    ) -> Result<Self, serde_json::Error> {
        let personage = if include_personage {
            Some(serde_json::to_string(&report.article.personage)?)
        } else {
            None
        };

        Ok(Self {
            id,
            ref_id,
            metadata: EnrichedMetadata {
                subtitle,
                summary: report.article.summary.clone(),
                title: report.article.title.clone(),
                keyword: serde_json::to_string(&report.article.keywords)?,
                tags: serde_json::to_string(&report.article.tags)?,
                spelling: serde_json::to_string(&report.article.spelling)?,
                personage,
            },
        })
    }
}
