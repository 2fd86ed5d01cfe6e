use crate::helper::error_chain_fmt;
use serde::Deserialize;

/// Envelope received on every consume topic
///
/// The `Metadata` shape depends on the modality: audio/video messages carry
/// a `FilePath` pointing at the media to transcribe, document messages carry
/// the raw HTML/text in `Content`. Both fields are kept optional here, the
/// worker picks the one its modality needs.
#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "RefId")]
    pub ref_id: String,
    #[serde(rename = "Metadata")]
    pub metadata: InboundMetadata,
}

#[derive(Debug, Default, Deserialize)]
pub struct InboundMetadata {
    #[serde(rename = "FilePath", default)]
    pub file_path: Option<String>,
    #[serde(rename = "Content", default)]
    pub content: Option<String>,
}

impl InboundMessage {
    pub fn try_parsing(data: &[u8]) -> Result<Self, InboundMessageError> {
        let data = std::str::from_utf8(data)?;
        let message = serde_json::from_str(data)
            .map_err(|e| InboundMessageError::InvalidJsonData(e, data.to_string()))?;

        Ok(message)
    }
}

#[derive(thiserror::Error)]
pub enum InboundMessageError {
    #[error("Data could not be converted from utf8 u8 vector to string")]
    InvalidStringData(#[from] std::str::Utf8Error),

    #[error("Data did not represent a valid JSON object: {0}. Data: {1}")]
    InvalidJsonData(serde_json::Error, String),
}

impl std::fmt::Debug for InboundMessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
