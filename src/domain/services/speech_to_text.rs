use crate::domain::entities::transcript::{SttResponse, Transcript};
use crate::helper::error_chain_fmt;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::info;

/// Client of the external speech-to-text service
///
/// The service downloads the media itself: the request only carries the
/// file URL, as a form field. A timeout is enforced on the whole exchange,
/// transcriptions that outlive it count as transport failures.
pub struct SpeechToTextService {
    client: ReqwestClient,
    url: String,
}

impl SpeechToTextService {
    pub fn new(url: String, timeout: Duration) -> Result<Self, SpeechToTextError> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;

        Ok(Self { client, url })
    }

    /// Transcribes the media behind `file_url` into raw + .srt text
    ///
    /// Success requires both an HTTP 2xx status and an embedded `code` of
    /// 200; anything else is an error for the caller to log and drop.
    #[tracing::instrument(name = "Requesting transcription", skip(self))]
    pub async fn transcribe(&self, file_url: &str) -> Result<Transcript, SpeechToTextError> {
        let response = self
            .client
            .post(&self.url)
            .form(&[("input", file_url)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SpeechToTextError::UnexpectedStatus(
                response.status().as_u16(),
            ));
        }

        let body: SttResponse = response.json().await?;

        if body.code != 200 {
            return Err(SpeechToTextError::Rejected(body.code));
        }

        info!("Transcribed {} ({} raw chars)", file_url, body.data.raw.len());

        Ok(body.data)
    }
}

#[derive(thiserror::Error)]
pub enum SpeechToTextError {
    #[error("Failed to reach the speech-to-text service: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Speech-to-text service answered with HTTP status {0}")]
    UnexpectedStatus(u16),
    #[error("Speech-to-text service rejected the input with code {0}")]
    Rejected(u16),
}

impl std::fmt::Debug for SpeechToTextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
