use serde::Deserialize;

/// Body returned by the speech-to-text service
///
/// The HTTP status alone is not enough to trust the payload: the service
/// reports its own outcome in `code`, which must also be 200.
#[derive(Debug, Deserialize)]
pub struct SttResponse {
    pub code: u16,
    pub data: Transcript,
}

/// Transcript of one audio/video source
#[derive(Debug, Clone, Deserialize)]
pub struct Transcript {
    /// Plain transcript text, fed to the analysis pipeline
    pub raw: String,
    /// Same content formatted as .srt subtitles, forwarded as-is downstream
    pub srt: String,
}
