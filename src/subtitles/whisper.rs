//! OpenAI Whisper subtitle transcription.

use super::SubtitleGenerator;
use crate::config::default_request_timeout_secs;
use crate::error::{PratError, Result};
use crate::openai::create_client;
use async_openai::types::{AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, instrument};

/// Whisper-backed subtitle generator.
///
/// Asks the API for SRT output directly; the response body is the finished
/// subtitle file, already broken into readable, properly timed cues.
pub struct WhisperSubtitler {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl WhisperSubtitler {
    pub fn new() -> Self {
        Self::with_model("whisper-1")
    }

    pub fn with_model(model: &str) -> Self {
        Self {
            client: create_client(default_request_timeout_secs()),
            model: model.to_string(),
        }
    }

    /// Set the API request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.client = create_client(timeout_secs);
        self
    }
}

impl Default for WhisperSubtitler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubtitleGenerator for WhisperSubtitler {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe_srt(&self, audio_path: &Path) -> Result<String> {
        let file_bytes = tokio::fs::read(audio_path).await?;
        debug!("Transcribing {} bytes for subtitles", file_bytes.len());

        let request = CreateTranscriptionRequestArgs::default()
            .file(async_openai::types::AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.mp3")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .response_format(AudioResponseFormat::Srt)
            .build()
            .map_err(|e| PratError::Subtitle(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe_raw(request)
            .await
            .map_err(|e| PratError::OpenAI(format!("Whisper API error: {}", e)))?;

        let srt = String::from_utf8_lossy(response.as_ref()).into_owned();
        if srt.trim().is_empty() {
            return Err(PratError::Subtitle(
                "Transcription returned an empty subtitle body".to_string(),
            ));
        }

        Ok(srt)
    }
}
