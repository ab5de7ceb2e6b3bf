//! OpenAI text-to-speech synthesis.

use super::clip::AudioClip;
use crate::config::default_request_timeout_secs;
use crate::error::{PratError, Result};
use crate::openai::create_client;
use async_openai::types::{CreateSpeechRequestArgs, SpeechModel, SpeechResponseFormat, Voice};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Sample rate of raw PCM returned by the OpenAI speech endpoint.
pub const SYNTHESIS_SAMPLE_RATE: u32 = 24_000;

/// Voices accepted by the speech endpoint.
pub const AVAILABLE_VOICES: &[&str] = &["alloy", "echo", "fable", "onyx", "nova", "shimmer"];

/// Trait for speech synthesis services.
///
/// One method, so the mixer can be tested against a deterministic fake that
/// returns fixed-duration silent clips.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize one utterance in the given voice. Failure is a hard error;
    /// the caller aborts the run rather than emitting a partial podcast.
    async fn synthesize(&self, text: &str, voice: &str) -> Result<AudioClip>;
}

/// Resolve a voice name to the API's voice type.
pub fn voice_from_name(name: &str) -> Result<Voice> {
    match name.to_lowercase().as_str() {
        "alloy" => Ok(Voice::Alloy),
        "echo" => Ok(Voice::Echo),
        "fable" => Ok(Voice::Fable),
        "onyx" => Ok(Voice::Onyx),
        "nova" => Ok(Voice::Nova),
        "shimmer" => Ok(Voice::Shimmer),
        _ => Err(PratError::InvalidInput(format!(
            "Unknown voice: {}. Available voices: {}",
            name,
            AVAILABLE_VOICES.join(", ")
        ))),
    }
}

/// OpenAI TTS-backed synthesizer.
///
/// Requests raw PCM (24 kHz mono s16le) so clips go straight into the mixer
/// without a decode step.
pub struct OpenAiSynthesizer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAiSynthesizer {
    /// Create a synthesizer with the default high-quality model.
    pub fn new() -> Self {
        Self::with_model("tts-1-hd")
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

    fn speech_model(&self) -> SpeechModel {
        match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }
}

impl Default for OpenAiSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSynthesizer {
    #[instrument(skip(self, text), fields(voice = %voice, chars = text.len()))]
    async fn synthesize(&self, text: &str, voice: &str) -> Result<AudioClip> {
        let voice = voice_from_name(voice)?;

        let request = CreateSpeechRequestArgs::default()
            .model(self.speech_model())
            .voice(voice)
            .input(text.to_string())
            .response_format(SpeechResponseFormat::Pcm)
            .build()
            .map_err(|e| PratError::Synthesis(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .speech(request)
            .await
            .map_err(|e| PratError::OpenAI(format!("TTS API error: {}", e)))?;

        let samples = decode_pcm_s16le(response.bytes.as_ref());
        if samples.is_empty() {
            return Err(PratError::Synthesis(
                "TTS returned an empty audio stream".to_string(),
            ));
        }

        let clip = AudioClip::new(samples, 1, SYNTHESIS_SAMPLE_RATE)?;
        debug!("Synthesized {} ms of speech", clip.duration_ms());
        Ok(clip)
    }
}

/// Decode little-endian signed 16-bit PCM bytes. A trailing odd byte (from a
/// truncated stream) is dropped.
fn decode_pcm_s16le(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_from_name() {
        assert!(voice_from_name("nova").is_ok());
        assert!(voice_from_name("Echo").is_ok());
        assert!(voice_from_name("robotron").is_err());
    }

    #[test]
    fn test_decode_pcm_s16le() {
        // 0x0100 = 256, 0xFFFF = -1
        let bytes = [0x00, 0x01, 0xFF, 0xFF];
        assert_eq!(decode_pcm_s16le(&bytes), vec![256, -1]);
    }

    #[test]
    fn test_decode_pcm_drops_trailing_byte() {
        let bytes = [0x00, 0x01, 0xAB];
        assert_eq!(decode_pcm_s16le(&bytes), vec![256]);
    }
}
