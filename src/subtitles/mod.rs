//! Subtitle generation for Prat.
//!
//! The exported podcast is sent to a transcription service which returns a
//! ready-made SRT body; it is persisted verbatim. Subtitle timing comes from
//! the exported audio itself, not from the mixer's timing records.
//!
//! This is a best-effort auxiliary output: the pipeline treats any failure
//! here as a warning, never as a failed run.

mod whisper;

pub use whisper::WhisperSubtitler;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for subtitle transcription services.
#[async_trait]
pub trait SubtitleGenerator: Send + Sync {
    /// Transcribe the audio file and return the subtitle body in SRT format.
    async fn transcribe_srt(&self, audio_path: &Path) -> Result<String>;
}
