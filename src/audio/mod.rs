//! Audio module for Prat.
//!
//! The computational core of the pipeline: PCM clip handling, speech
//! synthesis, spatialization (panning + ITD), timeline mixing, and MP3 export.
//!
//! # Pipeline
//!
//! Each dialogue segment is synthesized independently, upmixed to stereo if
//! the TTS engine returned mono, spatialized to its host's fixed left/right
//! position, and appended to a single growing timeline with a short pause
//! between utterances. The timeline is written out as a tagged MP3.
//!
//! Clips move forward through the stages by value; nothing is shared.

mod clip;
mod export;
mod mixer;
mod spatial;
mod tts;

pub use clip::AudioClip;
pub use export::{export_podcast, PodcastTags};
pub use mixer::{mix_segments, MixOptions, TimingRecord};
pub use spatial::{apply_spatial, MAX_ITD_MS};
pub use tts::{
    voice_from_name, OpenAiSynthesizer, SpeechSynthesizer, AVAILABLE_VOICES,
    SYNTHESIS_SAMPLE_RATE,
};
