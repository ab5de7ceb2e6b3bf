//! Prat - Conversational Podcast Generation
//!
//! A CLI tool for turning documents into two-host conversational podcasts.
//!
//! The name "Prat" comes from the Norwegian/Scandinavian word for "talk" or "chat."
//!
//! # Overview
//!
//! Prat allows you to:
//! - Convert markdown, text, and PDF documents into a podcast dialogue
//! - Narrate the dialogue with per-host OpenAI TTS voices
//! - Mix the narration with stereo panning and an ITD delay model so the two
//!   hosts sit audibly left and right of the listener
//! - Export a tagged MP3 plus a Whisper-transcribed SRT subtitle track
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management and prompt templates
//! - `document` - Document reading and text extraction
//! - `dialogue` - LLM dialogue/plan generation and transcript parsing
//! - `audio` - Speech synthesis, spatialization, timeline mixing, export
//! - `subtitles` - Whisper-based subtitle generation
//! - `pipeline` - End-to-end generation pipeline
//!
//! # Example
//!
//! ```rust,no_run
//! use prat::config::Settings;
//! use prat::pipeline::{GenerateRequest, Pipeline};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = Pipeline::new(settings)?;
//!
//!     let request = GenerateRequest::new(
//!         vec![PathBuf::from("lecture.md")],
//!         PathBuf::from("podcast.mp3"),
//!     );
//!     let result = pipeline.generate(request).await?;
//!     println!("Wrote {}", result.output_path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod dialogue;
pub mod document;
pub mod error;
pub mod openai;
pub mod pipeline;
pub mod subtitles;

pub use error::{PratError, Result};
