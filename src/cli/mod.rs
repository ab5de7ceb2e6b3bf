//! CLI module for Prat.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::config::{Audience, PodcastStyle};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Prat - Document to Podcast Generator
///
/// Turns documents into a two-host podcast conversation with synthesized
/// voices, spatial audio, and subtitles. The name "Prat" comes from the
/// Norwegian word for "talk" or "chat."
#[derive(Parser, Debug)]
#[command(name = "prat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Prat and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Generate a podcast from one or more documents
    Generate {
        /// Input documents (markdown, plain text, or PDF)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output MP3 path
        #[arg(short, long, default_value = "podcast.mp3")]
        output: PathBuf,

        /// Conversation style (educational, interview, casual, debate)
        #[arg(short, long)]
        style: Option<PodcastStyle>,

        /// Target audience (general, technical, academic, beginner)
        #[arg(short, long)]
        audience: Option<Audience>,

        /// LLM model for dialogue and plan generation
        #[arg(long)]
        dialogue_model: Option<String>,

        /// Voice for the first host
        #[arg(long)]
        host1_voice: Option<String>,

        /// Voice for the second host
        #[arg(long)]
        host2_voice: Option<String>,

        /// Stereo separation between the hosts (0.0 = both centered, 1.0 = hard panned)
        #[arg(long)]
        separation: Option<f32>,

        /// Pause between dialogue segments in milliseconds
        #[arg(long)]
        pause_ms: Option<u64>,

        /// Generate a structured episode plan before the dialogue
        #[arg(long)]
        plan: bool,

        /// Save the generated dialogue transcript next to the output (.txt)
        #[arg(long)]
        save_dialogue: bool,

        /// Save the generated episode plan next to the output (.plan.txt)
        #[arg(long)]
        save_plan: bool,

        /// Remove the dialogue output token cap (longer episodes, higher cost)
        #[arg(long)]
        unlock_token_limit: bool,

        /// Extra instructions for the dialogue writer
        #[arg(short, long)]
        instructions: Option<String>,

        /// Skip subtitle generation
        #[arg(long)]
        no_subtitles: bool,

        /// Write segment timing records as JSON to this path
        #[arg(long)]
        timing_output: Option<PathBuf>,
    },

    /// List available TTS voices
    Voices,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
