//! Configuration module for Prat.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{audience_modifier, CleanupPrompts, DialoguePrompts, PlanningPrompts, Prompts};
pub use settings::{
    default_request_timeout_secs, Audience, AudioSettings, DialogueSettings, GeneralSettings,
    PodcastStyle, PromptSettings, Settings, SubtitleSettings,
};
