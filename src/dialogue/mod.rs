//! Dialogue module for Prat.
//!
//! Handles LLM-based dialogue and plan generation plus parsing of the
//! speaker-tagged transcript format (`HOST1: ...` / `HOST2: ...`).

mod generator;
mod models;
mod parse;
mod planner;

pub use generator::{extract_json_object, DialogueGenerator, DialogueOptions};
pub use models::{DialogueSegment, PodcastDialogue, Speaker, TokenUsage};
pub use parse::parse_dialogue;
pub use planner::{PlanGenerator, PlanTopic, PodcastPlan};
