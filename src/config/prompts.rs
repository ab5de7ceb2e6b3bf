//! Prompt templates for Prat.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use super::settings::{Audience, PodcastStyle};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub dialogue: DialoguePrompts,
    pub planning: PlanningPrompts,
    /// Prompts for cleaning up raw PDF text extraction.
    pub cleanup: CleanupPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Shared output-format contract appended to every style prompt. The dialogue
/// generator parses exactly this shape.
const DIALOGUE_FORMAT_RULES: &str = r#"
CRITICAL OUTPUT RULES:
- Respond with a single JSON object: {"segments": [{"speaker": "HOST1", "text": "..."}, ...]}
- "speaker" must be exactly "HOST1" or "HOST2" - no other names
- "text" is the spoken sentence(s) for that turn, plain prose only
- NO markdown formatting inside text (no **, __, #, lists)
- NO stage directions or [bracketed actions]
- Both hosts must speak; alternate naturally rather than in long monologues
- The hosts briefly introduce themselves at the start and wrap up at the end"#;

/// Per-style system prompts for dialogue generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialoguePrompts {
    pub educational: String,
    pub interview: String,
    pub casual: String,
    pub debate: String,
    /// User message wrapping the source material.
    pub user: String,
}

impl Default for DialoguePrompts {
    fn default() -> Self {
        Self {
            educational: format!(
                r#"You are a podcast dialogue writer. Convert the provided educational content into a natural, engaging conversation between two podcast hosts.

Guidelines:
- Create a friendly, conversational tone suitable for learning
- Have the hosts build on each other's points naturally
- Include clarifying questions and explanations
- Break down complex topics into digestible segments
- Use smooth transitions between topics
- Cover ALL major points from the source material thoroughly
- Explore each concept in detail with examples
- Aim for depth over brevity - take time to fully explain ideas
{}"#,
                DIALOGUE_FORMAT_RULES
            ),

            interview: format!(
                r#"You are a podcast dialogue writer. Convert the provided content into an interview between two podcast hosts: HOST1 is a curious interviewer, HOST2 is the subject-matter expert being interviewed.

Guidelines:
- HOST1 asks sharp, well-sequenced questions and reacts to answers
- HOST2 gives substantive, expert answers drawn from the source material
- Follow-up questions should probe the interesting parts of previous answers
- Keep the interviewer's share of words noticeably smaller than the expert's
- Cover all major points from the source material
{}"#,
                DIALOGUE_FORMAT_RULES
            ),

            casual: format!(
                r#"You are a podcast dialogue writer. Convert the provided content into a relaxed chat between two friends who co-host a podcast.

Guidelines:
- Conversational, informal tone with natural reactions and asides
- The hosts can joke lightly but must stay accurate to the source material
- Tangents are fine if they illuminate the topic, then return to the thread
- Still cover the major points; casual does not mean shallow
{}"#,
                DIALOGUE_FORMAT_RULES
            ),

            debate: format!(
                r#"You are a podcast dialogue writer. Convert the provided content into a structured but friendly debate between two podcast hosts taking opposing perspectives on the material.

Guidelines:
- Each host argues a coherent position grounded in the source material
- Hosts engage with each other's strongest points, not strawmen
- Include concessions where a point genuinely lands
- End with each host summarizing their position and common ground
{}"#,
                DIALOGUE_FORMAT_RULES
            ),

            user: r#"Convert this content into a podcast dialogue:

{{content}}"#
                .to_string(),
        }
    }
}

impl DialoguePrompts {
    /// System prompt for the given style.
    pub fn for_style(&self, style: PodcastStyle) -> &str {
        match style {
            PodcastStyle::Educational => &self.educational,
            PodcastStyle::Interview => &self.interview,
            PodcastStyle::Casual => &self.casual,
            PodcastStyle::Debate => &self.debate,
        }
    }
}

/// Modifier appended to the system prompt based on target audience.
pub fn audience_modifier(audience: Audience) -> &'static str {
    match audience {
        Audience::General => "",
        Audience::Technical => {
            "\n\nAudience: practitioners in the field. Use precise terminology without defining basics, and prefer concrete technical detail over analogy."
        }
        Audience::Academic => {
            "\n\nAudience: academic listeners. Attribute ideas carefully, distinguish established results from speculation, and keep claims precise."
        }
        Audience::Beginner => {
            "\n\nAudience: complete newcomers. Define every term on first use, lean on everyday analogies, and never assume prior knowledge."
        }
    }
}

/// Prompts for podcast plan generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningPrompts {
    pub system: String,
    pub user: String,
}

impl Default for PlanningPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a podcast producer. Analyze the provided content and create a structured episode plan that a dialogue writer will follow.

A good plan:
- Identifies every major topic the episode must cover
- Orders topics so the conversation builds naturally
- Lists the key points that must land within each topic
- Estimates time per topic so the episode has realistic pacing

Respond with a single JSON object:
{
  "overview": "one-paragraph episode summary",
  "target_audience": "who this episode is for",
  "estimated_total_minutes": 18.0,
  "topics": [
    {"title": "...", "key_points": ["...", "..."], "estimated_minutes": 4.0}
  ],
  "coverage_notes": "anything deliberately skipped or emphasized"
}"#
                .to_string(),

            user: r#"Create a podcast episode plan for this content:

{{content}}"#
                .to_string(),
        }
    }
}

/// Prompts for cleaning raw PDF text extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupPrompts {
    pub system: String,
}

impl Default for CleanupPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a document processing assistant. Clean the following text extracted from a PDF, preserving key information, structure, and meaning.

Rules:
- Remove page numbers, headers/footers, and line-wrap artifacts
- Rejoin hyphenated words split across lines
- Keep headings, paragraphs, and list structure readable as plain text
- Never summarize, paraphrase, or drop content
- Output the cleaned text only, no commentary"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let dialogue_path = custom_path.join("dialogue.toml");
            if dialogue_path.exists() {
                let content = std::fs::read_to_string(&dialogue_path)?;
                prompts.dialogue = toml::from_str(&content)?;
            }

            let planning_path = custom_path.join("planning.toml");
            if planning_path.exists() {
                let content = std::fs::read_to_string(&planning_path)?;
                prompts.planning = toml::from_str(&content)?;
            }

            let cleanup_path = custom_path.join("cleanup.toml");
            if cleanup_path.exists() {
                let content = std::fs::read_to_string(&cleanup_path)?;
                prompts.cleanup = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.dialogue.educational.is_empty());
        assert!(!prompts.planning.system.is_empty());
        // Every style prompt carries the JSON output contract
        for style in [
            PodcastStyle::Educational,
            PodcastStyle::Interview,
            PodcastStyle::Casual,
            PodcastStyle::Debate,
        ] {
            assert!(prompts.dialogue.for_style(style).contains("\"segments\""));
        }
    }

    #[test]
    fn test_audience_modifier() {
        assert!(audience_modifier(Audience::General).is_empty());
        assert!(audience_modifier(Audience::Beginner).contains("newcomers"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }
}
