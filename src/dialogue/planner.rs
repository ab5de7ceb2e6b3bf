//! LLM-based episode planning.
//!
//! Generates a structured outline before dialogue generation so long or dense
//! documents get comprehensive coverage instead of whatever the dialogue model
//! happens to reach before its token budget runs out.

use super::generator::{extract_json_object, response_preview};
use super::models::TokenUsage;
use crate::config::{default_request_timeout_secs, Prompts};
use crate::error::{PratError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Plans are denser than dialogue; half the dialogue budget with a floor.
const MIN_PLAN_TOKENS: u32 = 1500;
const MAX_PLAN_TOKENS: u32 = 2500;

/// A single topic in an episode plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTopic {
    pub title: String,
    pub key_points: Vec<String>,
    #[serde(default)]
    pub estimated_minutes: Option<f64>,
}

/// Structured episode plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodcastPlan {
    pub overview: String,
    pub topics: Vec<PlanTopic>,
    pub target_audience: String,
    #[serde(default)]
    pub estimated_total_minutes: Option<f64>,
    #[serde(default)]
    pub coverage_notes: Option<String>,
}

impl PodcastPlan {
    /// Check the plan has enough substance to guide dialogue generation.
    pub fn validate(&self) -> Result<()> {
        if self.overview.trim().len() < 10 {
            return Err(PratError::Dialogue(
                "Plan overview is missing or too short".to_string(),
            ));
        }
        if self.topics.is_empty() {
            return Err(PratError::Dialogue("Plan has no topics".to_string()));
        }
        if self.topics.iter().any(|t| t.key_points.is_empty()) {
            return Err(PratError::Dialogue(
                "Plan contains a topic with no key points".to_string(),
            ));
        }
        Ok(())
    }

    /// Render as markdown, for display and for embedding into the dialogue prompt.
    pub fn to_markdown(&self) -> String {
        let mut lines = vec![
            "# Episode Plan".to_string(),
            String::new(),
            format!("**Overview:** {}", self.overview),
            String::new(),
            format!("**Target Audience:** {}", self.target_audience),
            String::new(),
        ];

        if let Some(minutes) = self.estimated_total_minutes {
            lines.push(format!("**Estimated Duration:** {:.1} minutes", minutes));
            lines.push(String::new());
        }

        lines.push("## Topics".to_string());
        lines.push(String::new());

        for (i, topic) in self.topics.iter().enumerate() {
            lines.push(format!("### {}. {}", i + 1, topic.title));
            if let Some(minutes) = topic.estimated_minutes {
                lines.push(format!("*Duration: ~{:.1} min*", minutes));
            }
            lines.push(String::new());
            lines.push("**Key Points:**".to_string());
            for point in &topic.key_points {
                lines.push(format!("- {}", point));
            }
            lines.push(String::new());
        }

        if let Some(notes) = &self.coverage_notes {
            lines.push("## Coverage Notes".to_string());
            lines.push(String::new());
            lines.push(notes.clone());
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

/// LLM-based episode planner.
pub struct PlanGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    prompts: Prompts,
}

impl PlanGenerator {
    pub fn new() -> Self {
        Self::with_model("gpt-4o")
    }

    pub fn with_model(model: &str) -> Self {
        Self {
            client: create_client(default_request_timeout_secs()),
            model: model.to_string(),
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Set the API request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.client = create_client(timeout_secs);
        self
    }

    /// Output token budget for plan generation.
    fn max_tokens(input_chars: usize, unlock_limit: bool) -> Option<u32> {
        if unlock_limit {
            return None;
        }
        // Half of the dialogue scale (2 tokens/char) is 1 token/char
        let scaled = input_chars.min(u32::MAX as usize) as u32;
        Some(scaled.clamp(MIN_PLAN_TOKENS, MAX_PLAN_TOKENS))
    }

    /// Generate an episode plan from document text.
    pub async fn generate(
        &self,
        text: &str,
        unlock_token_limit: bool,
    ) -> Result<(PodcastPlan, TokenUsage)> {
        let mut vars = HashMap::new();
        vars.insert("content".to_string(), text.to_string());

        let system_message = self
            .prompts
            .render_with_custom(&self.prompts.planning.system, &vars);
        let user_message = self
            .prompts
            .render_with_custom(&self.prompts.planning.user, &vars);

        info!("Generating episode plan with {}", self.model);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_message)
                .build()
                .map_err(|e| PratError::Dialogue(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()
                .map_err(|e| PratError::Dialogue(e.to_string()))?
                .into(),
        ];

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder
            .model(&self.model)
            .messages(messages)
            .temperature(0.3);
        if let Some(tokens) = Self::max_tokens(text.len(), unlock_token_limit) {
            request_builder.max_tokens(tokens);
        }
        let request = request_builder
            .build()
            .map_err(|e| PratError::Dialogue(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PratError::OpenAI(format!("Failed to get plan response: {}", e)))?;

        let usage = response
            .usage
            .as_ref()
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| PratError::Dialogue("Empty plan response from LLM".to_string()))?;

        debug!("LLM plan response: {}", response_preview(content));

        let plan = Self::parse_response(content)?;
        plan.validate()?;

        info!("Generated plan with {} topics", plan.topics.len());
        Ok((plan, usage))
    }

    fn parse_response(response: &str) -> Result<PodcastPlan> {
        let json_str = extract_json_object(response);
        serde_json::from_str(json_str).map_err(|e| {
            PratError::Dialogue(format!(
                "Failed to parse plan response: {}. Response was: {}",
                e,
                response_preview(response)
            ))
        })
    }
}

impl Default for PlanGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> PodcastPlan {
        PodcastPlan {
            overview: "An episode about the borrow checker.".to_string(),
            topics: vec![PlanTopic {
                title: "Ownership".to_string(),
                key_points: vec!["Moves".to_string(), "Borrows".to_string()],
                estimated_minutes: Some(5.0),
            }],
            target_audience: "Rust beginners".to_string(),
            estimated_total_minutes: Some(15.0),
            coverage_notes: None,
        }
    }

    #[test]
    fn test_parse_response() {
        let json = r#"{
            "overview": "A tour of the topic in plain language.",
            "target_audience": "general listeners",
            "topics": [
                {"title": "Basics", "key_points": ["What it is", "Why it matters"], "estimated_minutes": 4.5}
            ]
        }"#;

        let plan = PlanGenerator::parse_response(json).unwrap();
        assert_eq!(plan.topics.len(), 1);
        assert_eq!(plan.topics[0].key_points.len(), 2);
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_topics() {
        let mut plan = sample_plan();
        plan.topics.clear();
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_to_markdown() {
        let md = sample_plan().to_markdown();
        assert!(md.contains("# Episode Plan"));
        assert!(md.contains("### 1. Ownership"));
        assert!(md.contains("- Moves"));
        assert!(md.contains("15.0 minutes"));
    }

    #[test]
    fn test_parse_response_multibyte_near_preview_cut() {
        let mut response = "x".repeat(499);
        response.push('ø');
        response.push_str(" still not a plan");
        assert!(PlanGenerator::parse_response(&response).is_err());
    }

    #[test]
    fn test_max_tokens_bounds() {
        assert_eq!(PlanGenerator::max_tokens(100, false), Some(1500));
        assert_eq!(PlanGenerator::max_tokens(2000, false), Some(2000));
        assert_eq!(PlanGenerator::max_tokens(100_000, false), Some(2500));
        assert_eq!(PlanGenerator::max_tokens(100_000, true), None);
    }
}
