//! LLM-based dialogue generation.
//!
//! Turns extracted document text into a two-host conversation, returned as
//! structured JSON segments.

use super::models::{PodcastDialogue, TokenUsage};
use crate::config::{
    audience_modifier, default_request_timeout_secs, Audience, PodcastStyle, Prompts,
};
use crate::error::{PratError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use std::collections::HashMap;
use tracing::{debug, info};

/// Floor for the output token budget, so very short documents still get a
/// complete conversation.
const MIN_DIALOGUE_TOKENS: u32 = 2000;

/// Cap targeting roughly a 20-minute episode; beyond this, model output limits
/// start truncating dialogue mid-conversation.
const MAX_DIALOGUE_TOKENS: u32 = 5000;

/// Longest response excerpt included in logs and parse errors.
const RESPONSE_PREVIEW_CHARS: usize = 500;

/// Truncate a model response for logs and error messages, cutting on a
/// character boundary so multi-byte text never splits mid-character.
pub(crate) fn response_preview(response: &str) -> &str {
    match response.char_indices().nth(RESPONSE_PREVIEW_CHARS) {
        Some((idx, _)) => &response[..idx],
        None => response,
    }
}

/// Options for a single dialogue generation call.
#[derive(Debug, Clone, Default)]
pub struct DialogueOptions {
    pub style: PodcastStyle,
    pub audience: Audience,
    /// Extra instructions appended to the system prompt.
    pub custom_instructions: Option<String>,
    /// Episode plan (markdown) the dialogue should follow.
    pub plan: Option<String>,
    /// Remove the output token cap.
    pub unlock_token_limit: bool,
}

/// LLM-based dialogue generator.
pub struct DialogueGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    scale_factor: f64,
    prompts: Prompts,
}

impl DialogueGenerator {
    pub fn new() -> Self {
        Self::with_model("gpt-4o")
    }

    pub fn with_model(model: &str) -> Self {
        Self {
            client: create_client(default_request_timeout_secs()),
            model: model.to_string(),
            scale_factor: 2.0,
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

    /// Set the output-tokens-per-input-character scale factor.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Output token budget for the given input length, or None when unlocked.
    ///
    /// Scales with input size so short documents get proportionally shorter
    /// episodes, clamped to [MIN_DIALOGUE_TOKENS, MAX_DIALOGUE_TOKENS].
    pub fn max_tokens(&self, input_chars: usize, unlock_limit: bool) -> Option<u32> {
        if unlock_limit {
            return None;
        }
        let scaled = (input_chars as f64 * self.scale_factor) as u32;
        Some(scaled.clamp(MIN_DIALOGUE_TOKENS, MAX_DIALOGUE_TOKENS))
    }

    /// Generate dialogue from document text.
    pub async fn generate(
        &self,
        text: &str,
        options: &DialogueOptions,
    ) -> Result<(PodcastDialogue, TokenUsage)> {
        let mut system_prompt = self
            .prompts
            .dialogue
            .for_style(options.style)
            .to_string();
        system_prompt.push_str(audience_modifier(options.audience));

        if let Some(instructions) = &options.custom_instructions {
            system_prompt.push_str(&format!("\n\nAdditional instructions: {}", instructions));
        }

        if let Some(plan) = &options.plan {
            system_prompt.push_str(&format!(
                "\n\nEpisode plan to follow:\n{}\n\nGenerate dialogue that comprehensively covers all topics in the plan.",
                plan
            ));
        }

        let max_tokens = self.max_tokens(text.len(), options.unlock_token_limit);
        if let Some(tokens) = max_tokens {
            // ~4 chars/token spoken at ~1000 chars/min
            let estimated_minutes = (tokens * 4) / 1000;
            system_prompt.push_str(&format!(
                "\n\nIMPORTANT: Target episode duration is approximately {} minutes. Structure the conversation to naturally conclude within this timeframe while covering the key points.",
                estimated_minutes
            ));
        }

        let mut vars = HashMap::new();
        vars.insert("content".to_string(), text.to_string());
        let user_message = self
            .prompts
            .render_with_custom(&self.prompts.dialogue.user, &vars);

        info!(
            "Generating dialogue with {} (style: {}, audience: {}, max_tokens: {})",
            self.model,
            options.style,
            options.audience,
            max_tokens.map_or("unlimited".to_string(), |t| t.to_string()),
        );

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
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
            .temperature(0.7);
        if let Some(tokens) = max_tokens {
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
            .map_err(|e| PratError::OpenAI(format!("Failed to get dialogue response: {}", e)))?;

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
            .ok_or_else(|| PratError::Dialogue("Empty response from LLM".to_string()))?;

        debug!("LLM dialogue response: {}", response_preview(content));

        let mut dialogue = Self::parse_response(content)?;
        dialogue.normalize();
        dialogue.validate()?;

        let (host1, host2) = dialogue.segment_counts();
        info!(
            "Generated dialogue: {} HOST1 segments, {} HOST2 segments",
            host1, host2
        );

        Ok((dialogue, usage))
    }

    /// Parse the LLM response into a dialogue, tolerating surrounding prose
    /// and markdown code fences.
    fn parse_response(response: &str) -> Result<PodcastDialogue> {
        let json_str = extract_json_object(response);
        serde_json::from_str(json_str).map_err(|e| {
            PratError::Dialogue(format!(
                "Failed to parse dialogue response: {}. Response was: {}",
                e,
                response_preview(response)
            ))
        })
    }
}

impl Default for DialogueGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the outermost JSON object from a model response that may wrap it
/// in markdown fences or commentary.
pub fn extract_json_object(response: &str) -> &str {
    let json_start = response.find('{');
    let json_end = response.rfind('}');

    match (json_start, json_end) {
        (Some(start), Some(end)) if end > start => &response[start..=end],
        _ => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::Speaker;

    #[test]
    fn test_parse_response() {
        let json = r#"{"segments": [
            {"speaker": "HOST1", "text": "Welcome to the show!"},
            {"speaker": "HOST2", "text": "Glad to be here."}
        ]}"#;

        let dialogue = DialogueGenerator::parse_response(json).unwrap();
        assert_eq!(dialogue.segments.len(), 2);
        assert_eq!(dialogue.segments[0].speaker, Speaker::Host1);
        assert_eq!(dialogue.segments[1].text, "Glad to be here.");
    }

    #[test]
    fn test_parse_response_with_markdown() {
        let response = r#"Here is the dialogue:

```json
{"segments": [{"speaker": "HOST1", "text": "Hi"}, {"speaker": "HOST2", "text": "Hello"}]}
```

Enjoy the episode!"#;

        let dialogue = DialogueGenerator::parse_response(response).unwrap();
        assert_eq!(dialogue.segments.len(), 2);
    }

    #[test]
    fn test_parse_response_rejects_garbage() {
        assert!(DialogueGenerator::parse_response("no json here").is_err());
    }

    #[test]
    fn test_parse_response_multibyte_near_preview_cut() {
        // 499 ASCII bytes followed by a two-byte char straddling byte 500;
        // the error path must truncate the excerpt without panicking.
        let mut response = "a".repeat(499);
        response.push('é');
        response.push_str(" and no JSON anywhere in this reply");

        let result = DialogueGenerator::parse_response(&response);
        assert!(matches!(result, Err(PratError::Dialogue(_))));
    }

    #[test]
    fn test_response_preview_cuts_on_char_boundary() {
        let long = "é".repeat(600);
        let preview = response_preview(&long);
        assert_eq!(preview.chars().count(), 500);

        assert_eq!(response_preview("short"), "short");
    }

    #[test]
    fn test_max_tokens_bounds() {
        let generator = DialogueGenerator::new();
        // Small input hits the floor
        assert_eq!(generator.max_tokens(100, false), Some(2000));
        // Mid-size input scales at 2 tokens per char
        assert_eq!(generator.max_tokens(1500, false), Some(3000));
        // Large input hits the cap
        assert_eq!(generator.max_tokens(100_000, false), Some(5000));
        // Unlocked removes the budget entirely
        assert_eq!(generator.max_tokens(100_000, true), None);
    }
}
