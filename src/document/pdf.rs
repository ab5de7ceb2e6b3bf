//! PDF text extraction via pdftotext, with optional LLM cleanup.

use crate::config::{default_request_timeout_secs, Prompts};
use crate::error::{PratError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Extract raw text from a PDF using pdftotext.
#[instrument(fields(path = %path.display()))]
pub async fn extract_pdf_text(path: &Path) -> Result<String> {
    // "-" sends the extracted text to stdout
    let result = Command::new("pdftotext")
        .arg("-layout")
        .arg(path)
        .arg("-")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PratError::ToolNotFound("pdftotext".into()));
        }
        Err(e) => {
            return Err(PratError::Document(format!(
                "pdftotext execution failed: {}",
                e
            )));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PratError::Document(format!("pdftotext failed: {}", stderr)));
    }

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    if text.trim().is_empty() {
        return Err(PratError::Document(format!(
            "No text extracted from {}",
            path.display()
        )));
    }

    debug!("Extracted {} chars from PDF", text.len());
    Ok(text)
}

/// LLM-based cleanup of raw PDF extraction artifacts.
pub struct DocumentCleaner {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    prompts: Prompts,
}

impl DocumentCleaner {
    pub fn new() -> Self {
        Self::with_model("gpt-4o-mini")
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

    /// Clean extracted text, removing layout artifacts while preserving content.
    pub async fn clean(&self, raw_text: &str) -> Result<String> {
        info!("Cleaning extracted PDF text with {}", self.model);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.prompts.cleanup.system.clone())
                .build()
                .map_err(|e| PratError::Document(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(format!("Clean and structure this PDF text:\n\n{}", raw_text))
                .build()
                .map_err(|e| PratError::Document(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.0)
            .build()
            .map_err(|e| PratError::Document(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PratError::OpenAI(format!("Failed to get cleanup response: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| PratError::Document("Empty cleanup response".to_string()))?;

        Ok(content.clone())
    }
}

impl Default for DocumentCleaner {
    fn default() -> Self {
        Self::new()
    }
}
