//! Generate command implementation.

use crate::audio::AVAILABLE_VOICES;
use crate::cli::output::format_duration_ms;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Audience, PodcastStyle, Settings};
use crate::document::is_pdf;
use crate::pipeline::{GenerateRequest, Pipeline};
use anyhow::Result;
use std::path::PathBuf;

/// Arguments for the generate command (CLI overrides on top of config).
#[derive(Debug)]
pub struct GenerateArgs {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub style: Option<PodcastStyle>,
    pub audience: Option<Audience>,
    pub dialogue_model: Option<String>,
    pub host1_voice: Option<String>,
    pub host2_voice: Option<String>,
    pub separation: Option<f32>,
    pub pause_ms: Option<u64>,
    pub plan: bool,
    pub save_dialogue: bool,
    pub save_plan: bool,
    pub unlock_token_limit: bool,
    pub instructions: Option<String>,
    pub no_subtitles: bool,
    pub timing_output: Option<PathBuf>,
}

/// Run the generate command.
pub async fn run_generate(args: GenerateArgs, mut settings: Settings) -> Result<()> {
    // Pre-flight checks
    let has_pdf = args.inputs.iter().any(|p| is_pdf(p));
    if let Err(e) = preflight::check(Operation::Generate { has_pdf }) {
        Output::error(&format!("{}", e));
        Output::info("Run 'prat doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    for input in &args.inputs {
        if !input.exists() {
            Output::error(&format!("Input file not found: {}", input.display()));
            return Err(anyhow::anyhow!("input file not found"));
        }
    }

    // Merge CLI overrides into settings
    if let Some(style) = args.style {
        settings.dialogue.style = style;
    }
    if let Some(audience) = args.audience {
        settings.dialogue.audience = audience;
    }
    if let Some(model) = &args.dialogue_model {
        settings.dialogue.model = model.clone();
    }
    if let Some(voice) = &args.host1_voice {
        validate_voice(voice)?;
        settings.audio.host1_voice = voice.clone();
    }
    if let Some(voice) = &args.host2_voice {
        validate_voice(voice)?;
        settings.audio.host2_voice = voice.clone();
    }
    if let Some(separation) = args.separation {
        settings.audio.spatial_separation = separation;
    }
    if let Some(pause_ms) = args.pause_ms {
        settings.audio.pause_ms = pause_ms;
    }
    if args.no_subtitles {
        settings.subtitles.enabled = false;
    }

    Output::info(&format!(
        "Generating podcast from {} document(s) ({} style, {} audience)",
        args.inputs.len(),
        settings.dialogue.style,
        settings.dialogue.audience
    ));

    let pipeline = Pipeline::new(settings)?;

    let mut request = GenerateRequest::new(args.inputs, args.output);
    request.use_plan = args.plan;
    request.save_dialogue = args.save_dialogue;
    request.save_plan = args.save_plan;
    request.unlock_token_limit = args.unlock_token_limit;
    request.custom_instructions = args.instructions;
    request.timing_output = args.timing_output;

    let result = pipeline.generate(request).await?;

    println!();
    Output::success(&format!("Podcast saved to {}", result.output_path.display()));
    Output::kv("Duration", &format_duration_ms(result.duration_ms));
    Output::kv(
        "Segments",
        &format!(
            "{} (host 1: {}, host 2: {})",
            result.host1_segments + result.host2_segments,
            result.host1_segments,
            result.host2_segments
        ),
    );
    Output::kv("Dialogue tokens", &result.dialogue_usage.to_string());
    if let Some(plan_usage) = &result.plan_usage {
        Output::kv("Plan tokens", &plan_usage.to_string());
    }
    match &result.subtitle_path {
        Some(path) => Output::kv("Subtitles", &path.display().to_string()),
        None if pipeline.settings().subtitles.enabled => {
            Output::warning("Subtitle generation failed; podcast saved without subtitles.")
        }
        None => {}
    }

    Ok(())
}

fn validate_voice(voice: &str) -> Result<()> {
    if AVAILABLE_VOICES.contains(&voice) {
        Ok(())
    } else {
        Output::error(&format!(
            "Unknown voice '{}'. Run 'prat voices' to list available voices.",
            voice
        ));
        Err(anyhow::anyhow!("unknown voice: {}", voice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_voice_known() {
        assert!(validate_voice("nova").is_ok());
        assert!(validate_voice("echo").is_ok());
    }

    #[test]
    fn test_validate_voice_unknown() {
        assert!(validate_voice("hal9000").is_err());
    }
}
