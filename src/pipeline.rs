//! End-to-end generation pipeline for Prat.
//!
//! Coordinates the entire process: document ingestion, optional episode
//! planning, dialogue generation, synthesis and mixing, export, and
//! best-effort subtitle generation.
//!
//! Everything up to and including export aborts the run on error; subtitle
//! generation afterwards is best-effort and only warns.

use crate::audio::{export_podcast, mix_segments, MixOptions, PodcastTags, TimingRecord};
use crate::audio::{OpenAiSynthesizer, SpeechSynthesizer};
use crate::config::{Prompts, Settings};
use crate::dialogue::{
    parse_dialogue, DialogueGenerator, DialogueOptions, PlanGenerator, TokenUsage,
};
use crate::document::{extract_text, DocumentCleaner};
use crate::error::{PratError, Result};
use crate::subtitles::{SubtitleGenerator, WhisperSubtitler};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A single podcast generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Input documents (markdown, text, PDF).
    pub inputs: Vec<PathBuf>,
    /// Output MP3 path; the subtitle file lands next to it.
    pub output: PathBuf,
    /// Generate a structured episode plan before the dialogue.
    pub use_plan: bool,
    /// Save the generated dialogue transcript next to the output.
    pub save_dialogue: bool,
    /// Save the generated episode plan next to the output.
    pub save_plan: bool,
    /// Remove the dialogue output token cap.
    pub unlock_token_limit: bool,
    /// Extra instructions appended to the dialogue prompt.
    pub custom_instructions: Option<String>,
    /// Where to dump the diagnostic timing records as JSON.
    pub timing_output: Option<PathBuf>,
}

impl GenerateRequest {
    pub fn new(inputs: Vec<PathBuf>, output: PathBuf) -> Self {
        Self {
            inputs,
            output,
            use_plan: false,
            save_dialogue: false,
            save_plan: false,
            unlock_token_limit: false,
            custom_instructions: None,
            timing_output: None,
        }
    }
}

/// Summary of a completed generation run.
#[derive(Debug)]
pub struct GenerateResult {
    pub output_path: PathBuf,
    pub subtitle_path: Option<PathBuf>,
    pub duration_ms: u64,
    pub host1_segments: usize,
    pub host2_segments: usize,
    pub dialogue_usage: TokenUsage,
    pub plan_usage: Option<TokenUsage>,
}

/// Outcome of the audio production stage (transcript in, files out).
#[derive(Debug)]
pub struct ProduceResult {
    pub output_path: PathBuf,
    pub subtitle_path: Option<PathBuf>,
    pub duration_ms: u64,
    pub timing: Vec<TimingRecord>,
}

/// The main generation pipeline.
pub struct Pipeline {
    settings: Settings,
    prompts: Prompts,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    subtitler: Arc<dyn SubtitleGenerator>,
}

impl Pipeline {
    /// Create a pipeline with the standard OpenAI-backed components.
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;

        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let timeout = settings.general.request_timeout_secs;
        let synthesizer: Arc<dyn SpeechSynthesizer> = Arc::new(
            OpenAiSynthesizer::with_model(&settings.audio.tts_model).with_timeout(timeout),
        );
        let subtitler: Arc<dyn SubtitleGenerator> = Arc::new(
            WhisperSubtitler::with_model(&settings.subtitles.model).with_timeout(timeout),
        );

        Ok(Self {
            settings,
            prompts,
            synthesizer,
            subtitler,
        })
    }

    /// Create a pipeline with custom components (for testing or alternative
    /// backends).
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        subtitler: Arc<dyn SubtitleGenerator>,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            prompts,
            synthesizer,
            subtitler,
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the full pipeline: documents in, podcast (and subtitles) out.
    #[instrument(skip(self, request), fields(output = %request.output.display()))]
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResult> {
        // Ingest
        eprintln!("  Reading {} input file(s)...", request.inputs.len());
        let cleaner = if self.settings.dialogue.pdf_cleanup {
            Some(
                DocumentCleaner::with_model(&self.settings.dialogue.cleanup_model)
                    .with_prompts(self.prompts.clone())
                    .with_timeout(self.settings.general.request_timeout_secs),
            )
        } else {
            None
        };
        let text = extract_text(&request.inputs, cleaner.as_ref()).await?;
        info!("Extracted {} chars of source text", text.len());

        // Plan (optional)
        let mut plan_usage = None;
        let plan_markdown = if request.use_plan {
            eprintln!("  Planning episode...");
            let planner = PlanGenerator::with_model(&self.settings.dialogue.model)
                .with_prompts(self.prompts.clone())
                .with_timeout(self.settings.general.request_timeout_secs);
            let (plan, usage) = planner.generate(&text, request.unlock_token_limit).await?;
            eprintln!("  Plan ready ({} topics)", plan.topics.len());
            plan_usage = Some(usage);

            let markdown = plan.to_markdown();
            if request.save_plan {
                let plan_path = plan_sidecar(&request.output);
                std::fs::write(&plan_path, &markdown)?;
                eprintln!("  Saved plan to {}", plan_path.display());
            }
            Some(markdown)
        } else {
            None
        };

        // Dialogue
        eprintln!("  Generating dialogue...");
        let generator = DialogueGenerator::with_model(&self.settings.dialogue.model)
            .with_prompts(self.prompts.clone())
            .with_scale_factor(self.settings.dialogue.scale_factor)
            .with_timeout(self.settings.general.request_timeout_secs);
        let options = DialogueOptions {
            style: self.settings.dialogue.style,
            audience: self.settings.dialogue.audience,
            custom_instructions: request.custom_instructions.clone(),
            plan: plan_markdown,
            unlock_token_limit: request.unlock_token_limit,
        };
        let (dialogue, dialogue_usage) = generator.generate(&text, &options).await?;
        let (host1_segments, host2_segments) = dialogue.segment_counts();
        eprintln!(
            "  Dialogue ready ({} + {} segments)",
            host1_segments, host2_segments
        );

        // Audio production
        let transcript = dialogue.to_transcript();
        if request.save_dialogue {
            let dialogue_path = dialogue_sidecar(&request.output);
            std::fs::write(&dialogue_path, &transcript)?;
            eprintln!("  Saved dialogue to {}", dialogue_path.display());
        }
        let produced = self
            .produce(&transcript, &request.output, request.timing_output.as_deref())
            .await?;

        Ok(GenerateResult {
            output_path: produced.output_path,
            subtitle_path: produced.subtitle_path,
            duration_ms: produced.duration_ms,
            host1_segments,
            host2_segments,
            dialogue_usage,
            plan_usage,
        })
    }

    /// Produce the podcast audio from an already-written transcript: parse,
    /// synthesize, mix, export, then best-effort subtitles.
    pub async fn produce(
        &self,
        transcript: &str,
        output: &Path,
        timing_output: Option<&Path>,
    ) -> Result<ProduceResult> {
        let segments = parse_dialogue(transcript);
        info!("Parsed {} dialogue segments", segments.len());
        if segments.is_empty() {
            return Err(PratError::Dialogue(
                "Transcript contains no HOST1:/HOST2: tagged lines".to_string(),
            ));
        }

        let mix_options = MixOptions {
            host1_voice: self.settings.audio.host1_voice.clone(),
            host2_voice: self.settings.audio.host2_voice.clone(),
            pause_ms: self.settings.audio.pause_ms,
            spatial_separation: self.settings.audio.spatial_separation,
        };

        let (timeline, timing) =
            mix_segments(self.synthesizer.as_ref(), &segments, &mix_options).await?;

        let tags = self.tags_for(output);
        eprintln!("  Exporting podcast...");
        let output_path = export_podcast(
            &timeline,
            output,
            &self.settings.audio.bitrate,
            &tags,
            &self.settings.temp_dir(),
        )
        .await?;

        if let Some(timing_path) = timing_output {
            let json = serde_json::to_string_pretty(&timing)?;
            std::fs::write(timing_path, json)?;
            info!("Wrote timing records to {}", timing_path.display());
        }

        let subtitle_path = if self.settings.subtitles.enabled {
            self.write_subtitles(&output_path).await
        } else {
            None
        };

        Ok(ProduceResult {
            duration_ms: timeline.duration_ms(),
            output_path,
            subtitle_path,
            timing,
        })
    }

    /// Best-effort subtitle generation; failure is logged, never propagated.
    async fn write_subtitles(&self, audio_path: &Path) -> Option<PathBuf> {
        eprintln!("  Generating subtitles...");
        let srt_path = audio_path.with_extension("srt");

        match self.subtitler.transcribe_srt(audio_path).await {
            Ok(srt) => match std::fs::write(&srt_path, srt) {
                Ok(()) => {
                    info!("Wrote subtitles to {}", srt_path.display());
                    Some(srt_path)
                }
                Err(e) => {
                    warn!("Failed to write subtitle file: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Subtitle generation failed (continuing without): {}", e);
                None
            }
        }
    }

    fn tags_for(&self, output: &Path) -> PodcastTags {
        let title = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Generated Podcast")
            .to_string();

        let style = self.settings.dialogue.style.to_string();
        let mut genre: String = style;
        if let Some(first) = genre.get_mut(0..1) {
            first.make_ascii_uppercase();
        }

        PodcastTags {
            title,
            artist: "Prat".to_string(),
            album: "Generated Podcast".to_string(),
            genre,
        }
    }
}

/// Sidecar path for a saved dialogue transcript (`episode.mp3` -> `episode.txt`).
fn dialogue_sidecar(output: &Path) -> PathBuf {
    output.with_extension("txt")
}

/// Sidecar path for a saved episode plan (`episode.mp3` -> `episode.plan.txt`).
fn plan_sidecar(output: &Path) -> PathBuf {
    output.with_extension("plan.txt")
}
