//! Configuration settings for Prat.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub dialogue: DialogueSettings,
    pub audio: AudioSettings,
    pub subtitles: SubtitleSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for temporary files.
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Timeout for OpenAI API requests, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: "/tmp/prat".to_string(),
            log_level: "warn".to_string(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Default API request timeout (5 minutes).
///
/// Dialogue generation for long documents and Whisper transcription of a full
/// episode can both take a while; synthesis calls finish well within this.
pub fn default_request_timeout_secs() -> u64 {
    300
}

/// Podcast conversation style.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PodcastStyle {
    /// Friendly teaching conversation (default).
    #[default]
    Educational,
    /// One host interviews the other as a subject-matter expert.
    Interview,
    /// Relaxed back-and-forth between friends.
    Casual,
    /// The hosts take opposing positions and argue them out.
    Debate,
}

impl std::str::FromStr for PodcastStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "educational" => Ok(PodcastStyle::Educational),
            "interview" => Ok(PodcastStyle::Interview),
            "casual" => Ok(PodcastStyle::Casual),
            "debate" => Ok(PodcastStyle::Debate),
            _ => Err(format!(
                "Unknown style: {}. Use educational, interview, casual, or debate.",
                s
            )),
        }
    }
}

impl std::fmt::Display for PodcastStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PodcastStyle::Educational => write!(f, "educational"),
            PodcastStyle::Interview => write!(f, "interview"),
            PodcastStyle::Casual => write!(f, "casual"),
            PodcastStyle::Debate => write!(f, "debate"),
        }
    }
}

/// Target audience for the generated dialogue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// General listeners with no assumed background (default).
    #[default]
    General,
    /// Practitioners comfortable with technical depth.
    Technical,
    /// Academic listeners expecting rigor and citations of ideas.
    Academic,
    /// Complete newcomers; everything explained from scratch.
    Beginner,
}

impl std::str::FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "general" => Ok(Audience::General),
            "technical" => Ok(Audience::Technical),
            "academic" => Ok(Audience::Academic),
            "beginner" => Ok(Audience::Beginner),
            _ => Err(format!(
                "Unknown audience: {}. Use general, technical, academic, or beginner.",
                s
            )),
        }
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Audience::General => write!(f, "general"),
            Audience::Technical => write!(f, "technical"),
            Audience::Academic => write!(f, "academic"),
            Audience::Beginner => write!(f, "beginner"),
        }
    }
}

/// Dialogue and plan generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueSettings {
    /// LLM model for dialogue generation.
    pub model: String,
    /// Conversation style (educational, interview, casual, debate).
    pub style: PodcastStyle,
    /// Target audience (general, technical, academic, beginner).
    pub audience: Audience,
    /// Output tokens budgeted per input character.
    pub scale_factor: f64,
    /// LLM model for PDF text cleanup.
    pub cleanup_model: String,
    /// Clean extracted PDF text with an LLM pass before dialogue generation.
    pub pdf_cleanup: bool,
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            style: PodcastStyle::Educational,
            audience: Audience::General,
            scale_factor: 2.0,
            cleanup_model: "gpt-4o-mini".to_string(),
            pdf_cleanup: true,
        }
    }
}

/// Speech synthesis and mixing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// TTS model (tts-1, tts-1-hd).
    pub tts_model: String,
    /// Voice for HOST1 (placed left).
    pub host1_voice: String,
    /// Voice for HOST2 (placed right).
    pub host2_voice: String,
    /// Milliseconds of silence between segments.
    pub pause_ms: u64,
    /// Spatial separation 0.0-1.0; controls both panning and ITD.
    pub spatial_separation: f32,
    /// MP3 bitrate passed to the encoder.
    pub bitrate: String,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            tts_model: "tts-1-hd".to_string(),
            host1_voice: "nova".to_string(),
            host2_voice: "echo".to_string(),
            pause_ms: 300,
            spatial_separation: 0.4,
            bitrate: "192k".to_string(),
        }
    }
}

/// Subtitle generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleSettings {
    /// Generate an SRT subtitle file alongside the podcast.
    pub enabled: bool,
    /// Transcription model for subtitles.
    pub model: String,
}

impl Default for SubtitleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "whisper-1".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::PratError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prat")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }

    /// Validate run-level audio parameters.
    pub fn validate(&self) -> crate::error::Result<()> {
        let sep = self.audio.spatial_separation;
        if !(0.0..=1.0).contains(&sep) {
            return Err(crate::error::PratError::Config(format!(
                "spatial_separation must be in [0.0, 1.0], got {}",
                sep
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.audio.host1_voice, "nova");
        assert_eq!(settings.audio.host2_voice, "echo");
        assert_eq!(settings.audio.pause_ms, 300);
        assert!((settings.audio.spatial_separation - 0.4).abs() < f32::EPSILON);
        assert!(settings.subtitles.enabled);
    }

    #[test]
    fn test_style_round_trip() {
        for s in ["educational", "interview", "casual", "debate"] {
            let style: PodcastStyle = s.parse().unwrap();
            assert_eq!(style.to_string(), s);
        }
        assert!("theatrical".parse::<PodcastStyle>().is_err());
    }

    #[test]
    fn test_validate_separation() {
        let mut settings = Settings::default();
        settings.audio.spatial_separation = 1.2;
        assert!(settings.validate().is_err());
        settings.audio.spatial_separation = 0.0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
            [audio]
            host1_voice = "shimmer"
        "#;
        let settings: Settings = toml::from_str(toml).unwrap();
        assert_eq!(settings.audio.host1_voice, "shimmer");
        // Untouched sections keep their defaults
        assert_eq!(settings.audio.host2_voice, "echo");
        assert_eq!(settings.dialogue.model, "gpt-4o");
    }

    #[test]
    fn test_request_timeout_default_and_override() {
        assert_eq!(Settings::default().general.request_timeout_secs, 300);

        let toml = r#"
            [general]
            request_timeout_secs = 600
        "#;
        let settings: Settings = toml::from_str(toml).unwrap();
        assert_eq!(settings.general.request_timeout_secs, 600);
    }
}
