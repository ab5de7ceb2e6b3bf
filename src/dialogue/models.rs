//! Data models for podcast dialogue.

use crate::error::{PratError, Result};
use serde::{Deserialize, Serialize};

/// One of the two fixed podcast host identities.
///
/// A closed enum rather than a free-form string, so a typo in upstream data
/// cannot silently create a third "ghost" speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    #[serde(rename = "HOST1")]
    Host1,
    #[serde(rename = "HOST2")]
    Host2,
}

impl Speaker {
    /// Transcript line prefix for this speaker.
    pub fn tag(&self) -> &'static str {
        match self {
            Speaker::Host1 => "HOST1:",
            Speaker::Host2 => "HOST2:",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::Host1 => write!(f, "HOST1"),
            Speaker::Host2 => write!(f, "HOST2"),
        }
    }
}

impl std::str::FromStr for Speaker {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "HOST1" => Ok(Speaker::Host1),
            "HOST2" => Ok(Speaker::Host2),
            _ => Err(format!("Unknown speaker: {}", s)),
        }
    }
}

/// A single contiguous utterance by one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueSegment {
    pub speaker: Speaker,
    pub text: String,
}

impl DialogueSegment {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

/// Complete podcast dialogue as returned by the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodcastDialogue {
    pub segments: Vec<DialogueSegment>,
}

impl PodcastDialogue {
    /// Check that the dialogue is usable: non-empty trimmed text everywhere
    /// and both hosts speaking at least once.
    pub fn validate(&self) -> Result<()> {
        if self.segments.is_empty() {
            return Err(PratError::Dialogue("Dialogue has no segments".to_string()));
        }

        if self.segments.iter().any(|s| s.text.trim().is_empty()) {
            return Err(PratError::Dialogue(
                "Dialogue contains an empty segment".to_string(),
            ));
        }

        let (host1, host2) = self.segment_counts();
        if host1 == 0 || host2 == 0 {
            return Err(PratError::Dialogue(
                "Both HOST1 and HOST2 must speak".to_string(),
            ));
        }

        Ok(())
    }

    /// Trim all segment text in place.
    pub fn normalize(&mut self) {
        for segment in &mut self.segments {
            segment.text = segment.text.trim().to_string();
        }
    }

    /// Number of segments per speaker as (host1, host2).
    pub fn segment_counts(&self) -> (usize, usize) {
        let host1 = self
            .segments
            .iter()
            .filter(|s| s.speaker == Speaker::Host1)
            .count();
        (host1, self.segments.len() - host1)
    }

    /// Render as the line-oriented transcript format consumed by the audio
    /// pipeline (`HOST1: text` per line).
    pub fn to_transcript(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("{} {}", s.speaker.tag(), s.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Token usage reported by a chat completion.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl std::fmt::Display for TokenUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} in, {} out, {} total",
            self.prompt_tokens, self.completion_tokens, self.total_tokens
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialogue(segments: Vec<(Speaker, &str)>) -> PodcastDialogue {
        PodcastDialogue {
            segments: segments
                .into_iter()
                .map(|(s, t)| DialogueSegment::new(s, t))
                .collect(),
        }
    }

    #[test]
    fn test_validate_both_speakers() {
        let d = dialogue(vec![(Speaker::Host1, "Hi"), (Speaker::Host2, "Hello")]);
        assert!(d.validate().is_ok());

        let solo = dialogue(vec![(Speaker::Host1, "Hi"), (Speaker::Host1, "Still me")]);
        assert!(solo.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_text() {
        let d = dialogue(vec![(Speaker::Host1, "  "), (Speaker::Host2, "Hello")]);
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_to_transcript() {
        let d = dialogue(vec![
            (Speaker::Host1, "Welcome to the show."),
            (Speaker::Host2, "Great to be here."),
        ]);
        assert_eq!(
            d.to_transcript(),
            "HOST1: Welcome to the show.\nHOST2: Great to be here."
        );
    }

    #[test]
    fn test_speaker_wire_format() {
        let json = r#"{"speaker": "HOST2", "text": "hi"}"#;
        let segment: DialogueSegment = serde_json::from_str(json).unwrap();
        assert_eq!(segment.speaker, Speaker::Host2);
        assert!(serde_json::from_str::<DialogueSegment>(r#"{"speaker": "HOST3", "text": "x"}"#).is_err());
    }

    #[test]
    fn test_segment_counts() {
        let d = dialogue(vec![
            (Speaker::Host1, "a"),
            (Speaker::Host2, "b"),
            (Speaker::Host1, "c"),
        ]);
        assert_eq!(d.segment_counts(), (2, 1));
    }
}
