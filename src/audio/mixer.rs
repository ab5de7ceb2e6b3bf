//! Timeline mixing: sequence synthesized clips into one podcast buffer.

use super::clip::{frames_to_ms, AudioClip};
use super::spatial::apply_spatial;
use super::tts::{SpeechSynthesizer, SYNTHESIS_SAMPLE_RATE};
use crate::dialogue::{DialogueSegment, Speaker};
use crate::error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

/// Run-level mixing options.
#[derive(Debug, Clone)]
pub struct MixOptions {
    /// Voice for HOST1, placed left.
    pub host1_voice: String,
    /// Voice for HOST2, placed right.
    pub host2_voice: String,
    /// Silence between segments.
    pub pause_ms: u64,
    /// Spatial separation in [0.0, 1.0]; hosts sit at +/- this position.
    pub spatial_separation: f32,
}

impl Default for MixOptions {
    fn default() -> Self {
        Self {
            host1_voice: "nova".to_string(),
            host2_voice: "echo".to_string(),
            pause_ms: 300,
            spatial_separation: 0.4,
        }
    }
}

impl MixOptions {
    fn voice_for(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::Host1 => &self.host1_voice,
            Speaker::Host2 => &self.host2_voice,
        }
    }

    fn position_for(&self, speaker: Speaker) -> f32 {
        match speaker {
            Speaker::Host1 => -self.spatial_separation,
            Speaker::Host2 => self.spatial_separation,
        }
    }
}

/// When each utterance starts and ends on the mixed timeline.
///
/// Diagnostic metadata only; subtitles come from an independent transcription
/// of the exported audio, not from these records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimingRecord {
    pub speaker: Speaker,
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

/// Synthesize and mix all segments into a single timeline.
///
/// Segments are processed strictly sequentially: each clip is synthesized,
/// upmixed to stereo if the engine returned mono, spatialized to its host's
/// fixed position, and appended, with `pause_ms` of silence between segments
/// (not after the last). Pauses get no timing record; they are gaps, not
/// speech. The timeline itself is the running clock, so timing stays
/// frame-accurate.
///
/// A synthesis failure for any segment aborts the whole run.
pub async fn mix_segments(
    synthesizer: &dyn SpeechSynthesizer,
    segments: &[DialogueSegment],
    options: &MixOptions,
) -> Result<(AudioClip, Vec<TimingRecord>)> {
    let mut timeline: Option<AudioClip> = None;
    let mut timing = Vec::with_capacity(segments.len());

    info!(
        "Mixing {} segments (separation: {}, pause: {} ms)",
        segments.len(),
        options.spatial_separation,
        options.pause_ms
    );

    let pb = ProgressBar::new(segments.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {spinner:.green} Synthesizing [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );

    for (i, segment) in segments.iter().enumerate() {
        pb.set_message(preview(&segment.text, 40));

        let voice = options.voice_for(segment.speaker);
        let clip = synthesizer.synthesize(&segment.text, voice).await?;

        let clip = clip.to_stereo();
        let clip = apply_spatial(clip, options.position_for(segment.speaker));

        let timeline = timeline
            .get_or_insert_with(|| AudioClip::empty(clip.channels(), clip.sample_rate()));

        let start_ms = frames_to_ms(timeline.frames(), timeline.sample_rate());
        timeline.append(&clip)?;
        let end_ms = frames_to_ms(timeline.frames(), timeline.sample_rate());

        debug!(
            "{} [{} ms - {} ms]: {}",
            segment.speaker,
            start_ms,
            end_ms,
            preview(&segment.text, 60)
        );

        timing.push(TimingRecord {
            speaker: segment.speaker,
            text: segment.text.clone(),
            start_ms,
            end_ms,
        });

        if i + 1 < segments.len() {
            timeline.append_silence(options.pause_ms);
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let timeline = timeline.unwrap_or_else(|| AudioClip::empty(2, SYNTHESIS_SAMPLE_RATE));
    info!("Mixed timeline: {} ms", timeline.duration_ms());

    Ok((timeline, timing))
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SYNTHESIS_SAMPLE_RATE;
    use crate::error::PratError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic fake returning silent mono clips with per-text durations.
    struct StubSynthesizer {
        durations_ms: HashMap<String, u64>,
        fail_on_call: Option<usize>,
        calls: AtomicUsize,
    }

    impl StubSynthesizer {
        fn new(durations: &[(&str, u64)]) -> Self {
            Self {
                durations_ms: durations
                    .iter()
                    .map(|(t, d)| (t.to_string(), *d))
                    .collect(),
                fail_on_call: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing_on(mut self, call: usize) -> Self {
            self.fail_on_call = Some(call);
            self
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for StubSynthesizer {
        async fn synthesize(&self, text: &str, _voice: &str) -> Result<AudioClip> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if Some(call) == self.fail_on_call {
                return Err(PratError::Synthesis("stub failure".to_string()));
            }
            let duration = self.durations_ms.get(text).copied().unwrap_or(500);
            Ok(AudioClip::silent(duration, 1, SYNTHESIS_SAMPLE_RATE))
        }
    }

    fn segments(pairs: &[(Speaker, &str)]) -> Vec<DialogueSegment> {
        pairs
            .iter()
            .map(|(s, t)| DialogueSegment::new(*s, *t))
            .collect()
    }

    #[tokio::test]
    async fn test_two_segment_timing() {
        let synth = StubSynthesizer::new(&[("Hi", 1000), ("Hello", 1200)]);
        let segs = segments(&[(Speaker::Host1, "Hi"), (Speaker::Host2, "Hello")]);
        let options = MixOptions::default();

        let (timeline, timing) = mix_segments(&synth, &segs, &options).await.unwrap();

        assert_eq!(timing.len(), 2);
        assert_eq!(timing[0].start_ms, 0);
        assert_eq!(timing[0].end_ms, 1000);
        assert_eq!(timing[1].start_ms, 1300);
        assert_eq!(timing[1].end_ms, 2500);
        // No pause after the last segment
        assert_eq!(timeline.duration_ms(), 2500);
    }

    #[tokio::test]
    async fn test_output_is_always_stereo() {
        let synth = StubSynthesizer::new(&[("Hi", 400)]);
        let segs = segments(&[(Speaker::Host1, "Hi")]);

        let (timeline, _) = mix_segments(&synth, &segs, &MixOptions::default())
            .await
            .unwrap();
        assert_eq!(timeline.channels(), 2);
    }

    #[tokio::test]
    async fn test_pause_between_not_after() {
        let synth = StubSynthesizer::new(&[("a", 1000), ("b", 1000), ("c", 1000)]);
        let segs = segments(&[
            (Speaker::Host1, "a"),
            (Speaker::Host2, "b"),
            (Speaker::Host1, "c"),
        ]);
        let options = MixOptions {
            pause_ms: 200,
            spatial_separation: 0.0,
            ..MixOptions::default()
        };

        let (timeline, timing) = mix_segments(&synth, &segs, &options).await.unwrap();

        // end of segment i = sum(durations) + pause * i
        assert_eq!(timing[0].end_ms, 1000);
        assert_eq!(timing[1].end_ms, 2200);
        assert_eq!(timing[2].end_ms, 3400);
        assert_eq!(timeline.duration_ms(), 3400);
        // Final record's end matches total duration (no trailing pause)
        assert_eq!(timing[2].end_ms, timeline.duration_ms());
    }

    #[tokio::test]
    async fn test_synthesis_failure_aborts_run() {
        let synth = StubSynthesizer::new(&[("a", 1000), ("b", 1000), ("c", 1000)]).failing_on(1);
        let segs = segments(&[
            (Speaker::Host1, "a"),
            (Speaker::Host2, "b"),
            (Speaker::Host1, "c"),
        ]);

        let result = mix_segments(&synth, &segs, &MixOptions::default()).await;
        assert!(matches!(result, Err(PratError::Synthesis(_))));
        // The third segment is never synthesized
        assert_eq!(synth.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_segments_yield_empty_timeline() {
        let synth = StubSynthesizer::new(&[]);
        let (timeline, timing) = mix_segments(&synth, &[], &MixOptions::default())
            .await
            .unwrap();
        assert_eq!(timeline.frames(), 0);
        assert!(timing.is_empty());
    }

    #[tokio::test]
    async fn test_timing_tracks_itd_padding() {
        // With separation 0.4, ITD adds round(0.24ms * 24) = 6 frames per clip;
        // the frame-accurate clock must reflect the padded clip lengths.
        let synth = StubSynthesizer::new(&[("Hi", 1000), ("Hello", 1200)]);
        let segs = segments(&[(Speaker::Host1, "Hi"), (Speaker::Host2, "Hello")]);
        let options = MixOptions {
            spatial_separation: 0.4,
            ..MixOptions::default()
        };

        let (timeline, timing) = mix_segments(&synth, &segs, &options).await.unwrap();

        // 24006 frames floor to 1000 ms; totals still land on the expected ms
        assert_eq!(timing[0].end_ms, 1000);
        assert_eq!(timing[1].start_ms, 1300);
        assert_eq!(timing[1].end_ms, 2500);
        assert_eq!(timeline.duration_ms(), 2500);
    }
}
