//! In-memory PCM audio clips.

use crate::error::{PratError, Result};

/// An in-memory PCM buffer: interleaved 16-bit samples with a channel count
/// and sample rate.
///
/// Durations are derived from frame counts, so timing bookkeeping stays
/// sample-accurate even when a clip's length is not a whole number of
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    samples: Vec<i16>,
    channels: u16,
    sample_rate: u32,
}

impl AudioClip {
    /// Create a clip from interleaved samples.
    ///
    /// The sample count must be a whole number of frames.
    pub fn new(samples: Vec<i16>, channels: u16, sample_rate: u32) -> Result<Self> {
        if channels == 0 || sample_rate == 0 {
            return Err(PratError::Audio(
                "Clip must have at least one channel and a nonzero sample rate".to_string(),
            ));
        }
        if samples.len() % channels as usize != 0 {
            return Err(PratError::Audio(format!(
                "Sample count {} is not a whole number of {}-channel frames",
                samples.len(),
                channels
            )));
        }
        Ok(Self {
            samples,
            channels,
            sample_rate,
        })
    }

    /// An empty clip with the given layout.
    pub fn empty(channels: u16, sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            channels,
            sample_rate,
        }
    }

    /// A silent clip of the given duration.
    pub fn silent(duration_ms: u64, channels: u16, sample_rate: u32) -> Self {
        let frames = ms_to_frames(duration_ms, sample_rate);
        Self::silent_frames(frames, channels, sample_rate)
    }

    /// A silent clip of the given frame count.
    pub fn silent_frames(frames: usize, channels: u16, sample_rate: u32) -> Self {
        Self {
            samples: vec![0; frames * channels as usize],
            channels,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_stereo(&self) -> bool {
        self.channels == 2
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Duration in whole milliseconds (floor).
    pub fn duration_ms(&self) -> u64 {
        frames_to_ms(self.frames(), self.sample_rate)
    }

    /// Upmix mono to stereo by duplicating samples into both channels.
    ///
    /// Stereo clips pass through unchanged. Mono clips must be upmixed before
    /// panning, otherwise playback collapses into a single ear.
    pub fn to_stereo(self) -> Self {
        if self.channels != 1 {
            return self;
        }
        let mut samples = Vec::with_capacity(self.samples.len() * 2);
        for &s in &self.samples {
            samples.push(s);
            samples.push(s);
        }
        Self {
            samples,
            channels: 2,
            sample_rate: self.sample_rate,
        }
    }

    /// Split a stereo clip into independent left/right channel buffers.
    ///
    /// Returns None for non-stereo clips.
    pub fn split_stereo(&self) -> Option<(Vec<i16>, Vec<i16>)> {
        if self.channels != 2 {
            return None;
        }
        let frames = self.frames();
        let mut left = Vec::with_capacity(frames);
        let mut right = Vec::with_capacity(frames);
        for pair in self.samples.chunks_exact(2) {
            left.push(pair[0]);
            right.push(pair[1]);
        }
        Some((left, right))
    }

    /// Recombine left/right channel buffers into one stereo clip.
    ///
    /// If the channels have drifted to different lengths, the shorter side is
    /// padded with silence; both channels always come out equal.
    pub fn from_stereo_channels(mut left: Vec<i16>, mut right: Vec<i16>, sample_rate: u32) -> Self {
        let frames = left.len().max(right.len());
        left.resize(frames, 0);
        right.resize(frames, 0);

        let mut samples = Vec::with_capacity(frames * 2);
        for (l, r) in left.into_iter().zip(right) {
            samples.push(l);
            samples.push(r);
        }
        Self {
            samples,
            channels: 2,
            sample_rate,
        }
    }

    /// Build a stereo clip from already-interleaved samples whose length is
    /// known to be even.
    pub(crate) fn from_interleaved_stereo(mut samples: Vec<i16>, sample_rate: u32) -> Self {
        samples.truncate(samples.len() & !1);
        Self {
            samples,
            channels: 2,
            sample_rate,
        }
    }

    /// Append another clip to this one. The layouts must match.
    pub fn append(&mut self, other: &AudioClip) -> Result<()> {
        if other.channels != self.channels || other.sample_rate != self.sample_rate {
            return Err(PratError::Audio(format!(
                "Cannot append {}ch/{}Hz clip to {}ch/{}Hz timeline",
                other.channels, other.sample_rate, self.channels, self.sample_rate
            )));
        }
        self.samples.extend_from_slice(&other.samples);
        Ok(())
    }

    /// Append silence of the given duration.
    pub fn append_silence(&mut self, duration_ms: u64) {
        let frames = ms_to_frames(duration_ms, self.sample_rate);
        self.samples
            .extend(std::iter::repeat(0).take(frames * self.channels as usize));
    }
}

/// Convert a frame count to whole milliseconds (floor).
pub fn frames_to_ms(frames: usize, sample_rate: u32) -> u64 {
    (frames as u64 * 1000) / sample_rate as u64
}

/// Convert milliseconds to a frame count.
pub fn ms_to_frames(ms: u64, sample_rate: u32) -> usize {
    ((ms * sample_rate as u64) / 1000) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_ragged_frames() {
        assert!(AudioClip::new(vec![1, 2, 3], 2, 24_000).is_err());
        assert!(AudioClip::new(vec![1, 2, 3, 4], 2, 24_000).is_ok());
    }

    #[test]
    fn test_duration_ms() {
        let clip = AudioClip::silent(1000, 2, 24_000);
        assert_eq!(clip.frames(), 24_000);
        assert_eq!(clip.duration_ms(), 1000);

        // Fractional-millisecond lengths floor
        let clip = AudioClip::silent_frames(24_006, 2, 24_000);
        assert_eq!(clip.duration_ms(), 1000);
    }

    #[test]
    fn test_mono_to_stereo_upmix() {
        let clip = AudioClip::new(vec![10, -20, 30], 1, 24_000).unwrap();
        let stereo = clip.to_stereo();
        assert_eq!(stereo.channels(), 2);
        assert_eq!(stereo.frames(), 3);
        assert_eq!(stereo.samples(), &[10, 10, -20, -20, 30, 30]);
    }

    #[test]
    fn test_stereo_passes_through_upmix() {
        let clip = AudioClip::new(vec![1, 2, 3, 4], 2, 24_000).unwrap();
        let upmixed = clip.clone().to_stereo();
        assert_eq!(upmixed, clip);
    }

    #[test]
    fn test_split_and_recombine() {
        let clip = AudioClip::new(vec![1, -1, 2, -2], 2, 24_000).unwrap();
        let (left, right) = clip.split_stereo().unwrap();
        assert_eq!(left, vec![1, 2]);
        assert_eq!(right, vec![-1, -2]);

        let rebuilt = AudioClip::from_stereo_channels(left, right, 24_000);
        assert_eq!(rebuilt, clip);
    }

    #[test]
    fn test_split_rejects_mono() {
        let clip = AudioClip::new(vec![1, 2], 1, 24_000).unwrap();
        assert!(clip.split_stereo().is_none());
    }

    #[test]
    fn test_recombine_pads_drifted_channels() {
        let clip = AudioClip::from_stereo_channels(vec![1, 2, 3], vec![9], 24_000);
        assert_eq!(clip.frames(), 3);
        assert_eq!(clip.samples(), &[1, 9, 2, 0, 3, 0]);
    }

    #[test]
    fn test_append_matching_layout() {
        let mut timeline = AudioClip::empty(2, 24_000);
        let clip = AudioClip::silent(100, 2, 24_000);
        timeline.append(&clip).unwrap();
        timeline.append_silence(50);
        assert_eq!(timeline.duration_ms(), 150);
    }

    #[test]
    fn test_append_rejects_layout_mismatch() {
        let mut timeline = AudioClip::empty(2, 24_000);
        let mono = AudioClip::silent(100, 1, 24_000);
        let wrong_rate = AudioClip::silent(100, 2, 44_100);
        assert!(timeline.append(&mono).is_err());
        assert!(timeline.append(&wrong_rate).is_err());
    }
}
