//! Spatialization: stereo panning plus an interaural time difference model.
//!
//! Amplitude panning alone places a source weakly; adding the sub-millisecond
//! delay with which sound reaches the listener's far ear makes the left/right
//! illusion considerably stronger. Both effects are driven by one position
//! scalar in [-1.0, 1.0] (negative = left, positive = right).

use super::clip::AudioClip;

/// Maximum ITD applied at full lateral position. Human ITD peaks around
/// 0.7 ms at 90 degrees; we stay slightly under that.
pub const MAX_ITD_MS: f32 = 0.6;

/// Delays below this are inaudible and skipped.
const MIN_ITD_MS: f32 = 0.01;

/// Apply panning and ITD delay for the given position.
///
/// Non-stereo input is returned unchanged; upmixing is the caller's job and
/// a mono clip here is a no-op rather than an error.
pub fn apply_spatial(clip: AudioClip, position: f32) -> AudioClip {
    if !clip.is_stereo() {
        return clip;
    }

    let position = position.clamp(-1.0, 1.0);
    let panned = pan(clip, position);

    let delay_ms = position.abs() * MAX_ITD_MS;
    if delay_ms < MIN_ITD_MS {
        return panned;
    }

    let sample_rate = panned.sample_rate();
    let delay_frames = ((delay_ms / 1000.0) * sample_rate as f32).round() as usize;
    if delay_frames == 0 {
        return panned;
    }

    let (mut left, mut right) = match panned.split_stereo() {
        Some(channels) => channels,
        None => return panned,
    };

    // Delay the ear opposite the source; pad the near ear at the end so both
    // channels stay the same length.
    let silence = vec![0i16; delay_frames];
    if position < 0.0 {
        right.splice(0..0, silence.iter().copied());
        left.extend_from_slice(&silence);
    } else {
        left.splice(0..0, silence.iter().copied());
        right.extend_from_slice(&silence);
    }

    AudioClip::from_stereo_channels(left, right, sample_rate)
}

/// Constant-power stereo pan.
fn pan(clip: AudioClip, position: f32) -> AudioClip {
    let angle = (position + 1.0) * std::f32::consts::FRAC_PI_4;
    let left_gain = angle.cos();
    let right_gain = angle.sin();

    let sample_rate = clip.sample_rate();
    let samples: Vec<i16> = clip
        .samples()
        .chunks_exact(2)
        .flat_map(|pair| {
            [
                scale_sample(pair[0], left_gain),
                scale_sample(pair[1], right_gain),
            ]
        })
        .collect();

    AudioClip::from_interleaved_stereo(samples, sample_rate)
}

fn scale_sample(sample: i16, gain: f32) -> i16 {
    (sample as f32 * gain)
        .round()
        .clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 24_000;

    fn stereo_clip_ms(duration_ms: u64) -> AudioClip {
        let frames = (duration_ms * RATE as u64 / 1000) as usize;
        let samples: Vec<i16> = (0..frames * 2).map(|i| (i % 100) as i16 + 100).collect();
        AudioClip::new(samples, 2, RATE).unwrap()
    }

    #[test]
    fn test_center_position_keeps_duration_and_length() {
        let clip = stereo_clip_ms(500);
        let frames = clip.frames();
        let out = apply_spatial(clip, 0.0);
        // delay_ms = 0 < threshold: no ITD padding
        assert_eq!(out.frames(), frames);
        assert_eq!(out.duration_ms(), 500);
    }

    #[test]
    fn test_full_right_delays_left_channel() {
        let clip = stereo_clip_ms(100);
        let frames = clip.frames();
        let out = apply_spatial(clip, 1.0);

        // 0.6 ms at 24 kHz rounds to 14 frames of delay
        let expected_delay = ((MAX_ITD_MS / 1000.0) * RATE as f32).round() as usize;
        assert_eq!(expected_delay, 14);
        assert_eq!(out.frames(), frames + expected_delay);

        let (left, right) = out.split_stereo().unwrap();
        assert_eq!(left.len(), right.len());
        // Far (left) ear starts with silence; near (right) ear ends with it
        assert!(left[..expected_delay].iter().all(|&s| s == 0));
        assert!(right[right.len() - expected_delay..].iter().all(|&s| s == 0));
        assert!(right[..expected_delay].iter().any(|&s| s != 0));
    }

    #[test]
    fn test_full_left_delays_right_channel() {
        let out = apply_spatial(stereo_clip_ms(100), -1.0);
        let (left, right) = out.split_stereo().unwrap();
        let delay = 14;
        assert!(right[..delay].iter().all(|&s| s == 0));
        assert!(left[..delay].iter().any(|&s| s != 0));
        assert!(left[left.len() - delay..].iter().all(|&s| s == 0));
    }

    #[test]
    fn test_pan_weights_toward_position_side() {
        let clip = AudioClip::new(vec![1000, 1000, 1000, 1000], 2, RATE).unwrap();
        let right_leaning = apply_spatial(clip.clone(), 0.0);
        let centered = right_leaning.samples().to_vec();
        // At center both channels share gain equally
        assert_eq!(centered[0], centered[1]);

        let panned = pan(clip, 0.8);
        let samples = panned.samples();
        assert!(samples[1] > samples[0], "right channel should dominate");
    }

    #[test]
    fn test_negligible_position_skips_itd() {
        let clip = stereo_clip_ms(100);
        let frames = clip.frames();
        // |0.01| * 0.6 = 0.006 ms, below the 0.01 ms threshold
        let out = apply_spatial(clip, 0.01);
        assert_eq!(out.frames(), frames);
    }

    #[test]
    fn test_mono_input_returned_unchanged() {
        let clip = AudioClip::new(vec![5, 6, 7], 1, RATE).unwrap();
        let out = apply_spatial(clip.clone(), 0.9);
        assert_eq!(out, clip);
    }

    #[test]
    fn test_channels_equal_length_after_itd() {
        for position in [-1.0f32, -0.4, 0.4, 0.7, 1.0] {
            let out = apply_spatial(stereo_clip_ms(250), position);
            let (left, right) = out.split_stereo().unwrap();
            assert_eq!(left.len(), right.len(), "position {}", position);
        }
    }
}
