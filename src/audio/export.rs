//! Podcast export: tagged MP3 via an intermediate WAV and ffmpeg.

use super::clip::AudioClip;
use crate::error::{PratError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Metadata tags embedded in the exported file.
#[derive(Debug, Clone)]
pub struct PodcastTags {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
}

impl Default for PodcastTags {
    fn default() -> Self {
        Self {
            title: "Generated Podcast".to_string(),
            artist: "Prat".to_string(),
            album: "Generated Podcast".to_string(),
            genre: "Podcast".to_string(),
        }
    }
}

/// Export the mixed timeline as an MP3 file with metadata tags.
///
/// The PCM timeline is written to a temporary WAV under `temp_dir`, then
/// re-encoded with ffmpeg/libmp3lame at the given bitrate. Intermediate
/// output directories are created as needed; the staging WAV is removed when
/// the function returns. Returns the final written path.
#[instrument(skip(timeline), fields(output = %output_path.display()))]
pub async fn export_podcast(
    timeline: &AudioClip,
    output_path: &Path,
    bitrate: &str,
    tags: &PodcastTags,
    temp_dir: &Path,
) -> Result<PathBuf> {
    if timeline.frames() == 0 {
        return Err(PratError::Export("Timeline is empty".to_string()));
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::create_dir_all(temp_dir)?;
    let staging = tempfile::tempdir_in(temp_dir)?;
    let wav_path = staging.path().join("timeline.wav");
    write_wav(timeline, &wav_path)?;

    info!("Exporting podcast to: {}", output_path.display());
    encode_mp3(&wav_path, output_path, bitrate, tags).await?;

    let duration_seconds = timeline.duration_ms() / 1000;
    info!(
        "Podcast created: {}m {}s",
        duration_seconds / 60,
        duration_seconds % 60
    );

    Ok(output_path.to_path_buf())
}

/// Write a clip to a 16-bit PCM WAV file.
fn write_wav(clip: &AudioClip, path: &Path) -> Result<()> {
    let spec = hound::WavSpec {
        channels: clip.channels(),
        sample_rate: clip.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| PratError::Export(format!("Failed to create WAV file: {}", e)))?;

    for &sample in clip.samples() {
        writer
            .write_sample(sample)
            .map_err(|e| PratError::Export(format!("Failed to write WAV sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| PratError::Export(format!("Failed to finalize WAV file: {}", e)))?;

    debug!("Wrote intermediate WAV: {}", path.display());
    Ok(())
}

/// Re-encode a WAV file to tagged MP3 using ffmpeg.
async fn encode_mp3(
    source: &Path,
    dest: &Path,
    bitrate: &str,
    tags: &PodcastTags,
) -> Result<()> {
    let year = chrono::Local::now().format("%Y").to_string();

    let result = Command::new("ffmpeg")
        .arg("-i").arg(source)
        .arg("-vn")
        .arg("-codec:a").arg("libmp3lame")
        .arg("-b:a").arg(bitrate)
        .arg("-metadata").arg(format!("title={}", tags.title))
        .arg("-metadata").arg(format!("artist={}", tags.artist))
        .arg("-metadata").arg(format!("album={}", tags.album))
        .arg("-metadata").arg(format!("genre={}", tags.genre))
        .arg("-metadata").arg(format!("date={}", year))
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(PratError::Export(format!("ffmpeg encoding failed: {}", err)))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(PratError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(PratError::Export(format!(
            "ffmpeg execution failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_wav_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");

        let clip = AudioClip::new(vec![100, -100, 200, -200, 300, -300], 2, 24_000).unwrap();
        write_wav(&clip, &path).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 24_000);
        assert_eq!(spec.bits_per_sample, 16);

        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, clip.samples());
    }

    #[tokio::test]
    async fn test_export_rejects_empty_timeline() {
        let dir = tempfile::tempdir().unwrap();
        let timeline = AudioClip::empty(2, 24_000);
        let result = export_podcast(
            &timeline,
            &dir.path().join("out.mp3"),
            "192k",
            &PodcastTags::default(),
            dir.path(),
        )
        .await;
        assert!(matches!(result, Err(PratError::Export(_))));
    }
}
