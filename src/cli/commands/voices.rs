//! Voices command - list available TTS voices.

use crate::audio::AVAILABLE_VOICES;
use crate::cli::Output;
use crate::config::Settings;
use console::style;

/// Run the voices command.
pub fn run_voices(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Available Voices");
    println!();

    for voice in AVAILABLE_VOICES {
        let marker = if *voice == settings.audio.host1_voice {
            format!(" {}", style("(host 1)").cyan())
        } else if *voice == settings.audio.host2_voice {
            format!(" {}", style("(host 2)").cyan())
        } else {
            String::new()
        };
        println!("  {} {}{}", style("*").cyan(), style(voice).bold(), marker);
    }

    println!();
    println!(
        "Change voices with {} or the {} / {} flags.",
        style("prat config edit").green(),
        style("--host1-voice").green(),
        style("--host2-voice").green()
    );

    Ok(())
}
