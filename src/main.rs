//! Prat CLI entry point.

use anyhow::Result;
use clap::Parser;
use prat::cli::{commands, Cli, Commands};
use prat::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging; -v flags override the configured level
    let log_level = match cli.verbose {
        0 => settings.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("prat={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Ensure the temp directory exists
    std::fs::create_dir_all(settings.temp_dir())?;

    // Execute command
    match cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Generate {
            inputs,
            output,
            style,
            audience,
            dialogue_model,
            host1_voice,
            host2_voice,
            separation,
            pause_ms,
            plan,
            save_dialogue,
            save_plan,
            unlock_token_limit,
            instructions,
            no_subtitles,
            timing_output,
        } => {
            let args = commands::GenerateArgs {
                inputs,
                output,
                style,
                audience,
                dialogue_model,
                host1_voice,
                host2_voice,
                separation,
                pause_ms,
                plan,
                save_dialogue,
                save_plan,
                unlock_token_limit,
                instructions,
                no_subtitles,
                timing_output,
            };
            commands::run_generate(args, settings).await?;
        }

        Commands::Voices => {
            commands::run_voices(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings)?;
        }
    }

    Ok(())
}
