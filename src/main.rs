//! Wayfinder - autonomous web application explorer.
//!
//! Main entry point for the Wayfinder CLI.

mod cli;
mod cmd_explore;
mod cmd_keys;
mod wiring;

use std::path::PathBuf;

use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use wayfinder_config::{Config, ConfigLoader};

use crate::cli::{Cli, Commands, ConfigAction};

fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".wayfinder").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".wayfinder/logs"))
}

/// Initialize tracing with console and daily-rotated file output.
///
/// Filter precedence: `--log-level`, then `RUST_LOG`, then `[logging] level`.
fn init_tracing(config: &Config, cli_level: Option<&str>) -> anyhow::Result<()> {
    let log_dir = config
        .logging
        .dir
        .as_ref()
        .map(|d| PathBuf::from(ConfigLoader::expand_path(&d.to_string_lossy())))
        .unwrap_or_else(default_log_dir);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("wayfinder")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes buffered lines on exit; must outlive the subscriber.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = match cli_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.logging.level))?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(&cli.config)?;
    init_tracing(&config, cli.log_level.as_deref())?;
    tracing::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Commands::Explore { url, budget, output } => {
            cmd_explore::run_explore(&config, &url, budget, output.as_deref()).await
        }
        Commands::Keys { action } => cmd_keys::handle_keys_command(&config, action).await,
        Commands::Config {
            action: ConfigAction::Validate,
        } => cmd_keys::validate_config(&config),
    }
}
