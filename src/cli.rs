//! CLI definitions for Wayfinder.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Wayfinder CLI.
#[derive(Parser)]
#[command(name = "wayfinder")]
#[command(about = "Autonomous web application explorer driven by vision models")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/wayfinder.toml", global = true)]
    pub config: PathBuf,

    /// Log filter (overrides RUST_LOG and the config file)
    #[arg(long, global = true, env = "WAYFINDER_LOG")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Explore a web application starting from a seed URL
    Explore {
        /// Seed URL (http, https or file)
        url: String,

        /// Maximum number of distinct states to record
        #[arg(short, long)]
        budget: Option<u32>,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Credential pool management
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum KeysAction {
    /// Show quota and health of every credential
    Status,

    /// Re-enable credentials and clear their usage
    Reset {
        /// Only reset this provider
        #[arg(long)]
        provider: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Check the configuration file for errors
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explore() {
        let cli = Cli::try_parse_from([
            "wayfinder",
            "explore",
            "https://app.test",
            "--budget",
            "5",
            "-o",
            "report.json",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("config/wayfinder.toml"));
        match cli.command {
            Commands::Explore { url, budget, output } => {
                assert_eq!(url, "https://app.test");
                assert_eq!(budget, Some(5));
                assert_eq!(output, Some(PathBuf::from("report.json")));
            }
            _ => panic!("expected explore"),
        }
    }

    #[test]
    fn test_parse_keys_reset_with_global_flags() {
        let cli = Cli::try_parse_from([
            "wayfinder",
            "keys",
            "reset",
            "--provider",
            "gemini",
            "--config",
            "other.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(
            cli.command,
            Commands::Keys { action: KeysAction::Reset { provider: Some(ref p) } } if p == "gemini"
        ));
    }

    #[test]
    fn test_explore_requires_url() {
        assert!(Cli::try_parse_from(["wayfinder", "explore"]).is_err());
    }
}
