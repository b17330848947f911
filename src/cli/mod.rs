//! CLI module for MRBOT
//!
//! Provides command-line parsing and the terminal front-end for the `mrbot`
//! binary. Uses clap for argument parsing, owo-colors for colored output,
//! dialoguer for prompts and indicatif for progress spinners.

pub mod app;
pub mod output;
pub mod prompt;

use crate::views::theme::Theme;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// MRBOT - AI chat in your terminal
///
/// Sign in with your Firebase account and chat with Google's Gemini.
#[derive(Parser, Debug)]
#[command(
    name = "mrbot",
    author = "MRBOT Developers",
    version,
    about = "MRBOT - AI chat powered by Gemini",
    long_about = "Sign in with Firebase Authentication and chat with Google's Gemini.\n\n\
                  Configuration is read from the environment and from a .env file in the\n\
                  current directory. Run 'mrbot doctor' if sign-in does not work.",
    after_help = "EXAMPLES:\n    \
                  mrbot                         # Start the interactive app\n    \
                  mrbot doctor                  # Check the Firebase configuration\n    \
                  mrbot config --validate       # Show and validate the configuration\n    \
                  mrbot --env-file prod.env     # Use a specific env file"
)]
pub struct Cli {
    /// Env file to load instead of ./.env
    #[arg(long, env = "MRBOT_ENV_FILE", global = true)]
    pub env_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Color theme
    #[arg(long, value_enum, default_value_t = Theme::Dark, global = true)]
    pub theme: Theme,

    /// Log output format (logs go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive app (same as running without a subcommand)
    Chat,

    /// Print the Firebase diagnostic report
    ///
    /// Checks the identity variables, probes the auth domain and lists the
    /// console settings that usually need attention.
    Doctor,

    /// Show configuration information
    Config {
        /// Validate the identity configuration and probe the auth domain
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["mrbot"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.theme, Theme::Dark);
        assert_eq!(cli.log_format, LogFormat::Pretty);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mrbot",
            "config",
            "--validate",
            "--no-color",
            "--theme",
            "light",
            "--env-file",
            "prod.env",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Commands::Config { validate: true }));
        assert!(cli.no_color);
        assert_eq!(cli.theme, Theme::Light);
        assert_eq!(cli.env_file, Some(PathBuf::from("prod.env")));
    }

    #[test]
    fn test_json_logs() {
        let cli = Cli::try_parse_from(["mrbot", "doctor", "--log-format", "json"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Doctor));
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
