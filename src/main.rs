//! MRBOT CLI Entry Point
//!
//! - `mrbot` / `mrbot chat` - interactive app (default)
//! - `mrbot doctor` - Firebase diagnostic report
//! - `mrbot config [--validate]` - show (and check) the configuration

use anyhow::Context;
use mrbot::auth::validator::validate_firebase;
use mrbot::cli::output::Output;
use mrbot::cli::{app, Cli, Commands, LogFormat};
use mrbot::utils::config::{load_env, Config, FirebaseConfig};
use owo_colors::OwoColorize;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool, format: LogFormat) {
    let default = if verbose { "mrbot=debug" } else { "mrbot=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose, cli.log_format);

    let out = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    }
    .with_theme(cli.theme);

    if let Err(e) = load_env(cli.env_file.as_deref()) {
        out.config_error(&e);
        return Ok(ExitCode::FAILURE);
    }

    match cli.command {
        None | Some(Commands::Chat) => {
            let config = match Config::from_env() {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!("{}", e);
                    out.config_error(&e);
                    return Ok(ExitCode::FAILURE);
                }
            };
            tracing::info!(model = %config.gemini.model, project = %config.firebase.project_id, "Starting MRBOT");
            app::run(config, out).await.context("interactive session failed")?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Doctor) => {
            let valid = app::doctor(FirebaseConfig::from_env(), out).await;
            Ok(if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Some(Commands::Config { validate }) => {
            let config = match Config::from_env() {
                Ok(config) => config,
                Err(e) => {
                    out.config_error(&e);
                    return Ok(ExitCode::FAILURE);
                }
            };
            out.config_summary(&config);

            if !validate {
                return Ok(ExitCode::SUCCESS);
            }

            out.subheader("Validation");
            let report = validate_firebase(&reqwest::Client::new(), &config.firebase).await;
            if report.is_valid() {
                out.success("Firebase configuration is valid");
                Ok(ExitCode::SUCCESS)
            } else {
                for error in &report.errors {
                    out.error(error);
                }
                out.hint("Run 'mrbot doctor' for the full report.");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
