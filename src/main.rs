//! Homework Status Bot - Main Entry Point
//!
//! Polls the homework review API and sends status changes to a Telegram chat.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use homework_status_bot::api::HomeworkClient;
use homework_status_bot::config::{BotSettings, Credentials, check_tokens};
use homework_status_bot::scheduler::HomeworkPoller;
use homework_status_bot::telegram::TelegramNotifier;

/// Telegram bot reporting homework review status changes.
#[derive(Parser, Debug)]
#[command(name = "homework_bot")]
#[command(about = "Poll the homework review API and forward status changes to Telegram")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Also append log output to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables before logging so LOG_FILE and RUST_LOG apply
    let env_loaded = dotenvy::from_filename(&args.env_file);

    let settings = BotSettings::from_env_with_defaults();
    let log_file = args.log_file.clone().or_else(|| settings.log_file.clone());
    init_logging(&args.log_level, log_file.as_deref())?;

    if let Err(e) = env_loaded {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let credentials = Credentials::from_env();
    if !check_tokens(&credentials) {
        error!(
            "Missing required environment variables: {}",
            credentials.missing().join(", ")
        );
    }
    let credentials = credentials
        .require()
        .context("Cannot start without credentials")?;

    settings.validate().context("Invalid bot settings")?;

    info!(
        "Loaded configuration (endpoint: {}, interval: {}s, chat: {})",
        settings.endpoint, settings.retry_secs, credentials.telegram_chat_id
    );

    let client = HomeworkClient::from_config(&settings, &credentials)
        .context("Failed to create status API client")?;
    let notifier = TelegramNotifier::from_config(&settings, &credentials)
        .context("Failed to create Telegram notifier")?;

    let mut poller = HomeworkPoller::new(client, notifier)
        .with_retry_interval(settings.retry_interval());

    info!("Bot is running. Use Ctrl+C to stop.");

    tokio::select! {
        () = poller.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::io::stdout.and(std::sync::Arc::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
        }
    }

    Ok(())
}
