//! Standalone checker for saved status API replies.
//!
//! Validates a JSON reply captured from the homework status API and prints
//! the notification the bot would send for it.

use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;

use homework_status_bot::homework::{PollResponse, parse_status};
use homework_status_bot::scheduler::Cursor;

/// Status API reply checker.
#[derive(Parser, Debug)]
#[command(name = "check_response")]
#[command(about = "Validates a saved homework status API reply and previews the notification")]
#[command(version)]
struct Args {
    /// Path to the JSON reply to validate.
    #[arg(short, long, default_value = "response.json")]
    file: String,

    /// Translate every submission, not only the most recent one.
    #[arg(short, long)]
    all: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    check_file(&args.file, args.all)
}

fn check_file(path: &str, all: bool) -> ExitCode {
    println!("Checking: {path}\n");

    let body: Value = match std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
    {
        Ok(body) => body,
        Err(e) => {
            eprintln!("✗ Failed to load reply: {e}");
            return ExitCode::FAILURE;
        }
    };

    let response = match PollResponse::from_value(&body) {
        Ok(response) => response,
        Err(e) => {
            eprintln!("✗ Invalid reply: {e}");
            return ExitCode::FAILURE;
        }
    };

    match response.current_date {
        Some(date) => println!("Next cursor: {}", Cursor::new(date)),
        None => println!("Next cursor: unchanged (no current_date)"),
    }

    if response.is_empty() {
        println!("✓ Reply is valid, no status changes to report");
        return ExitCode::SUCCESS;
    }

    let count = if all { response.homeworks.len() } else { 1 };
    let mut errors = 0;

    for (i, record) in response.homeworks.iter().take(count).enumerate() {
        match parse_status(record) {
            Ok(message) => println!("[{i}] ✓ {message}"),
            Err(e) => {
                errors += 1;
                println!("[{i}] ✗ {e}");
            }
        }
    }

    println!();

    if errors == 0 {
        println!("✓ Reply is valid ({count} submission(s) checked)");
        ExitCode::SUCCESS
    } else {
        println!("✗ Validation failed: {errors} error(s) in {count} submission(s)");
        ExitCode::FAILURE
    }
}
