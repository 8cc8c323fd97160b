//! Headless Recycled Rush runner.
//!
//! Runs the factory without graphics, controlled via JSON on stdin/stdout.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode with the stock plant
//! cargo run -p rush_headless
//!
//! # Custom layout, full state after every tick
//! cargo run -p rush_headless -- run --layout assets/data/factory.ron --auto-state
//! ```
//!
//! # Protocol
//!
//! Input (stdin): JSON commands, one per line
//! Output (stdout): JSON responses, one per line
//! Logs (stderr): Debug information

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rush_headless::layout_loader::{layout_from_env, load_layout_or_default};
use rush_headless::runner::{HeadlessConfig, HeadlessRunner};

#[derive(Parser)]
#[command(name = "rush_headless")]
#[command(about = "Headless Recycled Rush runner for scripted play and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive session over stdin/stdout
    Run {
        /// Layout file to load (defaults to $RUSH_LAYOUT, then the stock plant)
        #[arg(short, long)]
        layout: Option<PathBuf>,

        /// Output state after every tick
        #[arg(long)]
        auto_state: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is for protocol
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let (layout, auto_state) = match cli.command {
        Some(Commands::Run { layout, auto_state }) => (layout, auto_state),
        None => (None, false),
    };
    cmd_run(layout.or_else(layout_from_env), auto_state)
}

fn cmd_run(layout_path: Option<PathBuf>, auto_state: bool) -> ExitCode {
    let factory = match load_layout_or_default(layout_path.as_deref()) {
        Ok(factory) => factory,
        Err(e) => {
            tracing::error!("Failed to load layout: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = HeadlessConfig {
        auto_state_output: auto_state,
        layout_path,
    };
    let mut runner = HeadlessRunner::with_config(factory, config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    match runner.run(stdin.lock(), stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("I/O error: {e}");
            ExitCode::FAILURE
        }
    }
}
