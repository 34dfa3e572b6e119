//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and wire up services
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, builds the concrete
//! source/model/store from config, and dispatches to the services in
//! [`crate::service`]. Handlers format output; they hold no business logic.

pub mod args;
pub mod commands;

pub use args::Cli;

use crate::config::Config;
use anyhow::{Context as _, Result};

/// Shared state passed to every command handler.
pub struct Context {
    pub config: Config,
    pub quiet: bool,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug, cli.quiet);

    let config =
        Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let ctx = Context {
        config,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx).await
}

/// Initialize tracing to stderr.
///
/// `RUST_LOG` takes precedence; otherwise `--debug` selects debug level,
/// `--quiet` warnings only, and the default is info.
fn init_logging(debug: bool, quiet: bool) {
    let default_level = if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
