//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use an explicit config file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::service::AnalysisMode;

/// issuelens - scan and analyze GitHub issues with an LLM
#[derive(Parser, Debug)]
#[command(name = "issuelens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (default: ~/.issuelens/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch all open issues for a repository and cache them locally
    #[command(
        name = "scan",
        long_about = "Fetch all open issues for a repository and cache them locally.\n\n\
            Pages through the repository's open issues (pull requests are \
            excluded), then replaces any previously cached scan for that \
            repository. Analysis always runs against this cache, so re-scan \
            whenever you want fresh data.",
        after_help = "\
EXAMPLES:
    # Scan a public repository
    issuelens scan rust-lang/cargo

    # Private repositories need a token (config file or GITHUB_TOKEN)
    GITHUB_TOKEN=ghp_xxx issuelens scan my-org/private-repo"
    )]
    Scan {
        /// Repository in 'owner/name' form
        repo: String,
    },

    /// Analyze cached issues against a question or prompt
    #[command(
        name = "analyze",
        long_about = "Analyze a repository's cached issues against a question.\n\n\
            Requires a prior scan. Small issue sets are analyzed in a single \
            LLM call; larger sets are summarized in batches and the batch \
            summaries are folded together before a final synthesis.",
        after_help = "\
EXAMPLES:
    # Ask about the 50 most recent issues (fast mode, the default)
    issuelens analyze rust-lang/cargo \"What are the common user complaints?\"

    # Analyze every cached issue
    issuelens analyze rust-lang/cargo \"Group the issues into themes\" --mode default"
    )]
    Analyze {
        /// Repository in 'owner/name' form
        repo: String,

        /// Question or instruction to analyze the issues against
        prompt: String,

        /// How much of the cache to analyze
        #[arg(long, value_enum, default_value_t = ModeArg::Fast)]
        mode: ModeArg,
    },

    /// Show cache status for a repository
    #[command(
        name = "status",
        long_about = "Show what is cached for a repository: whether it has been \
            scanned, how many issues are cached, and when the last scan ran."
    )]
    Status {
        /// Repository in 'owner/name' form
        repo: String,
    },
}

/// CLI-facing analysis mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Analyze the 50 most recently created issues
    Fast,
    /// Analyze every cached issue
    Default,
}

impl std::fmt::Display for ModeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeArg::Fast => write!(f, "fast"),
            ModeArg::Default => write!(f, "default"),
        }
    }
}

impl From<ModeArg> for AnalysisMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Fast => AnalysisMode::Fast,
            ModeArg::Default => AnalysisMode::Default,
        }
    }
}
