//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Builds its collaborators from config and calls the relevant service
//! 3. Formats and displays output
//!
//! All commands are async because they involve network or database I/O.

mod analyze;
mod scan;
mod status;

pub use analyze::analyze;
pub use scan::scan;
pub use status::status;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::cli::args::Command;
use crate::cli::Context;
use crate::source::{GitHubIssues, RepoId};
use crate::store::SqliteStore;

/// Dispatch a command to its handler.
pub async fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Scan { repo } => scan(ctx, &repo).await,
        Command::Analyze { repo, prompt, mode } => analyze(ctx, &repo, &prompt, mode.into()).await,
        Command::Status { repo } => status(ctx, &repo).await,
    }
}

/// Parse and validate an 'owner/name' argument.
fn parse_repo(raw: &str) -> Result<RepoId> {
    RepoId::parse(raw).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid repository '{}'. Expected 'owner/name', e.g. rust-lang/cargo.",
            raw
        )
    })
}

/// Build the GitHub source from config.
fn build_source(ctx: &Context) -> GitHubIssues {
    let token = ctx.config.github.token.clone();
    match ctx.config.github.api_base {
        Some(ref base) => GitHubIssues::with_api_base(token, base.clone()),
        None => GitHubIssues::new(token),
    }
}

/// Open the issue cache at the configured path.
async fn open_store(ctx: &Context) -> Result<Arc<SqliteStore>> {
    let path = ctx.config.db_path()?;
    let store = SqliteStore::open(Path::new(&path)).await?;
    Ok(Arc::new(store))
}
