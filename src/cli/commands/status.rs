//! cli::commands::status
//!
//! Status command: report what the cache holds for a repository.

use anyhow::Result;

use crate::cli::Context;
use crate::store::IssueStore;

/// Run the status command.
pub async fn status(ctx: &Context, repo: &str) -> Result<()> {
    let repo = super::parse_repo(repo)?;
    let store = super::open_store(ctx).await?;

    if !store.has_repo(&repo).await? {
        println!("{}: not scanned", repo);
        return Ok(());
    }

    let count = store.issue_count(&repo).await?;
    if ctx.quiet {
        println!("{}", count);
        return Ok(());
    }

    println!("{}: {} open issue(s) cached", repo, count);
    if let Some(scanned_at) = store.last_scanned(&repo).await? {
        println!("Last scanned: {}", scanned_at.to_rfc3339());
    }
    Ok(())
}
