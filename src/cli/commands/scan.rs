//! cli::commands::scan
//!
//! Scan command: fetch a repository's open issues into the local cache.

use anyhow::Result;
use std::sync::Arc;

use crate::cli::Context;
use crate::service::ScanService;

/// Run the scan command.
pub async fn scan(ctx: &Context, repo: &str) -> Result<()> {
    let repo = super::parse_repo(repo)?;
    let source = super::build_source(ctx);
    let store = super::open_store(ctx).await?;

    if !ctx.quiet {
        println!("Scanning {} for open issues...", repo);
    }

    let service = ScanService::new(Arc::new(source), store);
    let outcome = service.scan(&repo).await?;

    if ctx.quiet {
        println!("{}", outcome.issues_fetched);
    } else {
        println!(
            "Cached {} open issue(s) for {}.",
            outcome.issues_fetched, outcome.repo
        );
        if outcome.issues_fetched == 0 {
            println!("Nothing to analyze yet; the repository has no open issues.");
        }
    }
    Ok(())
}
