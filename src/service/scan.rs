//! service::scan
//!
//! Repository scanning: fetch open issues and replace the cache.

use std::sync::Arc;
use thiserror::Error;

use crate::source::{IssueSource, RepoId, SourceError};
use crate::store::{IssueStore, StoreError};

/// Errors from a repository scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Fetching from the issue tracker failed; the cache is untouched.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Caching the fetched issues failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a repository scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// The scanned repository.
    pub repo: RepoId,
    /// Number of issues fetched and now cached.
    pub issues_fetched: usize,
    /// Whether the cache replacement succeeded.
    pub cached_successfully: bool,
}

/// Service for scanning repositories.
///
/// Fetches the complete open issue set from the source and replaces the
/// repository's cached rows. Fail-fast: a source error aborts the scan
/// before the store is touched, so a failed scan never clobbers a previous
/// successful one.
pub struct ScanService {
    source: Arc<dyn IssueSource>,
    store: Arc<dyn IssueStore>,
}

impl ScanService {
    /// Create a scan service over the given source and store.
    pub fn new(source: Arc<dyn IssueSource>, store: Arc<dyn IssueStore>) -> Self {
        Self { source, store }
    }

    /// Fetch all open issues for `repo` and cache them, replacing any
    /// previous scan.
    pub async fn scan(&self, repo: &RepoId) -> Result<ScanOutcome, ScanError> {
        tracing::info!(repo = %repo, source = self.source.name(), "scanning repository");

        let issues = self.source.list_open_issues(repo).await?;
        tracing::info!(repo = %repo, count = issues.len(), "fetched open issues");

        let cached = self.store.replace_issues(repo, &issues).await?;
        tracing::info!(repo = %repo, count = cached, "cached issues");

        Ok(ScanOutcome {
            repo: repo.clone(),
            issues_fetched: cached,
            cached_successfully: true,
        })
    }
}
