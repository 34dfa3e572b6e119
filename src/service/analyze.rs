//! service::analyze
//!
//! Analysis of cached issues against a natural-language prompt.
//!
//! # Design
//!
//! The analyze service reads only from the issue cache; it never contacts
//! the issue tracker, so a scan must have happened first. "Fast" mode bounds
//! latency and cost by analyzing only the 50 most recently created issues;
//! the newest-first order is re-established here before slicing rather than
//! trusted from the store.

use std::sync::Arc;
use thiserror::Error;

use crate::analysis::{AnalysisError, Analyzer};
use crate::source::RepoId;
use crate::store::{IssueStore, StoreError};

/// Issues analyzed in fast mode.
const FAST_MODE_LIMIT: usize = 50;

/// How much of the cached issue set an analysis reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// Analyze the 50 most recently created issues (faster).
    #[default]
    Fast,
    /// Analyze every cached issue (comprehensive).
    Default,
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisMode::Fast => write!(f, "fast"),
            AnalysisMode::Default => write!(f, "default"),
        }
    }
}

/// Errors from an analysis request.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The repository is absent from the local cache. Distinct from an
    /// upstream not-found: this reflects cache state only.
    #[error("repository '{0}' has not been scanned; run a scan first")]
    NotScanned(String),

    /// The repository was scanned but has no open issues cached.
    #[error("no cached issues for repository '{0}'")]
    NoIssues(String),

    /// Reading the cache failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The analysis pipeline failed; no partial analysis is available.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Service for analyzing cached issues.
pub struct AnalyzeService {
    store: Arc<dyn IssueStore>,
    analyzer: Analyzer,
}

impl AnalyzeService {
    /// Create an analyze service over the given store and engine.
    pub fn new(store: Arc<dyn IssueStore>, analyzer: Analyzer) -> Self {
        Self { store, analyzer }
    }

    /// Analyze a repository's cached issues, returning one text analysis.
    pub async fn analyze(
        &self,
        repo: &RepoId,
        prompt: &str,
        mode: AnalysisMode,
    ) -> Result<String, AnalyzeError> {
        tracing::info!(repo = %repo, %mode, "analyzing repository");

        if !self.store.has_repo(repo).await? {
            return Err(AnalyzeError::NotScanned(repo.key()));
        }

        let mut issues = self.store.list_issues(repo).await?;
        if issues.is_empty() {
            return Err(AnalyzeError::NoIssues(repo.key()));
        }
        tracing::info!(repo = %repo, count = issues.len(), "loaded cached issues");

        if mode == AnalysisMode::Fast && issues.len() > FAST_MODE_LIMIT {
            // ISO-8601 timestamps of one format compare correctly as strings;
            // re-sorting here avoids a silent dependency on store ordering.
            issues.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            issues.truncate(FAST_MODE_LIMIT);
            tracing::info!(limit = FAST_MODE_LIMIT, "fast mode: truncated to most recent");
        }

        let analysis = self.analyzer.analyze(prompt, &issues).await?;
        tracing::info!(repo = %repo, "analysis completed");
        Ok(analysis)
    }
}
