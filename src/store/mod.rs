//! store
//!
//! Persistent issue cache.
//!
//! # Design
//!
//! The cache is keyed by repository: a scan replaces a repository's rows
//! wholesale (delete-then-insert inside one transaction), and an analysis
//! reads them back ordered by creation time descending. Issues are never
//! individually mutated; latest scan wins.
//!
//! # Architecture
//!
//! - [`sqlite`]: SQLite implementation used by the CLI
//! - [`memory`]: In-memory implementation for tests

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::source::{Issue, RepoId};

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value could not be interpreted.
    #[error("corrupt store entry: {0}")]
    Corrupt(String),
}

/// The IssueStore trait for caching scanned issues.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; concurrency discipline beyond
/// per-call atomicity (single writer per repository at a time) is the
/// caller's responsibility.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Replace all cached issues for a repository, recording the scan time.
    ///
    /// Returns the number of issues now cached. The delete and inserts
    /// happen atomically: a failure leaves the previous scan intact.
    async fn replace_issues(&self, repo: &RepoId, issues: &[Issue]) -> Result<usize, StoreError>;

    /// Whether the repository has ever been scanned.
    ///
    /// True even when the scan found zero issues.
    async fn has_repo(&self, repo: &RepoId) -> Result<bool, StoreError>;

    /// All cached issues for a repository, newest first by creation time.
    async fn list_issues(&self, repo: &RepoId) -> Result<Vec<Issue>, StoreError>;

    /// Number of cached issues for a repository.
    async fn issue_count(&self, repo: &RepoId) -> Result<u64, StoreError>;

    /// When the repository was last scanned, if ever.
    async fn last_scanned(&self, repo: &RepoId) -> Result<Option<DateTime<Utc>>, StoreError>;
}
