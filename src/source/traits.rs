//! source::traits
//!
//! Issue source trait definition for remote issue trackers.
//!
//! # Design
//!
//! The `IssueSource` trait is async because listing issues involves network
//! I/O. All methods return `Result` so API failures surface as classified
//! errors rather than panics.
//!
//! Sources are fail-fast: a failed request aborts the whole listing and no
//! partially fetched issues are returned. Retry and backoff policy belong to
//! the caller, never to the source itself.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from issue source operations.
///
/// These variants map the common failure modes of a remote issue tracker so
/// callers can react per class (e.g. back off on `RateLimited`).
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Network-level failure reaching the tracker (connection, DNS).
    #[error("issue tracker unreachable: {0}")]
    Unavailable(String),

    /// The per-request time budget was exceeded.
    #[error("issue tracker request timed out")]
    Timeout,

    /// The tracker signaled quota exhaustion.
    #[error("rate limit exceeded, try again later")]
    RateLimited,

    /// Access denied without a rate-limit signal.
    #[error("access forbidden: {0}")]
    Forbidden(String),

    /// The requested repository does not exist upstream.
    #[error("repository '{repo}' not found")]
    NotFound {
        /// The `owner/name` key that was requested.
        repo: String,
    },

    /// Any other non-success response from the tracker.
    #[error("issue tracker error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },
}

/// Identity of a repository on the hosting platform.
///
/// Stored and displayed as the `owner/name` key used by the issue cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoId {
    /// Parse an `owner/name` key.
    ///
    /// Both segments must be non-empty and limited to ASCII alphanumerics,
    /// `_`, `-`, and `.`.
    ///
    /// # Example
    ///
    /// ```
    /// use issuelens::source::RepoId;
    ///
    /// let repo = RepoId::parse("rust-lang/rust").unwrap();
    /// assert_eq!(repo.owner, "rust-lang");
    /// assert_eq!(repo.name, "rust");
    /// assert!(RepoId::parse("not a repo").is_none());
    /// ```
    pub fn parse(key: &str) -> Option<Self> {
        let (owner, name) = key.split_once('/')?;
        if !segment_ok(owner) || !segment_ok(name) {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// The `owner/name` cache key for this repository.
    pub fn key(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

fn segment_ok(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A single open issue from the remote tracker.
///
/// Never represents a pull request; sources must exclude those before an
/// `Issue` is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Tracker-assigned id, unique per repository.
    pub id: u64,
    /// Issue title.
    pub title: String,
    /// Issue body; empty string when the tracker reports none.
    pub body: String,
    /// Canonical web link to the issue.
    pub url: String,
    /// ISO-8601 creation timestamp, kept as the tracker's string form.
    pub created_at: String,
}

/// The IssueSource trait for listing issues from a remote tracker.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// `list_open_issues` returns classified `SourceError`s. Callers should
/// handle:
/// - `RateLimited`: back off and retry later
/// - `NotFound`: the repository does not exist upstream
/// - `Unavailable` / `Timeout`: transient connectivity problems
/// - `Forbidden` / `Api`: display the message to the user
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Get the source name (e.g., "github").
    fn name(&self) -> &'static str;

    /// List the complete set of currently-open issues for a repository.
    ///
    /// Pull requests are excluded. Issues are returned in the order the
    /// tracker lists them; a failure on any page discards everything fetched
    /// so far.
    async fn list_open_issues(&self, repo: &RepoId) -> Result<Vec<Issue>, SourceError>;
}
