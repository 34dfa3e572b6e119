//! source::mock
//!
//! Mock issue source implementation for deterministic testing.
//!
//! # Design
//!
//! The mock source serves canned issue lists from memory keyed by repository
//! and allows configuring failure scenarios, so service-level tests never
//! touch the network.
//!
//! # Example
//!
//! ```
//! use issuelens::source::mock::MockIssueSource;
//! use issuelens::source::{Issue, IssueSource, RepoId};
//!
//! # tokio_test::block_on(async {
//! let repo = RepoId::parse("octocat/hello-world").unwrap();
//! let source = MockIssueSource::new().with_issues(
//!     &repo,
//!     vec![Issue {
//!         id: 1,
//!         title: "panic on empty input".to_string(),
//!         body: String::new(),
//!         url: "https://github.com/octocat/hello-world/issues/1".to_string(),
//!         created_at: "2024-05-01T12:00:00Z".to_string(),
//!     }],
//! );
//!
//! let issues = source.list_open_issues(&repo).await.unwrap();
//! assert_eq!(issues.len(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{Issue, IssueSource, RepoId, SourceError};

/// Mock issue source for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockIssueSource {
    inner: Arc<Mutex<MockSourceInner>>,
}

#[derive(Debug, Default)]
struct MockSourceInner {
    /// Canned issues per repository key.
    issues: HashMap<String, Vec<Issue>>,
    /// Error to return instead of listing (for testing error paths).
    fail_with: Option<SourceError>,
    /// Repository keys requested so far, in order.
    requests: Vec<String>,
}

impl MockIssueSource {
    /// Create a new empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the mock with issues for a repository.
    pub fn with_issues(self, repo: &RepoId, issues: Vec<Issue>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.issues.insert(repo.key(), issues);
        }
        self
    }

    /// Configure the mock to fail every listing with the given error.
    pub fn fail_with(self, error: SourceError) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_with = Some(error);
        }
        self
    }

    /// Repository keys that were requested, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.inner.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl IssueSource for MockIssueSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_open_issues(&self, repo: &RepoId) -> Result<Vec<Issue>, SourceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(repo.key());

        if let Some(ref error) = inner.fail_with {
            return Err(error.clone());
        }

        // Unknown repositories behave like upstream 404s.
        match inner.issues.get(&repo.key()) {
            Some(issues) => Ok(issues.clone()),
            None => Err(SourceError::NotFound { repo: repo.key() }),
        }
    }
}
