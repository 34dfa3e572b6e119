//! store::memory
//!
//! In-memory [`IssueStore`] implementation for deterministic testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::source::{Issue, RepoId};

use super::{IssueStore, StoreError};

/// In-memory issue store.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, ScanEntry>>>,
}

#[derive(Debug, Clone)]
struct ScanEntry {
    issues: Vec<Issue>,
    scanned_at: DateTime<Utc>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IssueStore for MemoryStore {
    async fn replace_issues(&self, repo: &RepoId, issues: &[Issue]) -> Result<usize, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.insert(
            repo.key(),
            ScanEntry {
                issues: issues.to_vec(),
                scanned_at: Utc::now(),
            },
        );
        Ok(issues.len())
    }

    async fn has_repo(&self, repo: &RepoId) -> Result<bool, StoreError> {
        Ok(self.inner.lock().unwrap().contains_key(&repo.key()))
    }

    async fn list_issues(&self, repo: &RepoId) -> Result<Vec<Issue>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut issues = inner
            .get(&repo.key())
            .map(|entry| entry.issues.clone())
            .unwrap_or_default();
        // Newest first, matching the SQLite implementation's ordering
        issues.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(issues)
    }

    async fn issue_count(&self, repo: &RepoId) -> Result<u64, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .get(&repo.key())
            .map(|entry| entry.issues.len() as u64)
            .unwrap_or(0))
    }

    async fn last_scanned(&self, repo: &RepoId) -> Result<Option<DateTime<Utc>>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.get(&repo.key()).map(|entry| entry.scanned_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(id: u64, created_at: &str) -> Issue {
        Issue {
            id,
            title: format!("issue {}", id),
            body: String::new(),
            url: format!("https://github.com/o/r/issues/{}", id),
            created_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn replace_then_list_round_trips() {
        let store = MemoryStore::new();
        let repo = RepoId::parse("o/r").unwrap();

        let count = store
            .replace_issues(&repo, &[issue(1, "2024-05-01T12:00:00Z")])
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert!(store.has_repo(&repo).await.unwrap());
        assert_eq!(store.issue_count(&repo).await.unwrap(), 1);
        assert!(store.last_scanned(&repo).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn list_orders_newest_first() {
        let store = MemoryStore::new();
        let repo = RepoId::parse("o/r").unwrap();
        store
            .replace_issues(
                &repo,
                &[
                    issue(1, "2024-01-01T00:00:00Z"),
                    issue(2, "2024-03-01T00:00:00Z"),
                    issue(3, "2024-02-01T00:00:00Z"),
                ],
            )
            .await
            .unwrap();

        let ids: Vec<u64> = store
            .list_issues(&repo)
            .await
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn replace_is_latest_wins() {
        let store = MemoryStore::new();
        let repo = RepoId::parse("o/r").unwrap();
        store
            .replace_issues(&repo, &[issue(1, "2024-01-01T00:00:00Z")])
            .await
            .unwrap();
        store
            .replace_issues(&repo, &[issue(2, "2024-02-01T00:00:00Z")])
            .await
            .unwrap();

        let issues = store.list_issues(&repo).await.unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, 2);
    }

    #[tokio::test]
    async fn empty_scan_still_marks_repo_scanned() {
        let store = MemoryStore::new();
        let repo = RepoId::parse("o/r").unwrap();
        store.replace_issues(&repo, &[]).await.unwrap();

        assert!(store.has_repo(&repo).await.unwrap());
        assert_eq!(store.issue_count(&repo).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unscanned_repo_is_absent() {
        let store = MemoryStore::new();
        let repo = RepoId::parse("o/unscanned").unwrap();

        assert!(!store.has_repo(&repo).await.unwrap());
        assert!(store.list_issues(&repo).await.unwrap().is_empty());
        assert!(store.last_scanned(&repo).await.unwrap().is_none());
    }
}
