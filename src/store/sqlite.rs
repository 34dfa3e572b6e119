//! store::sqlite
//!
//! SQLite-backed [`IssueStore`] implementation.
//!
//! # Design
//!
//! One `issues` table keyed by `(repo, id)` plus a `scans` table recording
//! the last successful scan per repository. `replace_issues` runs its delete
//! and inserts inside a single transaction so a failed scan never leaves a
//! repository half-replaced.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;

use crate::source::{Issue, RepoId};

use super::{IssueStore, StoreError};

/// SQLite implementation of the [`IssueStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `path` and ensure the
    /// schema exists.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Corrupt(format!("cannot create {:?}: {}", parent, e)))?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
            .map_err(sqlx::Error::from)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Wrap an existing pool (tests use this with an in-memory database).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS issues (
                repo TEXT NOT NULL,
                id INTEGER NOT NULL,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                html_url TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (repo, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_issues_repo ON issues(repo)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS scans (
                repo TEXT PRIMARY KEY,
                scanned_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl IssueStore for SqliteStore {
    async fn replace_issues(&self, repo: &RepoId, issues: &[Issue]) -> Result<usize, StoreError> {
        let key = repo.key();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM issues WHERE repo = ?")
            .bind(&key)
            .execute(&mut *tx)
            .await?;

        for issue in issues {
            sqlx::query(
                r#"
                INSERT INTO issues (repo, id, title, body, html_url, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&key)
            .bind(issue.id as i64)
            .bind(&issue.title)
            .bind(&issue.body)
            .bind(&issue.url)
            .bind(&issue.created_at)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO scans (repo, scanned_at) VALUES (?, ?)
            ON CONFLICT(repo) DO UPDATE SET scanned_at = excluded.scanned_at
            "#,
        )
        .bind(&key)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(issues.len())
    }

    async fn has_repo(&self, repo: &RepoId) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM scans WHERE repo = ?")
            .bind(repo.key())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn list_issues(&self, repo: &RepoId) -> Result<Vec<Issue>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, body, html_url, created_at
            FROM issues
            WHERE repo = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(repo.key())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let id: i64 = row.get("id");
                Issue {
                    id: id as u64,
                    title: row.get("title"),
                    body: row.get("body"),
                    url: row.get("html_url"),
                    created_at: row.get("created_at"),
                }
            })
            .collect())
    }

    async fn issue_count(&self, repo: &RepoId) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM issues WHERE repo = ?")
            .bind(repo.key())
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.get("n");
        Ok(count as u64)
    }

    async fn last_scanned(&self, repo: &RepoId) -> Result<Option<DateTime<Utc>>, StoreError> {
        let row = sqlx::query("SELECT scanned_at FROM scans WHERE repo = ?")
            .bind(repo.key())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            None => Ok(None),
            Some(row) => {
                let raw: String = row.get("scanned_at");
                let parsed = DateTime::parse_from_rfc3339(&raw)
                    .map_err(|e| StoreError::Corrupt(format!("bad scanned_at '{}': {}", raw, e)))?;
                Ok(Some(parsed.with_timezone(&Utc)))
            }
        }
    }
}
