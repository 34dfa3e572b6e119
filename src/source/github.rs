//! source::github
//!
//! GitHub issue source implementation using the REST API.
//!
//! # Design
//!
//! This module implements the `IssueSource` trait for GitHub. Listing walks
//! the paginated issues endpoint (`state=open`, `per_page=100`, the platform
//! maximum) starting at page 1 and stops at the first of:
//!
//! - an empty page,
//! - a page shorter than the requested page size (last page, saves one
//!   round trip),
//! - an HTTP 422 response (pagination exhausted; a clean stop, not an error).
//!
//! The issues endpoint interleaves pull requests with issues; items carrying
//! the `pull_request` marker are dropped before an [`Issue`] is constructed.
//!
//! # Rate Limiting
//!
//! GitHub has rate limits. This implementation:
//! - Returns `SourceError::RateLimited` when a 403 carries
//!   `x-ratelimit-remaining: 0`
//! - Does not implement automatic retry (caller's responsibility)

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use super::traits::{Issue, IssueSource, RepoId, SourceError};

/// Default GitHub API base URL.
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "issuelens";

/// Per-request time budget.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub's maximum page size for the issues endpoint.
const MAX_PER_PAGE: usize = 100;

/// GitHub issue source.
///
/// Implements the `IssueSource` trait for GitHub using the REST API.
/// Authentication is optional: without a token, requests run against the
/// unauthenticated rate limit.
pub struct GitHubIssues {
    /// HTTP client for making requests (carries the 30s request timeout)
    client: Client,
    /// Optional personal access token
    token: Option<String>,
    /// API base URL (configurable for GitHub Enterprise and tests)
    api_base: String,
    /// Requested page size; always 100 outside of tests
    per_page: usize,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubIssues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubIssues")
            .field("has_token", &self.token.is_some())
            .field("api_base", &self.api_base)
            .field("per_page", &self.per_page)
            .finish()
    }
}

impl GitHubIssues {
    /// Create a new GitHub issue source.
    ///
    /// # Arguments
    ///
    /// * `token` - Optional personal access token for authenticated requests
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            token,
            api_base: DEFAULT_API_BASE.to_string(),
            per_page: MAX_PER_PAGE,
        }
    }

    /// Create a GitHub issue source with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise installations or to point the client
    /// at a mock server in tests.
    pub fn with_api_base(token: Option<String>, api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::new(token)
        }
    }

    /// Override the requested page size.
    ///
    /// The production value is GitHub's maximum of 100; smaller sizes let
    /// tests exercise the pagination stop conditions with few fixtures.
    pub fn with_page_size(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    /// Build common headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        if let Some(ref token) = self.token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    /// Build the issues listing URL for one page.
    fn issues_url(&self, repo: &RepoId, page: u32) -> String {
        format!(
            "{}/repos/{}/{}/issues?state=open&page={}&per_page={}",
            self.api_base, repo.owner, repo.name, page, self.per_page
        )
    }

    /// Classify a transport-level failure from reqwest.
    fn classify_transport(err: reqwest::Error) -> SourceError {
        if err.is_timeout() {
            SourceError::Timeout
        } else {
            SourceError::Unavailable(err.to_string())
        }
    }
}

#[async_trait]
impl IssueSource for GitHubIssues {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn list_open_issues(&self, repo: &RepoId) -> Result<Vec<Issue>, SourceError> {
        let mut issues: Vec<Issue> = Vec::new();
        let mut page: u32 = 1;

        loop {
            let url = self.issues_url(repo, page);

            let response = self
                .client
                .get(&url)
                .headers(self.headers())
                .send()
                .await
                .map_err(Self::classify_transport)?;

            let status = response.status();

            match status {
                StatusCode::OK => {}
                StatusCode::FORBIDDEN => {
                    let remaining = response
                        .headers()
                        .get("x-ratelimit-remaining")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("0");
                    if remaining == "0" {
                        return Err(SourceError::RateLimited);
                    }
                    let message = error_message(response).await;
                    return Err(SourceError::Forbidden(message));
                }
                StatusCode::NOT_FOUND => {
                    return Err(SourceError::NotFound { repo: repo.key() });
                }
                // Pagination exhausted: treated as a clean end of listing.
                StatusCode::UNPROCESSABLE_ENTITY => break,
                _ => {
                    let message = error_message(response).await;
                    return Err(SourceError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }
            }

            let items: Vec<RawIssue> = response.json().await.map_err(|e| SourceError::Api {
                status: status.as_u16(),
                message: format!("failed to parse response: {}", e),
            })?;

            // Empty page means no more results.
            if items.is_empty() {
                break;
            }

            let item_count = items.len();
            issues.extend(
                items
                    .into_iter()
                    .filter(|item| item.pull_request.is_none())
                    .map(Issue::from),
            );

            // A short page is the last page; skip the extra round trip.
            if item_count < self.per_page {
                break;
            }

            page += 1;
        }

        Ok(issues)
    }
}

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// Extract the error message from a non-success response body.
async fn error_message(response: reqwest::Response) -> String {
    match response.json::<GitHubErrorResponse>().await {
        Ok(err) => err.message,
        Err(_) => "unknown error".to_string(),
    }
}

/// GitHub issue list item (subset of the listing payload).
///
/// `pull_request` is only inspected for presence: the listing endpoint
/// returns issues and pull requests interleaved, and its presence marks the
/// item as a pull request.
#[derive(Deserialize)]
struct RawIssue {
    id: u64,
    title: String,
    body: Option<String>,
    html_url: String,
    created_at: String,
    pull_request: Option<serde_json::Value>,
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        Issue {
            id: raw.id,
            title: raw.title,
            body: raw.body.unwrap_or_default(),
            url: raw.html_url,
            created_at: raw.created_at,
        }
    }
}
