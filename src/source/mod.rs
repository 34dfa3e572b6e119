//! source
//!
//! Abstraction over remote issue trackers.
//!
//! # Architecture
//!
//! - [`traits`]: The `IssueSource` trait, domain types, and error taxonomy
//! - [`github`]: GitHub REST implementation with paginated listing
//! - [`mock`]: Deterministic in-memory implementation for tests
//!
//! The rest of the crate depends only on the trait; the CLI layer decides
//! which implementation to construct.

pub mod github;
pub mod mock;
pub mod traits;

pub use github::GitHubIssues;
pub use traits::{Issue, IssueSource, RepoId, SourceError};
