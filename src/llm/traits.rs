//! llm::traits
//!
//! Completion model trait definition for LLM backends.
//!
//! # Design
//!
//! The analysis engine treats the backend as an opaque text-completion
//! function: a role-structured prompt goes in, generated text comes out.
//! Backend failures surface uniformly as [`LlmError`]; the engine maps them
//! onto the pipeline stage that was running.
//!
//! No retries happen at this layer. A failed completion fails the enclosing
//! operation immediately.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from completion backends.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// Network-level failure reaching the backend.
    #[error("LLM backend unreachable: {0}")]
    Unavailable(String),

    /// The backend rejected or failed the request.
    #[error("LLM backend error: {0}")]
    Backend(String),
}

/// A role-structured completion prompt.
///
/// Holds the fully rendered system and user instructions; template variable
/// substitution happens before a request is constructed.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction establishing the model's role.
    pub system: String,
    /// User instruction carrying the task and context.
    pub user: String,
}

/// The CompletionModel trait for LLM backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Get the backend name (e.g., "openai").
    fn name(&self) -> &'static str;

    /// Generate a completion for the given prompt.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}
