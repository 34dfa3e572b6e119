//! llm
//!
//! Abstraction over text-completion backends.
//!
//! # Architecture
//!
//! - [`traits`]: The `CompletionModel` trait and error type
//! - [`openai`]: OpenAI chat-completions implementation
//! - [`mock`]: Scripted in-memory implementation for tests
//!
//! The analysis engine depends only on the trait; whether a backend is
//! configured at all is decided by the CLI layer from configuration.

pub mod mock;
pub mod openai;
pub mod traits;

pub use openai::OpenAiModel;
pub use traits::{CompletionModel, CompletionRequest, LlmError};
