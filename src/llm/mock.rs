//! llm::mock
//!
//! Mock completion model for deterministic testing.
//!
//! # Design
//!
//! The mock records every request and answers from a scripted reply queue,
//! falling back to a canned reply once the queue is empty. A failure can be
//! injected at an exact call index to test per-stage error propagation.
//!
//! # Example
//!
//! ```
//! use issuelens::llm::mock::MockModel;
//! use issuelens::llm::{CompletionModel, CompletionRequest};
//!
//! # tokio_test::block_on(async {
//! let model = MockModel::new().with_replies(vec!["first".to_string()]);
//!
//! let reply = model
//!     .complete(CompletionRequest {
//!         system: "role".to_string(),
//!         user: "task".to_string(),
//!     })
//!     .await
//!     .unwrap();
//!
//! assert_eq!(reply, "first");
//! assert_eq!(model.calls().len(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::traits::{CompletionModel, CompletionRequest, LlmError};

/// Reply produced when the scripted queue is exhausted.
const FALLBACK_REPLY: &str = "mock completion";

/// Mock completion model for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockModel {
    inner: Arc<Mutex<MockModelInner>>,
}

#[derive(Debug, Default)]
struct MockModelInner {
    /// Scripted replies, consumed front to back.
    replies: VecDeque<String>,
    /// 1-based call index that should fail, if any.
    fail_on_call: Option<usize>,
    /// Recorded requests in call order.
    calls: Vec<CompletionRequest>,
}

impl MockModel {
    /// Create a new mock model that answers every call with a canned reply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the replies for upcoming calls, in order.
    pub fn with_replies(self, replies: Vec<String>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.replies = replies.into();
        }
        self
    }

    /// Fail the `n`-th call (1-based) with a backend error.
    pub fn fail_on_call(self, n: usize) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on_call = Some(n);
        }
        self
    }

    /// All recorded requests, in call order.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }
}

#[async_trait]
impl CompletionModel for MockModel {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(request);
        let call_index = inner.calls.len();

        if inner.fail_on_call == Some(call_index) {
            return Err(LlmError::Backend("injected failure".to_string()));
        }

        Ok(inner
            .replies
            .pop_front()
            .unwrap_or_else(|| FALLBACK_REPLY.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user: &str) -> CompletionRequest {
        CompletionRequest {
            system: "system".to_string(),
            user: user.to_string(),
        }
    }

    #[tokio::test]
    async fn scripted_replies_in_order() {
        let model = MockModel::new().with_replies(vec!["a".to_string(), "b".to_string()]);

        assert_eq!(model.complete(request("1")).await.unwrap(), "a");
        assert_eq!(model.complete(request("2")).await.unwrap(), "b");
        assert_eq!(model.complete(request("3")).await.unwrap(), FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn records_requests() {
        let model = MockModel::new();
        model.complete(request("hello")).await.unwrap();

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].user, "hello");
    }

    #[tokio::test]
    async fn fails_on_exact_call_index() {
        let model = MockModel::new().fail_on_call(2);

        assert!(model.complete(request("1")).await.is_ok());
        assert!(model.complete(request("2")).await.is_err());
        assert!(model.complete(request("3")).await.is_ok());
    }
}
