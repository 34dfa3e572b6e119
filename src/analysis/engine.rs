//! analysis::engine
//!
//! Map-reduce analysis over an issue set of unbounded size.
//!
//! # Design
//!
//! Given a user prompt and a non-empty issue list, the engine produces one
//! text analysis through a size-dependent pipeline:
//!
//! - **Direct path** (small sets): all documents concatenated into one
//!   context block, one completion call, output returned verbatim.
//! - **Chunked path** (large sets): documents partitioned into fixed-size
//!   chunks, one summarization call per chunk (map), then iterative batched
//!   synthesis of summaries until few enough remain (reduce), then one final
//!   synthesis call.
//!
//! The reduce stage halves-or-better the summary count every round (batch
//! size 5), so the final synthesis prompt is bounded regardless of how many
//! issues went in, and the loop terminates in O(log₅ chunks) rounds.
//!
//! # Failure semantics
//!
//! Every stage is fail-fast: one failed completion aborts the whole analysis
//! with a stage-specific error and no partial analysis text is ever
//! returned. Nothing is retried here.

use std::sync::Arc;
use thiserror::Error;

use crate::llm::{CompletionModel, CompletionRequest, LlmError};
use crate::source::Issue;

use super::chunk::partition;
use super::document::{format_documents, Document};

/// Separator between documents (and between summaries) in a prompt.
const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// Errors from the analysis engine.
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    /// No completion backend was configured.
    #[error("no LLM backend is configured")]
    NotConfigured,

    /// The issue list was empty.
    #[error("no issues to analyze")]
    EmptyInput,

    /// The direct (single-call) analysis failed.
    #[error("analysis failed: {0}")]
    DirectAnalysis(LlmError),

    /// A map-stage chunk summarization failed.
    #[error("chunk analysis failed: {0}")]
    ChunkAnalysis(LlmError),

    /// A reduce-stage summary synthesis failed.
    #[error("summary reduction failed: {0}")]
    Reduction(LlmError),

    /// The final synthesis call failed.
    #[error("final synthesis failed: {0}")]
    FinalSynthesis(LlmError),
}

/// Pipeline sizing policy.
///
/// These constants govern the cost/latency vs. completeness trade-off. They
/// are tunable, but the defaults are the compatibility-relevant behavior:
/// 20-document direct threshold, 25-document chunks, 5-summary reduction
/// fan-in, 500-character body previews.
#[derive(Debug, Clone)]
pub struct Tuning {
    /// Largest document count that still takes the direct path.
    pub direct_threshold: usize,
    /// Documents per map-stage chunk.
    pub chunk_size: usize,
    /// Summaries combined per reduce-stage call; also the ceiling on
    /// summaries entering final synthesis. Values below 2 are treated as 2:
    /// a 1:1 reduce round would never shrink the summary list.
    pub reduce_fan_in: usize,
    /// Body preview cap in characters.
    pub body_preview_chars: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            direct_threshold: 20,
            chunk_size: 25,
            reduce_fan_in: 5,
            body_preview_chars: 500,
        }
    }
}

/// Map-reduce analysis engine.
///
/// Holds an optional completion backend; analysis refuses to run when none
/// is configured. Construct once and share, the engine keeps no per-request
/// state.
pub struct Analyzer {
    model: Option<Arc<dyn CompletionModel>>,
    tuning: Tuning,
}

impl Analyzer {
    /// Create an analyzer with default tuning.
    ///
    /// `model` is `None` when no backend is configured; every analysis then
    /// fails with [`AnalysisError::NotConfigured`].
    pub fn new(model: Option<Arc<dyn CompletionModel>>) -> Self {
        Self {
            model,
            tuning: Tuning::default(),
        }
    }

    /// Create an analyzer with explicit tuning.
    pub fn with_tuning(model: Option<Arc<dyn CompletionModel>>, tuning: Tuning) -> Self {
        Self { model, tuning }
    }

    /// Analyze issues against a user prompt, returning one text analysis.
    ///
    /// # Errors
    ///
    /// - `NotConfigured` if no backend is configured
    /// - `EmptyInput` if `issues` is empty
    /// - a stage-specific error if any completion call fails
    pub async fn analyze(&self, prompt: &str, issues: &[Issue]) -> Result<String, AnalysisError> {
        let model = self.model.as_ref().ok_or(AnalysisError::NotConfigured)?;

        if issues.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let documents = format_documents(issues, self.tuning.body_preview_chars);

        if documents.len() <= self.tuning.direct_threshold {
            tracing::debug!(documents = documents.len(), "taking direct analysis path");
            self.direct_analysis(model.as_ref(), prompt, &documents)
                .await
        } else {
            tracing::debug!(documents = documents.len(), "taking chunked analysis path");
            self.map_reduce_analysis(model.as_ref(), prompt, &documents)
                .await
        }
    }

    /// Analyze a small document set in a single call.
    async fn direct_analysis(
        &self,
        model: &dyn CompletionModel,
        prompt: &str,
        documents: &[Document],
    ) -> Result<String, AnalysisError> {
        let context = join_documents(documents);

        model
            .complete(CompletionRequest {
                system: "You are an experienced open-source maintainer and software engineer.\n\
                         You are analyzing GitHub issues for a repository. Provide clear, \
                         actionable insights based on the issues provided.\n\
                         Be specific about patterns, priorities, and recommendations."
                    .to_string(),
                user: format!(
                    "User Request: {prompt}\n\n\
                     Here are the GitHub issues to analyze:\n\n\
                     {context}\n\n\
                     Please provide a comprehensive analysis addressing the user's request."
                ),
            })
            .await
            .map_err(AnalysisError::DirectAnalysis)
    }

    /// Analyze a large document set with chunked map-reduce.
    async fn map_reduce_analysis(
        &self,
        model: &dyn CompletionModel,
        prompt: &str,
        documents: &[Document],
    ) -> Result<String, AnalysisError> {
        let chunks = partition(documents, self.tuning.chunk_size);
        tracing::debug!(chunks = chunks.len(), "map stage starting");

        let mut summaries = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            let summary = self.summarize_chunk(model, prompt, chunk).await?;
            summaries.push(format!("Batch {} Summary:\n{}", index + 1, summary));
        }

        let fan_in = self.effective_fan_in();
        while summaries.len() > fan_in {
            tracing::debug!(summaries = summaries.len(), "reduce round starting");
            summaries = self.reduce_round(model, prompt, summaries).await?;
        }

        self.final_synthesis(model, prompt, &summaries).await
    }

    /// Map stage: summarize one chunk of documents.
    async fn summarize_chunk(
        &self,
        model: &dyn CompletionModel,
        prompt: &str,
        chunk: &[Document],
    ) -> Result<String, AnalysisError> {
        let context = join_documents(chunk);

        model
            .complete(CompletionRequest {
                system: "You are analyzing a batch of GitHub issues.\n\
                         Summarize the key themes, common problems, and notable patterns in \
                         these issues.\n\
                         Be concise but comprehensive. Focus on actionable insights."
                    .to_string(),
                user: format!(
                    "Analyze these GitHub issues and identify key themes:\n\n\
                     {context}\n\n\
                     User's focus: {prompt}\n\n\
                     Provide a concise summary (max 300 words) of the main themes and insights."
                ),
            })
            .await
            .map_err(AnalysisError::ChunkAnalysis)
    }

    /// Reduction fan-in floored at 2, so every reduce round produces
    /// strictly fewer summaries than it consumed and the reduce loop
    /// terminates.
    fn effective_fan_in(&self) -> usize {
        self.tuning.reduce_fan_in.max(2)
    }

    /// One reduce round: replace each batch of summaries with one synthesis.
    ///
    /// Pure with respect to its input: consumes the current summary list and
    /// returns a new, strictly shorter one, so rounds are testable in
    /// isolation.
    async fn reduce_round(
        &self,
        model: &dyn CompletionModel,
        prompt: &str,
        summaries: Vec<String>,
    ) -> Result<Vec<String>, AnalysisError> {
        let batches = partition(&summaries, self.effective_fan_in());
        let mut reduced = Vec::with_capacity(batches.len());

        for batch in &batches {
            let summaries_text = batch.join(BLOCK_SEPARATOR);
            let combined = model
                .complete(CompletionRequest {
                    system: "You are synthesizing multiple analysis summaries.\n\
                             Combine the key insights, identify common patterns, and highlight \
                             priorities.\n\
                             Be concise and focus on the most important findings."
                        .to_string(),
                    user: format!(
                        "Combine these batch summaries into a unified summary:\n\n\
                         {summaries_text}\n\n\
                         Focus on: {prompt}\n\n\
                         Provide a concise synthesis (max 400 words)."
                    ),
                })
                .await
                .map_err(AnalysisError::Reduction)?;
            reduced.push(combined);
        }

        Ok(reduced)
    }

    /// Final synthesis: produce the caller-visible analysis from the
    /// remaining summaries.
    async fn final_synthesis(
        &self,
        model: &dyn CompletionModel,
        prompt: &str,
        summaries: &[String],
    ) -> Result<String, AnalysisError> {
        let summaries_text = summaries.join(BLOCK_SEPARATOR);

        model
            .complete(CompletionRequest {
                system: "You are an experienced open-source maintainer providing the final \
                         analysis.\n\
                         Synthesize all insights into a clear, actionable response.\n\
                         Be specific about patterns, priorities, and recommendations."
                    .to_string(),
                user: format!(
                    "I analyzed a large set of GitHub issues in batches. Here are the \
                     summaries:\n\n\
                     {summaries_text}\n\n\
                     Please provide a comprehensive final analysis addressing this request:\n\
                     \"{prompt}\"\n\n\
                     Include:\n\
                     1. Key themes and patterns identified\n\
                     2. Priority issues or areas needing attention\n\
                     3. Specific recommendations for maintainers"
                ),
            })
            .await
            .map_err(AnalysisError::FinalSynthesis)
    }
}

/// Concatenate documents with the block separator.
fn join_documents(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockModel;

    fn issues(count: usize) -> Vec<Issue> {
        (0..count as u64)
            .map(|id| Issue {
                id,
                title: format!("issue {}", id),
                body: format!("body of issue {}", id),
                url: format!("https://github.com/o/r/issues/{}", id),
                created_at: "2024-05-01T12:00:00Z".to_string(),
            })
            .collect()
    }

    fn analyzer(model: &MockModel) -> Analyzer {
        Analyzer::new(Some(Arc::new(model.clone())))
    }

    mod preconditions {
        use super::*;

        #[tokio::test]
        async fn no_model_is_not_configured() {
            let engine = Analyzer::new(None);
            let err = engine.analyze("themes?", &issues(3)).await.unwrap_err();
            assert!(matches!(err, AnalysisError::NotConfigured));
        }

        #[tokio::test]
        async fn empty_issue_list_is_empty_input() {
            let model = MockModel::new();
            let err = analyzer(&model).analyze("themes?", &[]).await.unwrap_err();
            assert!(matches!(err, AnalysisError::EmptyInput));
            assert_eq!(model.call_count(), 0);
        }
    }

    mod path_selection {
        use super::*;

        #[tokio::test]
        async fn twenty_documents_take_direct_path() {
            let model = MockModel::new();
            analyzer(&model).analyze("themes?", &issues(20)).await.unwrap();
            // one call total, asking for the comprehensive analysis directly
            assert_eq!(model.call_count(), 1);
            assert!(model.calls()[0].user.contains("comprehensive analysis"));
        }

        #[tokio::test]
        async fn twenty_one_documents_take_chunked_path() {
            let model = MockModel::new();
            analyzer(&model).analyze("themes?", &issues(21)).await.unwrap();
            // one map call (21 ≤ chunk size) plus the final synthesis
            assert_eq!(model.call_count(), 2);
            assert!(model.calls()[0].user.contains("identify key themes"));
        }

        #[tokio::test]
        async fn direct_result_returned_verbatim() {
            let model = MockModel::new().with_replies(vec!["the analysis".to_string()]);
            let result = analyzer(&model).analyze("themes?", &issues(3)).await.unwrap();
            assert_eq!(result, "the analysis");
        }

        #[tokio::test]
        async fn direct_prompt_carries_user_request_and_all_documents() {
            let model = MockModel::new();
            analyzer(&model)
                .analyze("what should we fix first?", &issues(3))
                .await
                .unwrap();

            let call = &model.calls()[0];
            assert!(call.user.contains("User Request: what should we fix first?"));
            assert!(call.user.contains("Title: issue 0"));
            assert!(call.user.contains("Title: issue 2"));
        }
    }

    mod map_stage {
        use super::*;

        #[tokio::test]
        async fn forty_seven_issues_two_chunks_no_reduction() {
            let model = MockModel::new();
            analyzer(&model).analyze("themes?", &issues(47)).await.unwrap();
            // 2 map calls + 1 final synthesis, no reduce round (2 ≤ 5)
            assert_eq!(model.call_count(), 3);
        }

        #[tokio::test]
        async fn batch_labels_follow_chunk_order() {
            let model = MockModel::new()
                .with_replies(vec!["first summary".to_string(), "second summary".to_string()]);
            analyzer(&model).analyze("themes?", &issues(47)).await.unwrap();

            let final_call = &model.calls()[2];
            let first = final_call.user.find("Batch 1 Summary:\nfirst summary").unwrap();
            let second = final_call.user.find("Batch 2 Summary:\nsecond summary").unwrap();
            assert!(first < second);
        }

        #[tokio::test]
        async fn map_failure_aborts_with_chunk_analysis_error() {
            // 3 chunks; the second map call fails
            let model = MockModel::new().fail_on_call(2);
            let err = analyzer(&model)
                .analyze("themes?", &issues(75))
                .await
                .unwrap_err();
            assert!(matches!(err, AnalysisError::ChunkAnalysis(_)));
            // no further calls after the failing one
            assert_eq!(model.call_count(), 2);
        }
    }

    mod reduce_stage {
        use super::*;

        #[tokio::test]
        async fn six_chunks_trigger_one_reduce_round() {
            // 150 issues → 6 chunks → 6 summaries > 5 → 2 reduce calls →
            // 2 summaries → final synthesis
            let model = MockModel::new();
            analyzer(&model).analyze("themes?", &issues(150)).await.unwrap();
            assert_eq!(model.call_count(), 6 + 2 + 1);
        }

        #[tokio::test]
        async fn reduction_terminates_below_fan_in() {
            // 700 issues → 28 chunks → 28 → 6 → 2 summaries, two rounds
            let model = MockModel::new();
            analyzer(&model).analyze("themes?", &issues(700)).await.unwrap();
            assert_eq!(model.call_count(), 28 + 6 + 2 + 1);
        }

        #[tokio::test]
        async fn fan_in_of_one_still_terminates() {
            // A literal fan-in of 1 would fold batches 1:1 and never shrink
            // the summary list; the engine floors it at 2
            let tuning = Tuning {
                direct_threshold: 1,
                chunk_size: 1,
                reduce_fan_in: 1,
                body_preview_chars: 500,
            };
            let model = MockModel::new();
            let engine = Analyzer::with_tuning(Some(Arc::new(model.clone())), tuning);

            engine.analyze("themes?", &issues(4)).await.unwrap();
            // 4 map calls → 4 → 2 summaries (one round of pairs) → final
            assert_eq!(model.call_count(), 4 + 2 + 1);
        }

        #[tokio::test]
        async fn reduce_failure_aborts_with_reduction_error() {
            // 6 map calls succeed, first reduce call (7th overall) fails
            let model = MockModel::new().fail_on_call(7);
            let err = analyzer(&model)
                .analyze("themes?", &issues(150))
                .await
                .unwrap_err();
            assert!(matches!(err, AnalysisError::Reduction(_)));
        }

        #[tokio::test]
        async fn final_synthesis_failure_classified() {
            // 2 map calls succeed, final synthesis (3rd) fails
            let model = MockModel::new().fail_on_call(3);
            let err = analyzer(&model)
                .analyze("themes?", &issues(47))
                .await
                .unwrap_err();
            assert!(matches!(err, AnalysisError::FinalSynthesis(_)));
        }

        #[tokio::test]
        async fn final_prompt_quotes_original_request() {
            let model = MockModel::new();
            analyzer(&model)
                .analyze("rank by severity", &issues(47))
                .await
                .unwrap();
            let final_call = model.calls().pop().unwrap();
            assert!(final_call.user.contains("\"rank by severity\""));
            assert!(final_call.user.contains("Specific recommendations"));
        }
    }

    mod tuning {
        use super::*;

        #[tokio::test]
        async fn custom_thresholds_respected() {
            let model = MockModel::new();
            let engine = Analyzer::with_tuning(
                Some(Arc::new(model.clone())),
                Tuning {
                    direct_threshold: 2,
                    chunk_size: 3,
                    reduce_fan_in: 2,
                    body_preview_chars: 10,
                },
            );

            // 9 issues → 3 chunks → 3 > 2 → reduce to 2 → final
            engine.analyze("themes?", &issues(9)).await.unwrap();
            assert_eq!(model.call_count(), 3 + 2 + 1);
        }

        #[test]
        fn default_values_match_policy() {
            let tuning = Tuning::default();
            assert_eq!(tuning.direct_threshold, 20);
            assert_eq!(tuning.chunk_size, 25);
            assert_eq!(tuning.reduce_fan_in, 5);
            assert_eq!(tuning.body_preview_chars, 500);
        }
    }
}
