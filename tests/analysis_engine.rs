//! End-to-end tests for the analysis pipeline over a scripted model.
//!
//! These verify the externally observable contract: which path is taken,
//! what each prompt contains, and that the final synthesis text comes back
//! verbatim.

use std::sync::Arc;

use issuelens::analysis::{AnalysisError, Analyzer, Tuning};
use issuelens::llm::mock::MockModel;
use issuelens::llm::LlmError;
use issuelens::source::Issue;

fn issue(id: u64) -> Issue {
    Issue {
        id,
        title: format!("Widget breaks on input {}", id),
        body: format!("Steps to reproduce for case {}.", id),
        url: format!("https://github.com/octo/widgets/issues/{}", id),
        created_at: "2024-05-01T12:00:00Z".to_string(),
    }
}

fn issues(count: u64) -> Vec<Issue> {
    (0..count).map(issue).collect()
}

fn analyzer(model: &MockModel) -> Analyzer {
    Analyzer::new(Some(Arc::new(model.clone())))
}

#[tokio::test]
async fn small_sets_go_through_a_single_call() {
    let model = MockModel::new().with_replies(vec!["the analysis".to_string()]);
    let result = analyzer(&model)
        .analyze("What themes recur?", &issues(20))
        .await
        .unwrap();

    assert_eq!(result, "the analysis");
    assert_eq!(model.call_count(), 1);

    // The single prompt carries the question and every document
    let call = &model.calls()[0];
    assert!(call.user.contains("What themes recur?"));
    for id in 0..20 {
        assert!(call.user.contains(&format!("Widget breaks on input {}", id)));
    }
}

#[tokio::test]
async fn twenty_one_issues_trigger_map_reduce() {
    let model = MockModel::new();
    analyzer(&model)
        .analyze("What themes recur?", &issues(21))
        .await
        .unwrap();

    // 21 issues: one map chunk of 21 (chunk size 25), then final synthesis
    assert_eq!(model.call_count(), 2);
}

#[tokio::test]
async fn batch_summaries_are_labeled_in_order() {
    let model = MockModel::new().with_replies(vec![
        "first summary".to_string(),
        "second summary".to_string(),
        "third summary".to_string(),
        "combined".to_string(),
    ]);
    let result = analyzer(&model)
        .analyze("What themes recur?", &issues(60))
        .await
        .unwrap();

    // 60 issues: 3 map chunks + 1 final synthesis
    assert_eq!(model.call_count(), 4);
    assert_eq!(result, "combined");

    let final_prompt = &model.calls()[3].user;
    assert!(final_prompt.contains("Batch 1 Summary:\nfirst summary"));
    assert!(final_prompt.contains("Batch 2 Summary:\nsecond summary"));
    assert!(final_prompt.contains("Batch 3 Summary:\nthird summary"));
    let pos1 = final_prompt.find("Batch 1 Summary").unwrap();
    let pos3 = final_prompt.find("Batch 3 Summary").unwrap();
    assert!(pos1 < pos3);
}

#[tokio::test]
async fn forty_seven_issues_make_two_batches() {
    let model = MockModel::new().with_replies(vec![
        "batch one".to_string(),
        "batch two".to_string(),
        "final".to_string(),
    ]);
    let result = analyzer(&model)
        .analyze("What themes recur?", &issues(47))
        .await
        .unwrap();

    // 47 issues: chunks of 25 and 22, no reduction needed, one synthesis
    assert_eq!(model.call_count(), 3);
    assert_eq!(result, "final");

    // First chunk sees issues 0..25, second 25..47
    let calls = model.calls();
    assert!(calls[0].user.contains("Widget breaks on input 0\n"));
    assert!(calls[0].user.contains("Widget breaks on input 24\n"));
    assert!(!calls[0].user.contains("Widget breaks on input 25\n"));
    assert!(calls[1].user.contains("Widget breaks on input 25\n"));
    assert!(calls[1].user.contains("Widget breaks on input 46\n"));
}

#[tokio::test]
async fn many_summaries_are_folded_before_synthesis() {
    // 150 issues: 6 map chunks, one reduce round folding 6 -> 2, then final.
    // 6 map calls + 2 reduce calls + 1 synthesis = 9.
    let model = MockModel::new();
    analyzer(&model)
        .analyze("What themes recur?", &issues(150))
        .await
        .unwrap();
    assert_eq!(model.call_count(), 9);
}

#[tokio::test]
async fn empty_input_is_rejected_without_model_calls() {
    let model = MockModel::new();
    let err = analyzer(&model)
        .analyze("What themes recur?", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyInput));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn missing_model_is_rejected_before_reading_input() {
    let engine = Analyzer::new(None);
    let err = engine
        .analyze("What themes recur?", &issues(3))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::NotConfigured));
}

#[tokio::test]
async fn map_stage_failure_aborts_without_synthesis() {
    // Second chunk fails; no further calls are made
    let model = MockModel::new().fail_on_call(2);
    let err = analyzer(&model)
        .analyze("What themes recur?", &issues(60))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::ChunkAnalysis(LlmError::Backend(_))
    ));
    assert_eq!(model.call_count(), 2);
}

#[tokio::test]
async fn custom_tuning_changes_path_selection() {
    let tuning = Tuning {
        direct_threshold: 2,
        chunk_size: 3,
        reduce_fan_in: 2,
        body_preview_chars: 100,
    };
    let model = MockModel::new();
    let engine = Analyzer::with_tuning(Some(Arc::new(model.clone())), tuning);

    // 9 issues with chunk size 3: 3 map calls, summaries 3 > fan-in 2 so one
    // reduce round folding 3 -> 2, then final synthesis. 3 + 2 + 1 = 6.
    engine
        .analyze("What themes recur?", &issues(9))
        .await
        .unwrap();
    assert_eq!(model.call_count(), 6);
}

#[tokio::test]
async fn long_bodies_are_previewed_not_inlined() {
    let mut long_issue = issue(1);
    long_issue.body = "x".repeat(5_000);

    let model = MockModel::new();
    analyzer(&model)
        .analyze("What themes recur?", &[long_issue])
        .await
        .unwrap();

    let prompt = &model.calls()[0].user;
    assert!(!prompt.contains(&"x".repeat(501)));
    assert!(prompt.contains(&"x".repeat(500)));
}
