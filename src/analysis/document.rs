//! analysis::document
//!
//! Projection of issues into LLM-facing documents.
//!
//! # Design
//!
//! Each issue becomes exactly one document: title, creation timestamp, URL,
//! and a length-capped body. The body cap bounds worst-case prompt size per
//! issue and is applied uniformly before any path selection downstream.
//!
//! Documents are transient; they exist only for the duration of one analysis
//! call and are never persisted.

use crate::source::Issue;

/// Marker appended to bodies cut at the preview cap.
const TRUNCATION_MARKER: &str = "...";

/// Text shown for issues with an empty body.
const EMPTY_BODY_PLACEHOLDER: &str = "No description provided";

/// LLM-facing text projection of one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Fully rendered text block for this issue.
    pub text: String,
}

/// Project issues into documents, capping each body at `body_preview_chars`.
pub fn format_documents(issues: &[Issue], body_preview_chars: usize) -> Vec<Document> {
    issues
        .iter()
        .map(|issue| Document {
            text: format!(
                "Title: {}\nCreated: {}\nURL: {}\nDescription: {}",
                issue.title,
                issue.created_at,
                issue.url,
                preview_body(&issue.body, body_preview_chars),
            ),
        })
        .collect()
}

/// Cap a body at `max_chars` characters, appending a truncation marker when
/// anything was cut. Counts characters, not bytes, so multi-byte text never
/// splits mid-character.
fn preview_body(body: &str, max_chars: usize) -> String {
    if body.is_empty() {
        return EMPTY_BODY_PLACEHOLDER.to_string();
    }
    if body.chars().count() <= max_chars {
        return body.to_string();
    }
    let mut preview: String = body.chars().take(max_chars).collect();
    preview.push_str(TRUNCATION_MARKER);
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_with_body(body: &str) -> Issue {
        Issue {
            id: 1,
            title: "flaky test".to_string(),
            body: body.to_string(),
            url: "https://github.com/o/r/issues/1".to_string(),
            created_at: "2024-05-01T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn short_body_kept_verbatim() {
        let docs = format_documents(&[issue_with_body("fails on CI")], 500);
        assert_eq!(
            docs[0].text,
            "Title: flaky test\nCreated: 2024-05-01T12:00:00Z\n\
             URL: https://github.com/o/r/issues/1\nDescription: fails on CI"
        );
    }

    #[test]
    fn body_at_cap_not_truncated() {
        let body = "x".repeat(500);
        let docs = format_documents(&[issue_with_body(&body)], 500);
        assert!(docs[0].text.ends_with(&body));
        assert!(!docs[0].text.ends_with("..."));
    }

    #[test]
    fn body_over_cap_truncated_with_marker() {
        let body = "x".repeat(501);
        let docs = format_documents(&[issue_with_body(&body)], 500);
        let expected = format!("{}...", "x".repeat(500));
        assert!(docs[0].text.ends_with(&expected));
    }

    #[test]
    fn empty_body_uses_placeholder() {
        let docs = format_documents(&[issue_with_body("")], 500);
        assert!(docs[0].text.ends_with("Description: No description provided"));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        // 600 three-byte characters; a byte cap would split mid-character
        let body = "語".repeat(600);
        let docs = format_documents(&[issue_with_body(&body)], 500);
        let expected = format!("Description: {}...", "語".repeat(500));
        assert!(docs[0].text.ends_with(&expected));
    }

    #[test]
    fn one_document_per_issue() {
        let issues = vec![issue_with_body("a"), issue_with_body("b")];
        assert_eq!(format_documents(&issues, 500).len(), 2);
    }
}
