// crates/gitlab-gate-mcp/tests/scenarios.rs
// ============================================================================
// Module: Dispatch Scenario Tests
// Description: End-to-end tool calls through the router with a mock backend.
// Purpose: Pin caller-visible messages and backend side effects per scenario.
// Dependencies: gitlab-gate-mcp, serde_json, tokio
// ============================================================================

//! ## Overview
//! Each test drives [`gitlab_gate_mcp::ToolRouter::handle_tool_call`] and then
//! inspects the recorded backend calls. Rejections must leave the backend
//! untouched; `push_files` must stop at the first failed write.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions are permitted."
)]

mod common;

use common::Call;
use common::RecordingBackend;
use common::router;
use gitlab_gate_mcp::ToolError;
use serde_json::json;

// ============================================================================
// SECTION: Access Control
// ============================================================================

#[tokio::test]
async fn read_only_mode_refuses_create_issue_with_valid_arguments() {
    let backend = RecordingBackend::new();
    let router = router(&backend, true);
    let err = router
        .handle_tool_call("create_issue", Some(json!({ "project_id": "123", "title": "Bug" })))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not available in read-only mode"));
    assert!(matches!(err, ToolError::AccessDenied(_)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn read_only_mode_still_serves_reads() {
    let backend = RecordingBackend::new();
    let router = router(&backend, true);
    router.handle_tool_call("list_issues", Some(json!({ "project_id": "123" }))).await.unwrap();
    assert_eq!(backend.calls(), vec![Call::Request("GET /projects/123/issues".to_string())]);
}

#[tokio::test]
async fn unknown_operation_fails_regardless_of_arguments() {
    let backend = RecordingBackend::new();
    let router = router(&backend, false);
    for arguments in [None, Some(json!({})), Some(json!({ "project_id": 1 }))] {
        let err = router.handle_tool_call("delete_everything", arguments).await.unwrap_err();
        assert_eq!(err, ToolError::UnknownTool("delete_everything".to_string()));
    }
    assert!(backend.calls().is_empty());
}

// ============================================================================
// SECTION: Validation
// ============================================================================

#[tokio::test]
async fn list_issues_rejects_page_zero() {
    let backend = RecordingBackend::new();
    let router = router(&backend, false);
    let err = router
        .handle_tool_call("list_issues", Some(json!({ "project_id": "123", "page": 0 })))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("page must be greater than 0"));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn list_commits_rejects_non_calendar_since() {
    let backend = RecordingBackend::new();
    let router = router(&backend, false);
    let err = router
        .handle_tool_call(
            "list_commits",
            Some(json!({ "project_id": "123", "since": "not-a-date" })),
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("since must be a valid ISO 8601 date"));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn list_commits_accepts_calendar_date_times() {
    let backend = RecordingBackend::new();
    let router = router(&backend, false);
    router
        .handle_tool_call(
            "list_commits",
            Some(json!({ "project_id": "123", "since": "2024-01-15T10:30:00Z" })),
        )
        .await
        .unwrap();
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn pagination_boundaries() {
    let backend = RecordingBackend::new();
    let router = router(&backend, false);
    for per_page in [0, 101] {
        let err = router
            .handle_tool_call(
                "list_merge_requests",
                Some(json!({ "project_id": 1, "per_page": per_page })),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "per_page must be between 1 and 100");
    }
    assert!(backend.calls().is_empty());
    for arguments in [
        json!({ "project_id": 1, "per_page": 1 }),
        json!({ "project_id": 1, "per_page": 100 }),
        json!({ "project_id": 1, "page": 1 }),
    ] {
        router.handle_tool_call("list_merge_requests", Some(arguments)).await.unwrap();
    }
    assert_eq!(backend.calls().len(), 3);
}

#[tokio::test]
async fn missing_required_field_makes_no_backend_call() {
    let backend = RecordingBackend::new();
    let router = router(&backend, false);
    let err = router
        .handle_tool_call("create_issue", Some(json!({ "project_id": "123" })))
        .await
        .unwrap_err();
    let ToolError::Validation(message) = err else {
        panic!("expected validation error");
    };
    assert!(message.contains("title"));
    let err = router.handle_tool_call("get_issue", None).await.unwrap_err();
    assert_eq!(err, ToolError::Validation("Arguments are required".to_string()));
    assert!(backend.calls().is_empty());
}

// ============================================================================
// SECTION: Bulk Push
// ============================================================================

fn push_arguments() -> serde_json::Value {
    json!({
        "project_id": "group/app",
        "branch": "main",
        "commit_message": "sync",
        "files": [
            { "file_path": "a.txt", "content": "a" },
            { "file_path": "b.txt", "content": "b" },
            { "file_path": "c.txt", "content": "c" }
        ]
    })
}

#[tokio::test]
async fn push_files_stops_at_the_first_failed_write() {
    let backend = RecordingBackend::failing_call(2);
    let router = router(&backend, false);
    let err = router.handle_tool_call("push_files", Some(push_arguments())).await.unwrap_err();
    assert!(matches!(err, ToolError::Backend(_)));
    assert!(err.to_string().contains("A file with this name doesn't exist"));
    assert_eq!(
        backend.calls(),
        vec![Call::Write("a.txt".to_string()), Call::Write("b.txt".to_string())]
    );
}

#[tokio::test]
async fn push_files_writes_every_file_in_order() {
    let backend = RecordingBackend::new();
    let router = router(&backend, false);
    let response = router.handle_tool_call("push_files", Some(push_arguments())).await.unwrap();
    assert_eq!(response.content.len(), 1);
    let written: serde_json::Value =
        serde_json::from_str(response.content[0].as_text()).unwrap();
    assert_eq!(written.as_array().unwrap().len(), 3);
    assert_eq!(
        backend.calls(),
        vec![
            Call::Write("a.txt".to_string()),
            Call::Write("b.txt".to_string()),
            Call::Write("c.txt".to_string())
        ]
    );
}

// ============================================================================
// SECTION: Uploads
// ============================================================================

#[tokio::test]
async fn wiki_attachment_upload_decodes_content() {
    let backend = RecordingBackend::new();
    let router = router(&backend, false);
    router
        .handle_tool_call(
            "upload_project_wiki_attachment",
            Some(json!({ "project_id": 4, "file_name": "a.png", "content": "aGVsbG8=" })),
        )
        .await
        .unwrap();
    assert_eq!(backend.calls(), vec![Call::Upload("a.png".to_string())]);
}
