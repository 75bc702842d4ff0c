// crates/gitlab-gate-mcp/src/tools/tests.rs
// ============================================================================
// Module: Tool Router Unit Tests
// Description: Pipeline ordering, plan execution, and error translation.
// Purpose: Confirm no backend call precedes validation and failures map cleanly.
// Dependencies: async-trait, gitlab-gate-client, gitlab-gate-contract, tokio
// ============================================================================

//! ## Overview
//! Uses an in-memory backend that records every call so tests can assert
//! both the outcome and the absence of side effects.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions use panic-based helpers."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use gitlab_gate_client::ApiRequest;
use gitlab_gate_client::BackendError;
use gitlab_gate_client::FileWrite;
use gitlab_gate_client::GitlabBackend;
use gitlab_gate_client::UploadRequest;
use gitlab_gate_contract::ToolCatalog;
use gitlab_gate_contract::ToolName;
use serde_json::Value;
use serde_json::json;

use super::ToolError;
use super::ToolRouter;
use crate::requests::DispatchPlan;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Backend answering every call with a fixed value.
struct StubBackend {
    calls: Mutex<Vec<String>>,
    answer: Result<Value, BackendError>,
}

impl StubBackend {
    fn answering(answer: Result<Value, BackendError>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            answer,
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<Value, BackendError> {
        self.calls.lock().unwrap().push(call);
        self.answer.clone()
    }
}

#[async_trait]
impl GitlabBackend for StubBackend {
    async fn execute(&self, request: ApiRequest) -> Result<Value, BackendError> {
        self.record(format!("{} {}", request.method, request.path_string()))
    }

    async fn write_file(&self, write: FileWrite) -> Result<Value, BackendError> {
        self.record(format!("write {}", write.file_path))
    }

    async fn upload(&self, upload: UploadRequest) -> Result<Value, BackendError> {
        self.record(format!("upload {}", upload.file_name))
    }
}

fn router(backend: Arc<StubBackend>, read_only: bool) -> ToolRouter {
    let catalog = Arc::new(ToolCatalog::builtin().expect("catalog"));
    ToolRouter::new(catalog, backend, read_only).expect("router")
}

// ============================================================================
// SECTION: Errors
// ============================================================================

#[test]
fn error_messages_match_the_caller_contract() {
    assert_eq!(
        ToolError::AccessDenied("create_issue".to_string()).to_string(),
        "Tool 'create_issue' is not available in read-only mode"
    );
    assert_eq!(ToolError::UnknownTool("nope".to_string()).to_string(), "Unknown tool: nope");
    assert_eq!(ToolError::Validation("Arguments are required".to_string()).kind(), "validation");
}

#[test]
fn backend_errors_pass_through_verbatim() {
    let backend = BackendError::Http {
        status: 404,
        message: "404 Project Not Found".to_string(),
    };
    let expected = backend.to_string();
    assert_eq!(ToolError::from(backend), ToolError::Backend(expected));
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

#[test]
fn prepare_returns_the_plan_without_backend_calls() {
    let backend = StubBackend::answering(Ok(Value::Null));
    let router = router(Arc::clone(&backend), false);
    let (tool, plan) = router
        .prepare("get_issue", Some(json!({ "project_id": "team/app", "issue_iid": 4 })))
        .expect("prepare");
    assert_eq!(tool, ToolName::GetIssue);
    let DispatchPlan::Request(request) = plan else {
        panic!("expected request plan");
    };
    assert_eq!(request.path_string(), "/projects/team/app/issues/4");
    assert!(backend.calls().is_empty());
}

#[test]
fn page_is_bounded_by_its_input_contract() {
    let backend = StubBackend::answering(Ok(Value::Null));
    let router = router(Arc::clone(&backend), false);
    router
        .prepare("list_issues", Some(json!({ "project_id": 1, "page": u32::MAX })))
        .expect("widest page");
    let err = router
        .prepare("list_issues", Some(json!({ "project_id": 1, "page": 4_294_967_296_u64 })))
        .unwrap_err();
    let ToolError::Validation(message) = err else {
        panic!("expected validation error");
    };
    assert!(message.starts_with("Invalid arguments: page: "), "{message}");
    assert!(backend.calls().is_empty());
}

#[test]
fn schema_valid_numbers_reach_the_plan() {
    let backend = StubBackend::answering(Ok(Value::Null));
    let router = router(Arc::clone(&backend), false);
    let (_, plan) = router
        .prepare("list_issues", Some(json!({ "project_id": 1.0, "page": 2.0 })))
        .expect("prepare");
    let DispatchPlan::Request(request) = plan else {
        panic!("expected request plan");
    };
    assert_eq!(request.path_string(), "/projects/1/issues");
    assert_eq!(request.query_value("page"), Some("2"));

    let (_, plan) = router
        .prepare("get_project", Some(json!({ "project_id": u64::MAX })))
        .expect("prepare");
    let DispatchPlan::Request(request) = plan else {
        panic!("expected request plan");
    };
    assert_eq!(request.path_string(), "/projects/18446744073709551615");
}

#[tokio::test]
async fn read_only_denial_happens_before_validation() {
    let backend = StubBackend::answering(Ok(Value::Null));
    let router = router(Arc::clone(&backend), true);
    let err = router.handle_tool_call("create_issue", None).await.unwrap_err();
    assert_eq!(err, ToolError::AccessDenied("create_issue".to_string()));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn cross_field_failure_makes_no_backend_call() {
    let backend = StubBackend::answering(Ok(json!([])));
    let router = router(Arc::clone(&backend), false);
    let err = router
        .handle_tool_call("list_issues", Some(json!({ "project_id": 1, "per_page": 500 })))
        .await
        .unwrap_err();
    assert_eq!(err, ToolError::Validation("per_page must be between 1 and 100".to_string()));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn successful_call_is_shaped() {
    let backend = StubBackend::answering(Ok(json!([{ "iid": 1, "title": "A", "extra": 1 }])));
    let router = router(Arc::clone(&backend), true);
    let response = router
        .handle_tool_call("list_issues", Some(json!({ "project_id": 9 })))
        .await
        .expect("call");
    let shaped: Value = serde_json::from_str(response.content[0].as_text()).unwrap();
    assert_eq!(shaped, json!([{ "iid": 1, "title": "A" }]));
    assert_eq!(backend.calls(), vec!["GET /projects/9/issues".to_string()]);
}

#[tokio::test]
async fn backend_failure_becomes_backend_error() {
    let failure = BackendError::Transport("connection reset".to_string());
    let backend = StubBackend::answering(Err(failure.clone()));
    let router = router(backend, false);
    let err = router
        .handle_tool_call("get_project", Some(json!({ "project_id": 1 })))
        .await
        .unwrap_err();
    assert_eq!(err, ToolError::Backend(failure.to_string()));
}

#[tokio::test]
async fn derived_plans_reshape_the_backend_record() {
    let backend = StubBackend::answering(Ok(json!({ "id": 4, "tag_list": ["docker"] })));
    let router = router(Arc::clone(&backend), true);
    let response = router
        .handle_tool_call(
            "validate_runner_tags",
            Some(json!({ "runner_id": 4, "required_tags": ["docker"] })),
        )
        .await
        .expect("call");
    let report: Value = serde_json::from_str(response.content[0].as_text()).unwrap();
    assert_eq!(report["compatible"], true);
    assert_eq!(backend.calls(), vec!["GET /runners/4".to_string()]);
}

#[test]
fn listing_follows_the_mode() {
    let backend = StubBackend::answering(Ok(Value::Null));
    let full = router(Arc::clone(&backend), false);
    let restricted = router(backend, true);
    assert_eq!(full.list_tools().len(), full.catalog().len());
    assert!(restricted.list_tools().len() < full.list_tools().len());
    assert!(restricted.read_only());
}
