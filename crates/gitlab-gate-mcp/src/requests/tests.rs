// crates/gitlab-gate-mcp/src/requests/tests.rs
// ============================================================================
// Module: Tool Request Unit Tests
// Description: Decoding and dispatch planning for typed tool requests.
// Purpose: Pin endpoint mapping, identifier handling, and local derivations.
// Dependencies: gitlab-gate-client, gitlab-gate-contract, serde_json
// ============================================================================

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

use gitlab_gate_client::ApiMethod;
use gitlab_gate_client::ApiRequest;
use gitlab_gate_contract::ToolName;
use serde_json::Value;
use serde_json::json;

use super::Derivation;
use super::DispatchPlan;
use super::Identifier;
use super::ToolRequest;
use crate::tools::ToolError;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn plan(tool: ToolName, arguments: Value) -> DispatchPlan {
    ToolRequest::decode(tool, arguments).expect("decode").plan().expect("plan")
}

fn request(tool: ToolName, arguments: Value) -> ApiRequest {
    match plan(tool, arguments) {
        DispatchPlan::Request(request) => request,
        other => panic!("expected a single request, got {other:?}"),
    }
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

#[test]
fn every_tool_decodes_to_its_own_variant() {
    let request =
        ToolRequest::decode(ToolName::GetProject, json!({ "project_id": 7 })).expect("decode");
    assert_eq!(request.tool(), ToolName::GetProject);
}

#[test]
fn identifiers_accept_numbers_and_paths() {
    let numeric: Identifier = serde_json::from_value(json!(42)).unwrap();
    let path: Identifier = serde_json::from_value(json!("group/app")).unwrap();
    assert_eq!(numeric, Identifier::Number(42.into()));
    assert_eq!(path.segment(), "group/app");
}

#[test]
fn path_identifiers_stay_one_raw_segment() {
    let request = request(ToolName::GetProject, json!({ "project_id": "group/sub/app" }));
    assert_eq!(request.path, vec!["projects".to_string(), "group/sub/app".to_string()]);
}

#[test]
fn decode_failure_is_a_validation_error() {
    let error = ToolRequest::decode(ToolName::GetIssue, json!({ "project_id": 1 })).unwrap_err();
    assert_eq!(
        error,
        ToolError::Validation("Invalid arguments: arguments: missing field `issue_iid`".to_string())
    );
}

#[test]
fn decode_failure_names_the_field() {
    let error =
        ToolRequest::decode(ToolName::GetProject, json!({ "project_id": true })).unwrap_err();
    let ToolError::Validation(message) = error else {
        panic!("expected validation error");
    };
    assert!(message.starts_with("Invalid arguments: project_id: "), "{message}");

    let error = ToolRequest::decode(
        ToolName::PushFiles,
        json!({
            "project_id": 1,
            "branch": "main",
            "commit_message": "m",
            "files": [{ "file_path": "a", "content": "x" }, { "file_path": 3, "content": "y" }]
        }),
    )
    .unwrap_err();
    let ToolError::Validation(message) = error else {
        panic!("expected validation error");
    };
    assert!(message.starts_with("Invalid arguments: files.1.file_path: "), "{message}");
}

#[test]
fn wide_integer_identifiers_forward_unchanged() {
    let widest = request(ToolName::GetProject, json!({ "project_id": u64::MAX }));
    assert_eq!(widest.path_string(), "/projects/18446744073709551615");
    let negative = request(ToolName::GetProject, json!({ "project_id": -7 }));
    assert_eq!(negative.path_string(), "/projects/-7");
}

#[test]
fn integral_floats_decode_as_integers() {
    let listing = request(
        ToolName::ListIssues,
        json!({ "project_id": 1.0, "page": 2.0, "per_page": 50.0 }),
    );
    assert_eq!(listing.path_string(), "/projects/1/issues");
    assert_eq!(listing.query_value("page"), Some("2"));
    assert_eq!(listing.query_value("per_page"), Some("50"));
}

#[test]
fn fractional_identifiers_are_rejected() {
    for value in [json!(1.5), json!(18_446_744_073_709_551_616.0_f64)] {
        let error = ToolRequest::decode(ToolName::GetProject, json!({ "project_id": value }))
            .unwrap_err();
        let ToolError::Validation(message) = error else {
            panic!("expected validation error");
        };
        assert!(message.starts_with("Invalid arguments: project_id: "), "{message}");
    }
}

// ============================================================================
// SECTION: Endpoint Mapping
// ============================================================================

#[test]
fn list_issues_carries_filters_and_pagination() {
    let request = request(
        ToolName::ListIssues,
        json!({
            "project_id": 5,
            "state": "opened",
            "labels": ["bug", "ui"],
            "created_after": "2024-01-01",
            "page": 2,
            "per_page": 50
        }),
    );
    assert_eq!(request.method, ApiMethod::Get);
    assert_eq!(request.path_string(), "/projects/5/issues");
    assert_eq!(request.query_value("state"), Some("opened"));
    assert_eq!(request.query_value("labels"), Some("bug,ui"));
    assert_eq!(request.query_value("created_after"), Some("2024-01-01"));
    assert_eq!(request.query_value("page"), Some("2"));
    assert_eq!(request.query_value("per_page"), Some("50"));
}

#[test]
fn get_file_contents_defaults_the_ref() {
    let request = request(
        ToolName::GetFileContents,
        json!({ "project_id": 1, "file_path": "src/main.rs" }),
    );
    assert_eq!(request.path_string(), "/projects/1/repository/files/src/main.rs");
    assert_eq!(request.path.len(), 5);
    assert_eq!(request.query_value("ref"), Some("HEAD"));
}

#[test]
fn draft_merge_requests_get_a_title_prefix_once() {
    let fresh = request(
        ToolName::CreateMergeRequest,
        json!({
            "project_id": 1,
            "title": "Add cache",
            "source_branch": "feature",
            "target_branch": "main",
            "draft": true
        }),
    );
    assert_eq!(fresh.body.as_ref().unwrap()["title"], "Draft: Add cache");

    let marked = request(
        ToolName::CreateMergeRequest,
        json!({
            "project_id": 1,
            "title": "Draft: Add cache",
            "source_branch": "feature",
            "target_branch": "main",
            "draft": true
        }),
    );
    assert_eq!(marked.body.as_ref().unwrap()["title"], "Draft: Add cache");
}

#[test]
fn pipeline_jobs_scope_uses_array_query() {
    let request = request(
        ToolName::ListPipelineJobs,
        json!({ "project_id": 3, "pipeline_id": 9, "scope": ["failed", "success"] }),
    );
    assert_eq!(request.path_string(), "/projects/3/pipelines/9/jobs");
    let scopes: Vec<&str> = request
        .query
        .iter()
        .filter(|(key, _)| key == "scope[]")
        .map(|(_, value)| value.as_str())
        .collect();
    assert_eq!(scopes, vec!["failed", "success"]);
}

#[test]
fn create_pipeline_sends_variables() {
    let request = request(
        ToolName::CreatePipeline,
        json!({
            "project_id": 3,
            "ref": "main",
            "variables": [{ "key": "MODE", "value": "fast" }]
        }),
    );
    assert_eq!(request.method, ApiMethod::Post);
    assert_eq!(request.path_string(), "/projects/3/pipeline");
    assert_eq!(
        request.body,
        Some(json!({ "ref": "main", "variables": [{ "key": "MODE", "value": "fast" }] }))
    );
}

#[test]
fn list_runners_picks_the_narrowest_scope() {
    let project = request(ToolName::ListRunners, json!({ "project_id": 1, "group_id": 2 }));
    let group = request(ToolName::ListRunners, json!({ "group_id": 2, "type": "group_type" }));
    let all = request(ToolName::ListRunners, json!({ "tag_list": ["linux", "docker"] }));
    assert_eq!(project.path_string(), "/projects/1/runners");
    assert_eq!(group.path_string(), "/groups/2/runners");
    assert_eq!(group.query_value("type"), Some("group_type"));
    assert_eq!(all.path_string(), "/runners");
    assert_eq!(all.query_value("tag_list"), Some("linux,docker"));
}

#[test]
fn group_wiki_tools_target_the_group() {
    let request = request(
        ToolName::GetGroupWikiPage,
        json!({ "group_id": "platform", "slug": "home" }),
    );
    assert_eq!(request.path_string(), "/groups/platform/wikis/home");
}

// ============================================================================
// SECTION: Multi-Call and Upload Plans
// ============================================================================

#[test]
fn push_files_keeps_input_order() {
    let plan = plan(
        ToolName::PushFiles,
        json!({
            "project_id": "team/app",
            "branch": "main",
            "commit_message": "sync",
            "files": [
                { "file_path": "a.txt", "content": "A" },
                { "file_path": "b.txt", "content": "B" },
                { "file_path": "c.txt", "content": "C" }
            ]
        }),
    );
    let DispatchPlan::PushFiles(writes) = plan else {
        panic!("expected push plan");
    };
    let paths: Vec<&str> = writes.iter().map(|write| write.file_path.as_str()).collect();
    assert_eq!(paths, vec!["a.txt", "b.txt", "c.txt"]);
    assert!(writes.iter().all(|write| write.project_id == "team/app" && write.branch == "main"));
}

#[test]
fn wiki_attachment_decodes_base64() {
    let plan = plan(
        ToolName::UploadProjectWikiAttachment,
        json!({ "project_id": 4, "file_name": "a.txt", "content": "aGVsbG8=" }),
    );
    let DispatchPlan::Upload(upload) = plan else {
        panic!("expected upload plan");
    };
    assert_eq!(upload.content, b"hello".to_vec());
    assert_eq!(upload.path.join("/"), "projects/4/wikis/attachments");
}

#[test]
fn wiki_attachment_rejects_bad_base64() {
    let error = ToolRequest::decode(
        ToolName::UploadGroupWikiAttachment,
        json!({ "group_id": 4, "file_name": "a.txt", "content": "***" }),
    )
    .expect("decode")
    .plan()
    .unwrap_err();
    match error {
        ToolError::Validation(message) => assert!(message.contains("content: not valid base64")),
        other => panic!("unexpected error {other}"),
    }
}

// ============================================================================
// SECTION: Derivations
// ============================================================================

#[test]
fn runner_tag_report_lists_missing_tags() {
    let report = Derivation::RunnerTags {
        required: vec!["docker".to_string(), "gpu".to_string()],
    }
    .apply(json!({ "id": 11, "tag_list": ["docker", "linux"], "run_untagged": false }));
    assert_eq!(report["runner_id"], 11);
    assert_eq!(report["missing_tags"], json!(["gpu"]));
    assert_eq!(report["compatible"], false);
}

#[test]
fn runner_health_flags_offline_and_paused() {
    let report = Derivation::RunnerHealth
        .apply(json!({ "id": 3, "status": "offline", "online": false, "paused": true }));
    assert_eq!(report["healthy"], false);
    assert_eq!(report["issues"], json!(["runner is offline", "runner is paused"]));

    let healthy = Derivation::RunnerHealth.apply(json!({ "id": 3, "status": "online" }));
    assert_eq!(healthy["healthy"], true);
    assert_eq!(healthy["online"], true);
}

#[test]
fn acknowledge_replaces_only_empty_results() {
    let derive = || Derivation::Acknowledge {
        status: "deleted",
        subject: vec![("slug", "home".to_string())],
    };
    assert_eq!(derive().apply(Value::Null), json!({ "status": "deleted", "slug": "home" }));
    assert_eq!(derive().apply(json!({ "ok": true })), json!({ "ok": true }));
}

#[test]
fn disable_project_runner_is_acknowledged() {
    let plan = plan(ToolName::DisableProjectRunner, json!({ "project_id": 2, "runner_id": 8 }));
    let DispatchPlan::Derived {
        request,
        derive,
    } = plan
    else {
        panic!("expected derived plan");
    };
    assert_eq!(request.method, ApiMethod::Delete);
    assert_eq!(request.path_string(), "/projects/2/runners/8");
    assert_eq!(
        derive.apply(Value::Null),
        json!({ "status": "disabled", "project_id": "2", "runner_id": "8" })
    );
}
