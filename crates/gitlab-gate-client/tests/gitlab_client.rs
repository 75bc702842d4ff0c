// crates/gitlab-gate-client/tests/gitlab_client.rs
// ============================================================================
// Module: GitLab Client Integration Tests
// Description: Exercises the reqwest client against a local mock GitLab.
// Purpose: Verify URL encoding, auth header, upsert probing, and limits.
// Dependencies: gitlab-gate-client, tiny_http, tokio
// ============================================================================

//! ## Overview
//! Each test starts a `tiny_http` server on a loopback port, answers a fixed
//! script of responses, and records what the client sent.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::io::Read;
use std::sync::mpsc;
use std::thread;

use gitlab_gate_client::ApiRequest;
use gitlab_gate_client::BackendError;
use gitlab_gate_client::FileWrite;
use gitlab_gate_client::GitlabBackend;
use gitlab_gate_client::GitlabClient;
use gitlab_gate_client::UploadRequest;
use gitlab_gate_config::GitlabConfig;
use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Mock Server
// ============================================================================

/// Request observed by the mock server.
#[derive(Debug)]
struct Seen {
    method: String,
    url: String,
    token: Option<String>,
    content_type: Option<String>,
    body: Vec<u8>,
}

/// Scripted response.
struct Scripted {
    status: u16,
    body: String,
}

fn reply(status: u16, body: &str) -> Scripted {
    Scripted {
        status,
        body: body.to_string(),
    }
}

/// Starts a server answering `script` in order; returns base URL and receiver.
fn mock_gitlab(script: Vec<Scripted>) -> (String, mpsc::Receiver<Seen>, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let (sender, receiver) = mpsc::channel();
    let handle = thread::spawn(move || {
        for scripted in script {
            let Ok(mut request) = server.recv() else {
                return;
            };
            let header = |name: &'static str| {
                request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv(name))
                    .map(|header| header.value.as_str().to_string())
            };
            let token = header("PRIVATE-TOKEN");
            let content_type = header("Content-Type");
            let mut body = Vec::new();
            request.as_reader().read_to_end(&mut body).unwrap();
            sender
                .send(Seen {
                    method: request.method().as_str().to_string(),
                    url: request.url().to_string(),
                    token,
                    content_type,
                    body,
                })
                .unwrap();
            let response = Response::from_string(scripted.body)
                .with_status_code(scripted.status)
                .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
            let _ = request.respond(response);
        }
    });
    (format!("http://{addr}/api/v4"), receiver, handle)
}

fn client_for(base: &str) -> GitlabClient {
    let config = GitlabConfig {
        api_url: base.to_string(),
        ..GitlabConfig::default()
    };
    GitlabClient::new(&config, "glpat-test").unwrap()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test]
async fn execute_encodes_identifiers_and_sends_token() {
    let (base, seen, handle) = mock_gitlab(vec![reply(200, r#"[{"iid":1}]"#)]);
    let client = client_for(&base);
    let request = ApiRequest::get(["projects", "group/app", "issues"])
        .query("state", "opened")
        .query("page", 2);

    let result = client.execute(request).await.unwrap();
    handle.join().unwrap();

    assert_eq!(result, json!([{ "iid": 1 }]));
    let seen = seen.recv().unwrap();
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.url, "/api/v4/projects/group%2Fapp/issues?state=opened&page=2");
    assert_eq!(seen.token.as_deref(), Some("glpat-test"));
}

#[tokio::test]
async fn execute_sends_json_body() {
    let (base, seen, handle) = mock_gitlab(vec![reply(201, r#"{"iid":7,"title":"Bug"}"#)]);
    let client = client_for(&base);
    let request = ApiRequest::post(["projects", "42", "issues"]).json(json!({ "title": "Bug" }));

    let result = client.execute(request).await.unwrap();
    handle.join().unwrap();

    assert_eq!(result["iid"], json!(7));
    let seen = seen.recv().unwrap();
    assert_eq!(seen.method, "POST");
    assert!(seen.content_type.unwrap().starts_with("application/json"));
    let body: Value = serde_json::from_slice(&seen.body).unwrap();
    assert_eq!(body, json!({ "title": "Bug" }));
}

#[tokio::test]
async fn non_success_status_carries_gitlab_message() {
    let (base, _seen, handle) = mock_gitlab(vec![reply(404, r#"{"message":"404 Not found"}"#)]);
    let client = client_for(&base);

    let error = client.execute(ApiRequest::get(["projects", "missing"])).await.unwrap_err();
    handle.join().unwrap();

    assert_eq!(
        error,
        BackendError::Http {
            status: 404,
            message: "404 Not found".to_string()
        }
    );
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let large = format!("\"{}\"", "x".repeat(4096));
    let (base, _seen, handle) = mock_gitlab(vec![reply(200, &large)]);
    let config = GitlabConfig {
        api_url: base,
        max_response_bytes: 1024,
        ..GitlabConfig::default()
    };
    let client = GitlabClient::new(&config, "glpat-test").unwrap();

    let error = client.execute(ApiRequest::get(["version"])).await.unwrap_err();
    handle.join().unwrap();

    assert_eq!(error, BackendError::ResponseTooLarge { limit: 1024 });
}

#[tokio::test]
async fn write_file_creates_when_lookup_misses() {
    let (base, seen, handle) = mock_gitlab(vec![
        reply(404, ""),
        reply(201, r#"{"file_path":"docs/a.md","branch":"main"}"#),
    ]);
    let client = client_for(&base);
    let write = FileWrite {
        project_id: "group/app".to_string(),
        file_path: "docs/a.md".to_string(),
        branch: "main".to_string(),
        content: "hello".to_string(),
        commit_message: "add a".to_string(),
        encoding: None,
        last_commit_id: None,
    };

    let result = client.write_file(write).await.unwrap();
    handle.join().unwrap();

    assert_eq!(result["file_path"], json!("docs/a.md"));
    let lookup = seen.recv().unwrap();
    assert_eq!(lookup.method, "HEAD");
    assert_eq!(lookup.url, "/api/v4/projects/group%2Fapp/repository/files/docs%2Fa.md?ref=main");
    let write = seen.recv().unwrap();
    assert_eq!(write.method, "POST");
    let body: Value = serde_json::from_slice(&write.body).unwrap();
    assert_eq!(
        body,
        json!({ "branch": "main", "content": "hello", "commit_message": "add a" })
    );
}

#[tokio::test]
async fn write_file_updates_when_lookup_hits() {
    let (base, seen, handle) =
        mock_gitlab(vec![reply(200, ""), reply(200, r#"{"file_path":"a.txt"}"#)]);
    let client = client_for(&base);
    let write = FileWrite {
        project_id: "9".to_string(),
        file_path: "a.txt".to_string(),
        branch: "dev".to_string(),
        content: "aGk=".to_string(),
        commit_message: "update".to_string(),
        encoding: Some("base64".to_string()),
        last_commit_id: None,
    };

    client.write_file(write).await.unwrap();
    handle.join().unwrap();

    let _lookup = seen.recv().unwrap();
    let write = seen.recv().unwrap();
    assert_eq!(write.method, "PUT");
    let body: Value = serde_json::from_slice(&write.body).unwrap();
    assert_eq!(body["encoding"], json!("base64"));
}

#[tokio::test]
async fn upload_sends_multipart_file() {
    let body = r#"{"file_name":"diagram.png","link":{"markdown":"![d](x)"}}"#;
    let (base, seen, handle) = mock_gitlab(vec![reply(201, body)]);
    let client = client_for(&base);
    let upload = UploadRequest {
        path: vec![
            "projects".to_string(),
            "5".to_string(),
            "wikis".to_string(),
            "attachments".to_string(),
        ],
        file_name: "diagram.png".to_string(),
        content: b"PNGDATA".to_vec(),
        branch: Some("main".to_string()),
    };

    let result = client.upload(upload).await.unwrap();
    handle.join().unwrap();

    assert_eq!(result["file_name"], json!("diagram.png"));
    let seen = seen.recv().unwrap();
    assert_eq!(seen.url, "/api/v4/projects/5/wikis/attachments");
    assert!(seen.content_type.unwrap().starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&seen.body);
    assert!(body.contains("filename=\"diagram.png\""));
    assert!(body.contains("PNGDATA"));
    assert!(body.contains("name=\"branch\""));
}

#[test]
fn invalid_base_url_is_config_error() {
    let config = GitlabConfig {
        api_url: "not a url".to_string(),
        ..GitlabConfig::default()
    };
    let error = GitlabClient::new(&config, "token").unwrap_err();
    assert!(matches!(error, BackendError::Config(_)));
}

#[test]
fn debug_output_redacts_token() {
    let client = client_for("https://gitlab.example.com/api/v4");
    let rendered = format!("{client:?}");
    assert!(!rendered.contains("glpat-test"));
    assert!(rendered.contains("<redacted>"));
}
