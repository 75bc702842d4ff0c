// crates/gitlab-gate-mcp/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Recording GitLab backend and router builders.
// Purpose: Let suites assert on backend side effects without a network.
// Dependencies: async-trait, gitlab-gate-client, gitlab-gate-contract, gitlab-gate-mcp
// ============================================================================

//! ## Overview
//! [`RecordingBackend`] logs every call in order and can be told to fail a
//! specific call, which is how partial-progress behavior is observed.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unwrap_in_result,
    reason = "Test fixtures favor direct unwraps for setup clarity."
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
use gitlab_gate_mcp::ToolRouter;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Recording Backend
// ============================================================================

/// One backend call as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// REST request, rendered as `METHOD /path`.
    Request(String),
    /// File write, by file path.
    Write(String),
    /// Attachment upload, by file name.
    Upload(String),
}

/// Backend that records calls and answers with canned values.
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
    fail_call: Option<usize>,
}

impl RecordingBackend {
    /// Backend where every call succeeds.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Backend whose `n`th call (1-based) fails with a 400.
    pub fn failing_call(n: usize) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_call: Some(n),
        })
    }

    /// Calls observed so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call, answer: Value) -> Result<Value, BackendError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        if self.fail_call == Some(calls.len()) {
            return Err(BackendError::Http {
                status: 400,
                message: "A file with this name doesn't exist".to_string(),
            });
        }
        Ok(answer)
    }
}

#[async_trait]
impl GitlabBackend for RecordingBackend {
    async fn execute(&self, request: ApiRequest) -> Result<Value, BackendError> {
        let call = Call::Request(format!("{} {}", request.method, request.path_string()));
        self.record(call, json!([]))
    }

    async fn write_file(&self, write: FileWrite) -> Result<Value, BackendError> {
        let answer = json!({ "file_path": write.file_path, "branch": write.branch });
        self.record(Call::Write(write.file_path), answer)
    }

    async fn upload(&self, upload: UploadRequest) -> Result<Value, BackendError> {
        let answer = json!({ "file_name": upload.file_name });
        self.record(Call::Upload(upload.file_name), answer)
    }
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Builds a router over the builtin catalog.
pub fn router(backend: &Arc<RecordingBackend>, read_only: bool) -> ToolRouter {
    let catalog = Arc::new(ToolCatalog::builtin().expect("builtin catalog"));
    let backend: Arc<dyn GitlabBackend> = Arc::clone(backend) as Arc<dyn GitlabBackend>;
    ToolRouter::new(catalog, backend, read_only).expect("router")
}
