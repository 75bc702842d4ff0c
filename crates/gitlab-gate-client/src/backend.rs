// crates/gitlab-gate-client/src/backend.rs
// ============================================================================
// Module: GitLab Backend Interface
// Description: Async trait for issuing GitLab API calls and its error type.
// Purpose: Seam between dispatch and the network, mockable in tests.
// Dependencies: async-trait, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`GitlabBackend`] is the only way the gateway reaches GitLab. Each method
//! is one logical backend call. Implementations own auth, timeouts, and
//! response size limits; callers never retry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::request::ApiRequest;
use crate::request::FileWrite;
use crate::request::UploadRequest;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Backend failures. The display text is surfaced to callers verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// GitLab answered with a non-success status.
    #[error("GitLab API error ({status}): {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },
    /// Network or protocol failure.
    #[error("GitLab transport error: {0}")]
    Transport(String),
    /// Response body was not valid JSON.
    #[error("GitLab response decode error: {0}")]
    Decode(String),
    /// Response body exceeded the configured limit.
    #[error("GitLab response exceeds size limit of {limit} bytes")]
    ResponseTooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },
    /// Client configuration problem.
    #[error("GitLab client config error: {0}")]
    Config(String),
}

// ============================================================================
// SECTION: Backend Trait
// ============================================================================

/// GitLab backend used by the dispatch router.
#[async_trait]
pub trait GitlabBackend: Send + Sync {
    /// Issues a single REST call and returns the decoded JSON body.
    ///
    /// Empty bodies decode to [`Value::Null`].
    async fn execute(&self, request: ApiRequest) -> Result<Value, BackendError>;

    /// Creates or updates one repository file.
    async fn write_file(&self, write: FileWrite) -> Result<Value, BackendError>;

    /// Uploads a multipart attachment.
    async fn upload(&self, upload: UploadRequest) -> Result<Value, BackendError>;
}
