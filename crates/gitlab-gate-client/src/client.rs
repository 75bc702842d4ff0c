// crates/gitlab-gate-client/src/client.rs
// ============================================================================
// Module: GitLab REST Client
// Description: reqwest-backed implementation of the GitLab backend.
// Purpose: Authenticated, size-limited HTTP access to the GitLab REST API.
// Dependencies: reqwest, serde_json, url, gitlab-gate-config
// ============================================================================

//! ## Overview
//! [`GitlabClient`] turns [`ApiRequest`] values into HTTP calls against the
//! configured API base URL. Every path segment is percent-encoded on its own,
//! responses are read under a hard byte limit, and non-success statuses are
//! mapped to [`BackendError::Http`] with GitLab's own message.
//!
//! Security posture: the access token is held as a sensitive header value and
//! redacted from `Debug` output. Redirects are never followed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use gitlab_gate_config::GitlabConfig;
use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use reqwest::StatusCode;
use reqwest::header::HeaderValue;
use reqwest::multipart::Form;
use reqwest::multipart::Part;
use reqwest::redirect::Policy;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::backend::BackendError;
use crate::backend::GitlabBackend;
use crate::request::ApiMethod;
use crate::request::ApiRequest;
use crate::request::FileWrite;
use crate::request::UploadRequest;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the personal access token.
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";
/// Maximum characters of a non-JSON error body echoed back to callers.
const MAX_ERROR_PREVIEW_CHARS: usize = 512;

// ============================================================================
// SECTION: Client
// ============================================================================

/// GitLab REST client.
///
/// # Invariants
/// - `base_url` can be a base (has a hierarchical path).
/// - `token` is marked sensitive.
#[derive(Clone)]
pub struct GitlabClient {
    /// Shared HTTP client.
    http: Client,
    /// API base URL, e.g. `https://gitlab.com/api/v4`.
    base_url: Url,
    /// Access token header value.
    token: HeaderValue,
    /// Maximum accepted response size in bytes.
    max_response_bytes: usize,
}

impl fmt::Debug for GitlabClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitlabClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .field("max_response_bytes", &self.max_response_bytes)
            .finish_non_exhaustive()
    }
}

impl GitlabClient {
    /// Builds a client from configuration, reading the token from the
    /// environment variable named by `token_env`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] when the token is missing or the
    /// configuration is unusable.
    pub fn from_config(config: &GitlabConfig) -> Result<Self, BackendError> {
        let token = config.access_token().map_err(|err| BackendError::Config(err.to_string()))?;
        Self::new(config, &token)
    }

    /// Builds a client with an explicit token.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the URL or token is invalid or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &GitlabConfig, token: &str) -> Result<Self, BackendError> {
        let base_url = Url::parse(config.api_url.trim())
            .map_err(|err| BackendError::Config(format!("invalid api_url: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::Config("api_url cannot be a base url".to_string()));
        }
        let mut token = HeaderValue::from_str(token)
            .map_err(|_| BackendError::Config("access token is not a valid header".to_string()))?;
        token.set_sensitive(true);
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(Policy::none())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            base_url,
            token,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Builds the full URL for raw path segments and query pairs.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] when the base URL cannot take segments.
    pub fn url(&self, path: &[String], query: &[(String, String)]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::Config("api_url cannot be a base url".to_string()))?
            .pop_if_empty()
            .extend(path);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Sends an authenticated request and decodes the JSON response.
    async fn send(&self, builder: RequestBuilder) -> Result<Value, BackendError> {
        let response = builder
            .header(TOKEN_HEADER, self.token.clone())
            .send()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        let status = response.status();
        let body = read_response_body_with_limit(response, self.max_response_bytes).await?;
        if !status.is_success() {
            return Err(http_error(status, &body));
        }
        decode_body(&body)
    }

    /// Returns true when the file exists on the branch.
    async fn file_exists(&self, write: &FileWrite) -> Result<bool, BackendError> {
        let url = self.url(
            &file_path(write),
            &[("ref".to_string(), write.branch.clone())],
        )?;
        let response = self
            .http
            .head(url)
            .header(TOKEN_HEADER, self.token.clone())
            .send()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(http_error(status, &[])),
        }
    }
}

#[async_trait]
impl GitlabBackend for GitlabClient {
    async fn execute(&self, request: ApiRequest) -> Result<Value, BackendError> {
        let url = self.url(&request.path, &request.query)?;
        let mut builder = self.http.request(method(request.method), url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        self.send(builder).await
    }

    async fn write_file(&self, write: FileWrite) -> Result<Value, BackendError> {
        let verb = if self.file_exists(&write).await? { Method::PUT } else { Method::POST };
        let url = self.url(&file_path(&write), &[])?;
        let body = FileWriteBody {
            branch: &write.branch,
            content: &write.content,
            commit_message: &write.commit_message,
            encoding: write.encoding.as_deref(),
            last_commit_id: write.last_commit_id.as_deref(),
        };
        self.send(self.http.request(verb, url).json(&body)).await
    }

    async fn upload(&self, upload: UploadRequest) -> Result<Value, BackendError> {
        let url = self.url(&upload.path, &[])?;
        let part = Part::bytes(upload.content).file_name(upload.file_name);
        let mut form = Form::new().part("file", part);
        if let Some(branch) = upload.branch {
            form = form.text("branch", branch);
        }
        self.send(self.http.post(url).multipart(form)).await
    }
}

/// JSON body of a repository file write.
#[derive(Debug, Serialize)]
struct FileWriteBody<'a> {
    /// Target branch.
    branch: &'a str,
    /// New content.
    content: &'a str,
    /// Commit message.
    commit_message: &'a str,
    /// Content encoding.
    #[serde(skip_serializing_if = "Option::is_none")]
    encoding: Option<&'a str>,
    /// Expected last commit id.
    #[serde(skip_serializing_if = "Option::is_none")]
    last_commit_id: Option<&'a str>,
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps the request method onto reqwest.
const fn method(method: ApiMethod) -> Method {
    match method {
        ApiMethod::Get => Method::GET,
        ApiMethod::Post => Method::POST,
        ApiMethod::Put => Method::PUT,
        ApiMethod::Delete => Method::DELETE,
    }
}

/// Raw path segments of a repository file.
fn file_path(write: &FileWrite) -> Vec<String> {
    vec![
        "projects".to_string(),
        write.project_id.clone(),
        "repository".to_string(),
        "files".to_string(),
        write.file_path.clone(),
    ]
}

/// Reads a response body while enforcing a hard byte limit.
async fn read_response_body_with_limit(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, BackendError> {
    let mut body = Vec::new();
    while let Some(chunk) =
        response.chunk().await.map_err(|err| BackendError::Transport(err.to_string()))?
    {
        let next_total = body
            .len()
            .checked_add(chunk.len())
            .ok_or(BackendError::ResponseTooLarge { limit })?;
        if next_total > limit {
            return Err(BackendError::ResponseTooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Decodes a success body; empty bodies become `null`.
fn decode_body(body: &[u8]) -> Result<Value, BackendError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|err| BackendError::Decode(err.to_string()))
}

/// Builds an HTTP error from a non-success response.
///
/// GitLab reports failures as `{"message": ...}` or `{"error": ...}`; the
/// message may itself be an object of field errors.
fn http_error(status: StatusCode, body: &[u8]) -> BackendError {
    let from_json = serde_json::from_slice::<Value>(body).ok().and_then(|value| {
        let field = value.get("message").or_else(|| value.get("error"))?;
        Some(field.as_str().map_or_else(|| field.to_string(), str::to_string))
    });
    let message = from_json.unwrap_or_else(|| {
        let text = String::from_utf8_lossy(body);
        let preview: String = text.trim().chars().take(MAX_ERROR_PREVIEW_CHARS).collect();
        if preview.is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            preview
        }
    });
    BackendError::Http {
        status: status.as_u16(),
        message,
    }
}
