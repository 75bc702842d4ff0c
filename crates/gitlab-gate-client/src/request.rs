// crates/gitlab-gate-client/src/request.rs
// ============================================================================
// Module: GitLab Request Model
// Description: Transport-independent description of GitLab API calls.
// Purpose: Let dispatch plan backend calls as data before any I/O happens.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! An [`ApiRequest`] names a method, a list of raw path segments, query
//! pairs, and an optional JSON body. Path segments are kept unencoded here;
//! the client percent-encodes each one, so an identifier such as
//! `group/project` travels as a single segment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Types
// ============================================================================

/// HTTP methods used against the GitLab API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiMethod {
    /// Read.
    Get,
    /// Create or trigger.
    Post,
    /// Update.
    Put,
    /// Remove.
    Delete,
}

impl ApiMethod {
    /// Returns the method label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A single GitLab REST call.
///
/// # Invariants
/// - `path` holds raw, unencoded segments relative to the API base URL.
/// - `query` preserves insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: ApiMethod,
    /// Raw path segments.
    pub path: Vec<String>,
    /// Query string pairs.
    pub query: Vec<(String, String)>,
    /// Optional JSON body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Creates a request with no query or body.
    pub fn new<I, S>(method: ApiMethod, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            path: path.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    pub fn get<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ApiMethod::Get, path)
    }

    /// Creates a POST request.
    pub fn post<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ApiMethod::Post, path)
    }

    /// Creates a PUT request.
    pub fn put<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ApiMethod::Put, path)
    }

    /// Creates a DELETE request.
    pub fn delete<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ApiMethod::Delete, path)
    }

    /// Appends a query pair.
    #[must_use]
    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// Appends a query pair when a value is present.
    #[must_use]
    pub fn query_opt<T: ToString>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    /// Appends a comma-joined list when present and non-empty.
    #[must_use]
    pub fn query_joined(self, name: &str, values: Option<&[String]>) -> Self {
        match values {
            Some(values) if !values.is_empty() => self.query(name, values.join(",")),
            _ => self,
        }
    }

    /// Appends one `name[]` pair per value.
    #[must_use]
    pub fn query_array(mut self, name: &str, values: Option<&[String]>) -> Self {
        for value in values.unwrap_or_default() {
            self.query.push((format!("{name}[]"), value.clone()));
        }
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the unencoded path joined with `/`, for logs and tests.
    #[must_use]
    pub fn path_string(&self) -> String {
        format!("/{}", self.path.join("/"))
    }

    /// Returns the first query value for `name`.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }
}

/// Create-or-update of one repository file.
///
/// The client decides between create and update by probing the file on the
/// target branch; callers see a single backend call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileWrite {
    /// Project identifier (raw path segment).
    pub project_id: String,
    /// File path inside the repository.
    pub file_path: String,
    /// Target branch.
    pub branch: String,
    /// New content.
    pub content: String,
    /// Commit message.
    pub commit_message: String,
    /// Content encoding (`text` or `base64`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Expected last commit id, for conflict detection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit_id: Option<String>,
}

/// Multipart attachment upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Raw path segments of the upload endpoint.
    pub path: Vec<String>,
    /// File name reported to GitLab.
    pub file_name: String,
    /// Decoded file bytes.
    pub content: Vec<u8>,
    /// Optional target branch.
    pub branch: Option<String>,
}
