// crates/gitlab-gate-mcp/src/requests.rs
// ============================================================================
// Module: Typed Tool Requests
// Description: Validated argument records and their backend dispatch plans.
// Purpose: Map each tool to exactly one backend plan without I/O.
// Dependencies: gitlab-gate-client, gitlab-gate-contract, serde, serde_json
// ============================================================================

//! ## Overview
//! [`ToolRequest`] has one variant per catalog entry. It is decoded only
//! after both validation stages pass, and planning it yields a
//! [`DispatchPlan`]: plain data describing the backend calls to make. The
//! router executes the plan; nothing in this module performs I/O.
//!
//! Identifiers are opaque. A project may be `42` or `group/app`; either is
//! forwarded unchanged as one path segment.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod commits;
pub mod issues;
pub mod members;
pub mod merge_requests;
pub mod pipelines;
pub mod projects;
pub mod repository;
pub mod runners;
pub mod wiki;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use gitlab_gate_client::ApiRequest;
use gitlab_gate_client::FileWrite;
use gitlab_gate_client::UploadRequest;
use gitlab_gate_contract::ToolName;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;
use serde_json::json;
use serde_path_to_error::Segment;

use crate::tools::ToolError;
use crate::validation::ROOT_PATH;

// ============================================================================
// SECTION: Shared Argument Types
// ============================================================================

/// Opaque resource identifier: numeric id or URL-style path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Numeric id, kept exactly as supplied.
    #[serde(deserialize_with = "integer_number")]
    Number(Number),
    /// Path such as `group/project`.
    Path(String),
}

impl Identifier {
    /// Returns the raw path segment.
    #[must_use]
    pub fn segment(&self) -> String {
        self.to_string()
    }
}

/// Accepts a JSON number only when it is a 64-bit integer.
fn integer_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Number, D::Error> {
    let number = Number::deserialize(deserializer)?;
    if number.is_f64() {
        return Err(de::Error::custom("identifier must be a 64-bit integer"));
    }
    Ok(number)
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Path(path) => f.write_str(path),
        }
    }
}

/// `page` / `per_page` arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Results per page.
    pub per_page: Option<u32>,
}

impl Pagination {
    /// Appends the pagination query pairs.
    #[must_use]
    pub fn apply(self, request: ApiRequest) -> ApiRequest {
        request.query_opt("page", self.page).query_opt("per_page", self.per_page)
    }
}

/// JSON body builder that skips absent fields.
#[derive(Debug, Default)]
pub struct Body(Map<String, Value>);

impl Body {
    /// Starts an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field.
    #[must_use]
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    /// Sets a field when the value is present.
    #[must_use]
    pub fn set_opt<T: Into<Value>>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.set(name, value),
            None => self,
        }
    }

    /// Finishes the body.
    #[must_use]
    pub fn build(self) -> Value {
        Value::Object(self.0)
    }
}

// ============================================================================
// SECTION: Dispatch Plans
// ============================================================================

/// Backend work for one validated tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchPlan {
    /// One REST call.
    Request(ApiRequest),
    /// One create-or-update of a repository file.
    WriteFile(FileWrite),
    /// Ordered file writes; the first failure aborts the rest.
    PushFiles(Vec<FileWrite>),
    /// One multipart upload.
    Upload(UploadRequest),
    /// One REST call whose result is reshaped locally.
    Derived {
        /// Backend call.
        request: ApiRequest,
        /// Local transform applied to the result.
        derive: Derivation,
    },
}

/// Pure transforms applied to a backend result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    /// Compare a runner's tags with the tags a job requires.
    RunnerTags {
        /// Tags the job requires.
        required: Vec<String>,
    },
    /// Summarize a runner's availability.
    RunnerHealth,
    /// Replace an empty success body with a status record.
    Acknowledge {
        /// Status label, e.g. `deleted`.
        status: &'static str,
        /// Fields identifying what was acted on.
        subject: Vec<(&'static str, String)>,
    },
}

impl Derivation {
    /// Applies the transform.
    #[must_use]
    pub fn apply(self, result: Value) -> Value {
        match self {
            Self::RunnerTags {
                required,
            } => runner_tags(&required, &result),
            Self::RunnerHealth => runner_health(&result),
            Self::Acknowledge {
                status,
                subject,
            } => {
                if !result.is_null() {
                    return result;
                }
                let mut body = Body::new().set("status", status);
                for (name, value) in subject {
                    body = body.set(name, value);
                }
                body.build()
            }
        }
    }
}

/// Tag compatibility report for a runner record.
fn runner_tags(required: &[String], runner: &Value) -> Value {
    let runner_tags: BTreeSet<&str> = runner
        .get("tag_list")
        .and_then(Value::as_array)
        .map(|tags| tags.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    let missing: Vec<&str> = required
        .iter()
        .map(String::as_str)
        .filter(|tag| !runner_tags.contains(tag))
        .collect();
    json!({
        "runner_id": runner.get("id").cloned().unwrap_or(Value::Null),
        "required_tags": required,
        "runner_tags": runner_tags,
        "missing_tags": missing,
        "run_untagged": runner.get("run_untagged").cloned().unwrap_or(Value::Null),
        "compatible": missing.is_empty()
    })
}

/// Availability summary for a runner record.
fn runner_health(runner: &Value) -> Value {
    let status = runner.get("status").and_then(Value::as_str).unwrap_or("unknown");
    let online =
        runner.get("online").and_then(Value::as_bool).unwrap_or(status == "online");
    let paused = runner
        .get("paused")
        .and_then(Value::as_bool)
        .or_else(|| runner.get("active").and_then(Value::as_bool).map(|active| !active))
        .unwrap_or(false);
    let mut issues = Vec::new();
    if !online {
        issues.push(format!("runner is {status}"));
    }
    if paused {
        issues.push("runner is paused".to_string());
    }
    json!({
        "runner_id": runner.get("id").cloned().unwrap_or(Value::Null),
        "description": runner.get("description").cloned().unwrap_or(Value::Null),
        "status": status,
        "online": online,
        "paused": paused,
        "contacted_at": runner.get("contacted_at").cloned().unwrap_or(Value::Null),
        "healthy": issues.is_empty(),
        "issues": issues
    })
}

/// Turns validated arguments into backend work.
pub trait Operation {
    /// Builds the dispatch plan.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Validation`] when an argument cannot be converted
    /// into its wire form.
    fn plan(self) -> Result<DispatchPlan, ToolError>;
}

// ============================================================================
// SECTION: Tool Requests
// ============================================================================

/// Declares [`ToolRequest`] with one variant per tool.
///
/// The `match` in `decode` is exhaustive over [`ToolName`], so a tool cannot
/// be registered without a dispatch target.
macro_rules! tool_requests {
    ($($variant:ident($args:ty),)+) => {
        /// Validated arguments for one tool call.
        #[derive(Debug, Clone)]
        pub enum ToolRequest {
            $(
                #[doc = concat!("Arguments for `", stringify!($variant), "`.")]
                $variant($args),
            )+
        }

        impl ToolRequest {
            /// Decodes validated arguments for `tool`.
            ///
            /// # Errors
            ///
            /// Returns [`ToolError::Validation`] when the arguments do not fit
            /// the typed record.
            pub fn decode(tool: ToolName, arguments: Value) -> Result<Self, ToolError> {
                match tool {
                    $(ToolName::$variant => decode(arguments).map(Self::$variant),)+
                }
            }

            /// Returns the tool this request belongs to.
            #[must_use]
            pub const fn tool(&self) -> ToolName {
                match self {
                    $(Self::$variant(_) => ToolName::$variant,)+
                }
            }

            /// Builds the dispatch plan.
            ///
            /// # Errors
            ///
            /// Returns [`ToolError::Validation`] when an argument cannot be
            /// converted into its wire form.
            pub fn plan(self) -> Result<DispatchPlan, ToolError> {
                match self {
                    $(Self::$variant(args) => args.plan(),)+
                }
            }
        }
    };
}

tool_requests! {
    CreateOrUpdateFile(repository::CreateOrUpdateFile),
    SearchRepositories(repository::SearchRepositories),
    CreateRepository(repository::CreateRepository),
    GetFileContents(repository::GetFileContents),
    PushFiles(repository::PushFiles),
    CreateBranch(repository::CreateBranch),
    ForkRepository(repository::ForkRepository),
    GetRepositoryTree(repository::GetRepositoryTree),
    CreateIssue(issues::CreateIssue),
    ListIssues(issues::ListIssues),
    GetIssue(issues::GetIssue),
    UpdateIssue(issues::UpdateIssue),
    CreateIssueNote(issues::CreateIssueNote),
    ListIssueNotes(issues::ListIssueNotes),
    ListIssueDiscussions(issues::ListIssueDiscussions),
    CreateMergeRequest(merge_requests::CreateMergeRequest),
    ListMergeRequests(merge_requests::ListMergeRequests),
    GetMergeRequest(merge_requests::GetMergeRequest),
    GetMergeRequestDiffs(merge_requests::GetMergeRequestDiffs),
    UpdateMergeRequest(merge_requests::UpdateMergeRequest),
    ListCommits(commits::ListCommits),
    GetCommit(commits::GetCommit),
    ListProjectEvents(commits::ListProjectEvents),
    ListProjectWikiPages(wiki::ProjectWiki<wiki::ListPages>),
    GetProjectWikiPage(wiki::ProjectWiki<wiki::GetPage>),
    CreateProjectWikiPage(wiki::ProjectWiki<wiki::CreatePage>),
    UpdateProjectWikiPage(wiki::ProjectWiki<wiki::UpdatePage>),
    DeleteProjectWikiPage(wiki::ProjectWiki<wiki::DeletePage>),
    UploadProjectWikiAttachment(wiki::ProjectWiki<wiki::UploadAttachment>),
    ListGroupWikiPages(wiki::GroupWiki<wiki::ListPages>),
    GetGroupWikiPage(wiki::GroupWiki<wiki::GetPage>),
    CreateGroupWikiPage(wiki::GroupWiki<wiki::CreatePage>),
    UpdateGroupWikiPage(wiki::GroupWiki<wiki::UpdatePage>),
    DeleteGroupWikiPage(wiki::GroupWiki<wiki::DeletePage>),
    UploadGroupWikiAttachment(wiki::GroupWiki<wiki::UploadAttachment>),
    ListProjectMembers(members::ListProjectMembers),
    ListGroupMembers(members::ListGroupMembers),
    ListPipelines(pipelines::ListPipelines),
    GetPipeline(pipelines::GetPipeline),
    CreatePipeline(pipelines::CreatePipeline),
    RetryPipeline(pipelines::RetryPipeline),
    CancelPipeline(pipelines::CancelPipeline),
    ListPipelineJobs(pipelines::ListPipelineJobs),
    GetJob(pipelines::GetJob),
    RetryJob(pipelines::RetryJob),
    CancelJob(pipelines::CancelJob),
    ListProjects(projects::ListProjects),
    GetProject(projects::GetProject),
    ListGroupProjects(projects::ListGroupProjects),
    ValidateCiConfig(projects::ValidateCiConfig),
    ListRunners(runners::ListRunners),
    GetRunner(runners::GetRunner),
    EnableProjectRunner(runners::EnableProjectRunner),
    DisableProjectRunner(runners::DisableProjectRunner),
    RegisterRunner(runners::RegisterRunner),
    ValidateRunnerTags(runners::ValidateRunnerTags),
    UpdateRunner(runners::UpdateRunner),
    ListRunnerJobs(runners::ListRunnerJobs),
    CheckRunnerHealth(runners::CheckRunnerHealth),
}

/// Decodes a validated argument object.
///
/// Integral floats such as `2.0` satisfy `"type": "integer"`, so they are
/// rewritten as integers first. Failures name the offending field.
fn decode<T: DeserializeOwned>(mut arguments: Value) -> Result<T, ToolError> {
    normalize_integers(&mut arguments);
    serde_path_to_error::deserialize(arguments).map_err(|err| {
        let path = decode_path(err.path());
        ToolError::Validation(format!("Invalid arguments: {path}: {}", err.inner()))
    })
}

/// Renders a decode error path in the dotted form used for schema violations.
fn decode_path(path: &serde_path_to_error::Path) -> String {
    let segments: Vec<String> = path
        .iter()
        .map(|segment| match segment {
            Segment::Seq {
                index,
            } => index.to_string(),
            Segment::Map {
                key,
            } => key.clone(),
            Segment::Enum {
                variant,
            } => variant.clone(),
            Segment::Unknown => "?".to_string(),
        })
        .collect();
    if segments.is_empty() { ROOT_PATH.to_string() } else { segments.join(".") }
}

/// Rewrites every integral float in place as an integer.
fn normalize_integers(value: &mut Value) {
    match value {
        Value::Number(number) => {
            if let Some(integer) = integral(number) {
                *number = integer;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_integers),
        Value::Object(fields) => fields.values_mut().for_each(normalize_integers),
        Value::Null | Value::Bool(_) | Value::String(_) => {}
    }
}

/// Returns the integer form of an integral float within `i64`/`u64` range.
fn integral(number: &Number) -> Option<Number> {
    let float = number.as_f64().filter(|_| number.is_f64())?;
    if float.fract().abs() > 0.0 {
        return None;
    }
    format!("{float:.0}").parse::<Number>().ok().filter(|parsed| !parsed.is_f64())
}

/// Builds `<root>/<id>/<rest...>` path segments.
fn scoped_path(root: &str, id: &Identifier, rest: &[&str]) -> Vec<String> {
    let mut path = vec![root.to_string(), id.segment()];
    path.extend(rest.iter().map(|segment| (*segment).to_string()));
    path
}

/// Builds `projects/<id>/<rest...>` path segments.
fn project_path(id: &Identifier, rest: &[&str]) -> Vec<String> {
    scoped_path("projects", id, rest)
}

/// Joins list values with commas, the form GitLab expects for label sets.
fn comma_joined(values: Option<Vec<String>>) -> Option<String> {
    values.map(|values| values.join(","))
}

#[cfg(test)]
mod tests;
