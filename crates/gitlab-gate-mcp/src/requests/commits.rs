// crates/gitlab-gate-mcp/src/requests/commits.rs
// ============================================================================
// Module: Commit and Event Requests
// Description: Commit history and project activity tool arguments.
// Purpose: Plan commit and event backend calls.
// Dependencies: gitlab-gate-client, serde
// ============================================================================

use gitlab_gate_client::ApiRequest;
use serde::Deserialize;

use super::DispatchPlan;
use super::Identifier;
use super::Operation;
use super::Pagination;
use super::project_path;
use crate::tools::ToolError;

/// `list_commits` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ListCommits {
    /// Target project.
    pub project_id: Identifier,
    /// Branch, tag, or range.
    pub ref_name: Option<String>,
    /// Only commits touching this path.
    pub path: Option<String>,
    /// Lower time bound.
    pub since: Option<String>,
    /// Upper time bound.
    pub until: Option<String>,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl Operation for ListCommits {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::get(project_path(&self.project_id, &["repository", "commits"]))
            .query_opt("ref_name", self.ref_name)
            .query_opt("path", self.path)
            .query_opt("since", self.since)
            .query_opt("until", self.until);
        Ok(DispatchPlan::Request(self.pagination.apply(request)))
    }
}

/// `get_commit` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct GetCommit {
    /// Target project.
    pub project_id: Identifier,
    /// Commit hash or ref.
    pub sha: String,
}

impl Operation for GetCommit {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let path = project_path(&self.project_id, &["repository", "commits", self.sha.as_str()]);
        Ok(DispatchPlan::Request(ApiRequest::get(path)))
    }
}

/// `list_project_events` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ListProjectEvents {
    /// Target project.
    pub project_id: Identifier,
    /// Action type filter.
    pub action: Option<String>,
    /// Target type filter.
    pub target_type: Option<String>,
    /// `asc` or `desc`.
    pub sort: Option<String>,
    /// Lower date bound.
    pub after: Option<String>,
    /// Upper date bound.
    pub before: Option<String>,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl Operation for ListProjectEvents {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::get(project_path(&self.project_id, &["events"]))
            .query_opt("action", self.action)
            .query_opt("target_type", self.target_type)
            .query_opt("sort", self.sort)
            .query_opt("after", self.after)
            .query_opt("before", self.before);
        Ok(DispatchPlan::Request(self.pagination.apply(request)))
    }
}
