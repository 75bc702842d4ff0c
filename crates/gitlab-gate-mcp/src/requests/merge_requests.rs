// crates/gitlab-gate-mcp/src/requests/merge_requests.rs
// ============================================================================
// Module: Merge Request Requests
// Description: Merge request tool arguments.
// Purpose: Plan merge request backend calls.
// Dependencies: gitlab-gate-client, serde
// ============================================================================

use gitlab_gate_client::ApiRequest;
use serde::Deserialize;

use super::Body;
use super::DispatchPlan;
use super::Identifier;
use super::Operation;
use super::Pagination;
use super::comma_joined;
use super::project_path;
use crate::tools::ToolError;

/// Title prefix GitLab uses to mark a merge request as draft.
const DRAFT_PREFIX: &str = "Draft: ";

/// `create_merge_request` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMergeRequest {
    /// Target project.
    pub project_id: Identifier,
    /// Title.
    pub title: String,
    /// Branch with the changes.
    pub source_branch: String,
    /// Branch to merge into.
    pub target_branch: String,
    /// Description.
    pub description: Option<String>,
    /// Open as a draft.
    pub draft: Option<bool>,
    /// Delete the source branch on merge.
    pub remove_source_branch: Option<bool>,
    /// Labels to apply.
    pub labels: Option<Vec<String>>,
}

impl Operation for CreateMergeRequest {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let title = if self.draft == Some(true) && !is_draft_title(&self.title) {
            format!("{DRAFT_PREFIX}{}", self.title)
        } else {
            self.title
        };
        let body = Body::new()
            .set("title", title)
            .set("source_branch", self.source_branch)
            .set("target_branch", self.target_branch)
            .set_opt("description", self.description)
            .set_opt("remove_source_branch", self.remove_source_branch)
            .set_opt("labels", comma_joined(self.labels))
            .build();
        let request =
            ApiRequest::post(project_path(&self.project_id, &["merge_requests"])).json(body);
        Ok(DispatchPlan::Request(request))
    }
}

/// Returns true when the title already carries a draft marker.
fn is_draft_title(title: &str) -> bool {
    let lower = title.trim_start().to_ascii_lowercase();
    ["draft:", "[draft]", "(draft)"].iter().any(|marker| lower.starts_with(marker))
}

/// `list_merge_requests` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ListMergeRequests {
    /// Target project.
    pub project_id: Identifier,
    /// Merge request state.
    pub state: Option<String>,
    /// Required labels.
    pub labels: Option<Vec<String>>,
    /// Source branch filter.
    pub source_branch: Option<String>,
    /// Target branch filter.
    pub target_branch: Option<String>,
    /// Title and description search.
    pub search: Option<String>,
    /// Created on or after.
    pub created_after: Option<String>,
    /// Created on or before.
    pub created_before: Option<String>,
    /// Updated on or after.
    pub updated_after: Option<String>,
    /// Updated on or before.
    pub updated_before: Option<String>,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl Operation for ListMergeRequests {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::get(project_path(&self.project_id, &["merge_requests"]))
            .query_opt("state", self.state)
            .query_joined("labels", self.labels.as_deref())
            .query_opt("source_branch", self.source_branch)
            .query_opt("target_branch", self.target_branch)
            .query_opt("search", self.search)
            .query_opt("created_after", self.created_after)
            .query_opt("created_before", self.created_before)
            .query_opt("updated_after", self.updated_after)
            .query_opt("updated_before", self.updated_before);
        Ok(DispatchPlan::Request(self.pagination.apply(request)))
    }
}

/// `get_merge_request` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct GetMergeRequest {
    /// Target project.
    pub project_id: Identifier,
    /// Project-scoped merge request number.
    pub merge_request_iid: u64,
}

impl Operation for GetMergeRequest {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let iid = self.merge_request_iid.to_string();
        let path = project_path(&self.project_id, &["merge_requests", iid.as_str()]);
        Ok(DispatchPlan::Request(ApiRequest::get(path)))
    }
}

/// `get_merge_request_diffs` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct GetMergeRequestDiffs {
    /// Target project.
    pub project_id: Identifier,
    /// Project-scoped merge request number.
    pub merge_request_iid: u64,
}

impl Operation for GetMergeRequestDiffs {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let iid = self.merge_request_iid.to_string();
        let path = project_path(&self.project_id, &["merge_requests", iid.as_str(), "diffs"]);
        Ok(DispatchPlan::Request(ApiRequest::get(path)))
    }
}

/// `update_merge_request` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMergeRequest {
    /// Target project.
    pub project_id: Identifier,
    /// Project-scoped merge request number.
    pub merge_request_iid: u64,
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New target branch.
    pub target_branch: Option<String>,
    /// Replacement labels.
    pub labels: Option<Vec<String>>,
    /// `close` or `reopen`.
    pub state_event: Option<String>,
}

impl Operation for UpdateMergeRequest {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let body = Body::new()
            .set_opt("title", self.title)
            .set_opt("description", self.description)
            .set_opt("target_branch", self.target_branch)
            .set_opt("labels", comma_joined(self.labels))
            .set_opt("state_event", self.state_event)
            .build();
        let iid = self.merge_request_iid.to_string();
        let path = project_path(&self.project_id, &["merge_requests", iid.as_str()]);
        Ok(DispatchPlan::Request(ApiRequest::put(path).json(body)))
    }
}
