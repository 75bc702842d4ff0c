// crates/gitlab-gate-mcp/src/requests/issues.rs
// ============================================================================
// Module: Issue Requests
// Description: Issue, note, and discussion tool arguments.
// Purpose: Plan issue backend calls.
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

/// `create_issue` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIssue {
    /// Target project.
    pub project_id: Identifier,
    /// Issue title.
    pub title: String,
    /// Issue description.
    pub description: Option<String>,
    /// Users to assign.
    pub assignee_ids: Option<Vec<u64>>,
    /// Labels to apply.
    pub labels: Option<Vec<String>>,
    /// Milestone id.
    pub milestone_id: Option<u64>,
}

impl Operation for CreateIssue {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let body = Body::new()
            .set("title", self.title)
            .set_opt("description", self.description)
            .set_opt("assignee_ids", self.assignee_ids)
            .set_opt("labels", comma_joined(self.labels))
            .set_opt("milestone_id", self.milestone_id)
            .build();
        let request = ApiRequest::post(project_path(&self.project_id, &["issues"])).json(body);
        Ok(DispatchPlan::Request(request))
    }
}

/// `list_issues` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ListIssues {
    /// Target project.
    pub project_id: Identifier,
    /// `opened`, `closed`, or `all`.
    pub state: Option<String>,
    /// Required labels.
    pub labels: Option<Vec<String>>,
    /// Title and description search.
    pub search: Option<String>,
    /// Assignee filter.
    pub assignee_username: Option<String>,
    /// Author filter.
    pub author_username: Option<String>,
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

impl Operation for ListIssues {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::get(project_path(&self.project_id, &["issues"]))
            .query_opt("state", self.state)
            .query_joined("labels", self.labels.as_deref())
            .query_opt("search", self.search)
            .query_opt("assignee_username", self.assignee_username)
            .query_opt("author_username", self.author_username)
            .query_opt("created_after", self.created_after)
            .query_opt("created_before", self.created_before)
            .query_opt("updated_after", self.updated_after)
            .query_opt("updated_before", self.updated_before);
        Ok(DispatchPlan::Request(self.pagination.apply(request)))
    }
}

/// `get_issue` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct GetIssue {
    /// Target project.
    pub project_id: Identifier,
    /// Project-scoped issue number.
    pub issue_iid: u64,
}

impl Operation for GetIssue {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let iid = self.issue_iid.to_string();
        let path = project_path(&self.project_id, &["issues", iid.as_str()]);
        Ok(DispatchPlan::Request(ApiRequest::get(path)))
    }
}

/// `update_issue` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateIssue {
    /// Target project.
    pub project_id: Identifier,
    /// Project-scoped issue number.
    pub issue_iid: u64,
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Replacement labels.
    pub labels: Option<Vec<String>>,
    /// Replacement assignees.
    pub assignee_ids: Option<Vec<u64>>,
    /// `close` or `reopen`.
    pub state_event: Option<String>,
}

impl Operation for UpdateIssue {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let body = Body::new()
            .set_opt("title", self.title)
            .set_opt("description", self.description)
            .set_opt("labels", comma_joined(self.labels))
            .set_opt("assignee_ids", self.assignee_ids)
            .set_opt("state_event", self.state_event)
            .build();
        let iid = self.issue_iid.to_string();
        let path = project_path(&self.project_id, &["issues", iid.as_str()]);
        Ok(DispatchPlan::Request(ApiRequest::put(path).json(body)))
    }
}

/// `create_issue_note` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIssueNote {
    /// Target project.
    pub project_id: Identifier,
    /// Project-scoped issue number.
    pub issue_iid: u64,
    /// Note body.
    pub body: String,
}

impl Operation for CreateIssueNote {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let iid = self.issue_iid.to_string();
        let path = project_path(&self.project_id, &["issues", iid.as_str(), "notes"]);
        let body = Body::new().set("body", self.body).build();
        Ok(DispatchPlan::Request(ApiRequest::post(path).json(body)))
    }
}

/// `list_issue_notes` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ListIssueNotes {
    /// Target project.
    pub project_id: Identifier,
    /// Project-scoped issue number.
    pub issue_iid: u64,
    /// `asc` or `desc`.
    pub sort: Option<String>,
    /// Ordering field.
    pub order_by: Option<String>,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl Operation for ListIssueNotes {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let iid = self.issue_iid.to_string();
        let path = project_path(&self.project_id, &["issues", iid.as_str(), "notes"]);
        let request = ApiRequest::get(path)
            .query_opt("sort", self.sort)
            .query_opt("order_by", self.order_by);
        Ok(DispatchPlan::Request(self.pagination.apply(request)))
    }
}

/// `list_issue_discussions` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ListIssueDiscussions {
    /// Target project.
    pub project_id: Identifier,
    /// Project-scoped issue number.
    pub issue_iid: u64,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl Operation for ListIssueDiscussions {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let iid = self.issue_iid.to_string();
        let path = project_path(&self.project_id, &["issues", iid.as_str(), "discussions"]);
        Ok(DispatchPlan::Request(self.pagination.apply(ApiRequest::get(path))))
    }
}
