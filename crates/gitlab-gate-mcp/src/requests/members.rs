// crates/gitlab-gate-mcp/src/requests/members.rs
// ============================================================================
// Module: Member Requests
// Description: Project and group membership tool arguments.
// Purpose: Plan membership listing calls.
// Dependencies: gitlab-gate-client, serde
// ============================================================================

use gitlab_gate_client::ApiRequest;
use serde::Deserialize;

use super::DispatchPlan;
use super::Identifier;
use super::Operation;
use super::Pagination;
use super::project_path;
use super::scoped_path;
use crate::tools::ToolError;

/// `list_project_members` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ListProjectMembers {
    /// Target project.
    pub project_id: Identifier,
    /// Name or username filter.
    pub query: Option<String>,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl Operation for ListProjectMembers {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::get(project_path(&self.project_id, &["members"]))
            .query_opt("query", self.query);
        Ok(DispatchPlan::Request(self.pagination.apply(request)))
    }
}

/// `list_group_members` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ListGroupMembers {
    /// Target group.
    pub group_id: Identifier,
    /// Name or username filter.
    pub query: Option<String>,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl Operation for ListGroupMembers {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::get(scoped_path("groups", &self.group_id, &["members"]))
            .query_opt("query", self.query);
        Ok(DispatchPlan::Request(self.pagination.apply(request)))
    }
}
