// crates/gitlab-gate-mcp/src/requests/projects.rs
// ============================================================================
// Module: Project Requests
// Description: Project discovery and CI lint tool arguments.
// Purpose: Plan project listing and CI validation calls.
// Dependencies: gitlab-gate-client, serde
// ============================================================================

use gitlab_gate_client::ApiRequest;
use serde::Deserialize;

use super::Body;
use super::DispatchPlan;
use super::Identifier;
use super::Operation;
use super::Pagination;
use super::project_path;
use super::scoped_path;
use crate::tools::ToolError;

/// `list_projects` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ListProjects {
    /// Name search.
    pub search: Option<String>,
    /// Only owned projects.
    pub owned: Option<bool>,
    /// Only projects with membership.
    pub membership: Option<bool>,
    /// Visibility level.
    pub visibility: Option<String>,
    /// Ordering field.
    pub order_by: Option<String>,
    /// `asc` or `desc`.
    pub sort: Option<String>,
    /// Reduced representation.
    pub simple: Option<bool>,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl Operation for ListProjects {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::get(["projects"])
            .query_opt("search", self.search)
            .query_opt("owned", self.owned)
            .query_opt("membership", self.membership)
            .query_opt("visibility", self.visibility)
            .query_opt("order_by", self.order_by)
            .query_opt("sort", self.sort)
            .query_opt("simple", self.simple);
        Ok(DispatchPlan::Request(self.pagination.apply(request)))
    }
}

/// `get_project` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct GetProject {
    /// Target project.
    pub project_id: Identifier,
}

impl Operation for GetProject {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        Ok(DispatchPlan::Request(ApiRequest::get(project_path(&self.project_id, &[]))))
    }
}

/// `list_group_projects` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ListGroupProjects {
    /// Target group.
    pub group_id: Identifier,
    /// Include subgroup projects.
    pub include_subgroups: Option<bool>,
    /// Name search.
    pub search: Option<String>,
    /// Archived filter.
    pub archived: Option<bool>,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl Operation for ListGroupProjects {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::get(scoped_path("groups", &self.group_id, &["projects"]))
            .query_opt("include_subgroups", self.include_subgroups)
            .query_opt("search", self.search)
            .query_opt("archived", self.archived);
        Ok(DispatchPlan::Request(self.pagination.apply(request)))
    }
}

/// `validate_ci_config` arguments.
///
/// The lint endpoint is a POST but never changes the repository, so the
/// tool stays visible in read-only mode.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateCiConfig {
    /// Project providing the lint context.
    pub project_id: Identifier,
    /// CI configuration text.
    pub content: String,
    /// Simulate pipeline creation.
    pub dry_run: Option<bool>,
    /// Ref used for dry runs.
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    /// Include the job list.
    pub include_jobs: Option<bool>,
}

impl Operation for ValidateCiConfig {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let body = Body::new()
            .set("content", self.content)
            .set_opt("dry_run", self.dry_run)
            .set_opt("ref", self.git_ref)
            .set_opt("include_jobs", self.include_jobs)
            .build();
        let request = ApiRequest::post(project_path(&self.project_id, &["ci", "lint"])).json(body);
        Ok(DispatchPlan::Request(request))
    }
}
