// crates/gitlab-gate-mcp/src/requests/runners.rs
// ============================================================================
// Module: Runner Requests
// Description: Runner lifecycle and diagnostics tool arguments.
// Purpose: Plan runner backend calls and the locally derived reports.
// Dependencies: gitlab-gate-client, serde
// ============================================================================

//! ## Overview
//! Most runner tools map to one REST call. `validate_runner_tags` and
//! `check_runner_health` fetch the runner record and reshape it through a
//! [`Derivation`]; `disable_project_runner` acknowledges GitLab's empty
//! response.

use gitlab_gate_client::ApiRequest;
use serde::Deserialize;

use super::Body;
use super::Derivation;
use super::DispatchPlan;
use super::Identifier;
use super::Operation;
use super::Pagination;
use super::project_path;
use super::scoped_path;
use crate::tools::ToolError;

/// Path segments of an instance-level runner.
fn runner_path(runner_id: u64, rest: &[&str]) -> Vec<String> {
    let mut path = vec!["runners".to_string(), runner_id.to_string()];
    path.extend(rest.iter().map(|segment| (*segment).to_string()));
    path
}

/// `list_runners` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ListRunners {
    /// Project scope.
    pub project_id: Option<Identifier>,
    /// Group scope, used when no project is given.
    pub group_id: Option<Identifier>,
    /// Runner type.
    #[serde(rename = "type")]
    pub runner_type: Option<String>,
    /// Runner status.
    pub status: Option<String>,
    /// Paused filter.
    pub paused: Option<bool>,
    /// Required tags.
    pub tag_list: Option<Vec<String>>,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl Operation for ListRunners {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let path = match (&self.project_id, &self.group_id) {
            (Some(project), _) => project_path(project, &["runners"]),
            (None, Some(group)) => scoped_path("groups", group, &["runners"]),
            (None, None) => vec!["runners".to_string()],
        };
        let request = ApiRequest::get(path)
            .query_opt("type", self.runner_type)
            .query_opt("status", self.status)
            .query_opt("paused", self.paused)
            .query_joined("tag_list", self.tag_list.as_deref());
        Ok(DispatchPlan::Request(self.pagination.apply(request)))
    }
}

/// `get_runner` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct GetRunner {
    /// Runner id.
    pub runner_id: u64,
}

impl Operation for GetRunner {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        Ok(DispatchPlan::Request(ApiRequest::get(runner_path(self.runner_id, &[]))))
    }
}

/// `enable_project_runner` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct EnableProjectRunner {
    /// Target project.
    pub project_id: Identifier,
    /// Runner to enable.
    pub runner_id: u64,
}

impl Operation for EnableProjectRunner {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let body = Body::new().set("runner_id", self.runner_id).build();
        let request = ApiRequest::post(project_path(&self.project_id, &["runners"])).json(body);
        Ok(DispatchPlan::Request(request))
    }
}

/// `disable_project_runner` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct DisableProjectRunner {
    /// Target project.
    pub project_id: Identifier,
    /// Runner to disable.
    pub runner_id: u64,
}

impl Operation for DisableProjectRunner {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let runner_id = self.runner_id.to_string();
        let path = project_path(&self.project_id, &["runners", runner_id.as_str()]);
        Ok(DispatchPlan::Derived {
            request: ApiRequest::delete(path),
            derive: Derivation::Acknowledge {
                status: "disabled",
                subject: vec![("project_id", self.project_id.segment()), ("runner_id", runner_id)],
            },
        })
    }
}

/// `register_runner` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRunner {
    /// Runner scope.
    pub runner_type: String,
    /// Owning group for group runners.
    pub group_id: Option<u64>,
    /// Owning project for project runners.
    pub project_id: Option<u64>,
    /// Description.
    pub description: Option<String>,
    /// Tags.
    pub tag_list: Option<Vec<String>>,
    /// Pick up untagged jobs.
    pub run_untagged: Option<bool>,
    /// Lock to current projects.
    pub locked: Option<bool>,
    /// Protected-ref policy.
    pub access_level: Option<String>,
    /// Job timeout in seconds.
    pub maximum_timeout: Option<i64>,
    /// Start paused.
    pub paused: Option<bool>,
}

impl Operation for RegisterRunner {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let body = Body::new()
            .set("runner_type", self.runner_type)
            .set_opt("group_id", self.group_id)
            .set_opt("project_id", self.project_id)
            .set_opt("description", self.description)
            .set_opt("tag_list", self.tag_list)
            .set_opt("run_untagged", self.run_untagged)
            .set_opt("locked", self.locked)
            .set_opt("access_level", self.access_level)
            .set_opt("maximum_timeout", self.maximum_timeout)
            .set_opt("paused", self.paused)
            .build();
        Ok(DispatchPlan::Request(ApiRequest::post(["user", "runners"]).json(body)))
    }
}

/// `validate_runner_tags` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRunnerTags {
    /// Runner to inspect.
    pub runner_id: u64,
    /// Tags the job requires.
    pub required_tags: Vec<String>,
}

impl Operation for ValidateRunnerTags {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        Ok(DispatchPlan::Derived {
            request: ApiRequest::get(runner_path(self.runner_id, &[])),
            derive: Derivation::RunnerTags {
                required: self.required_tags,
            },
        })
    }
}

/// `update_runner` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRunner {
    /// Runner to update.
    pub runner_id: u64,
    /// Description.
    pub description: Option<String>,
    /// Pause or resume.
    pub paused: Option<bool>,
    /// Replacement tags.
    pub tag_list: Option<Vec<String>>,
    /// Pick up untagged jobs.
    pub run_untagged: Option<bool>,
    /// Lock to current projects.
    pub locked: Option<bool>,
    /// Protected-ref policy.
    pub access_level: Option<String>,
    /// Job timeout in seconds.
    pub maximum_timeout: Option<i64>,
}

impl Operation for UpdateRunner {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let body = Body::new()
            .set_opt("description", self.description)
            .set_opt("paused", self.paused)
            .set_opt("tag_list", self.tag_list)
            .set_opt("run_untagged", self.run_untagged)
            .set_opt("locked", self.locked)
            .set_opt("access_level", self.access_level)
            .set_opt("maximum_timeout", self.maximum_timeout)
            .build();
        let request = ApiRequest::put(runner_path(self.runner_id, &[])).json(body);
        Ok(DispatchPlan::Request(request))
    }
}

/// `list_runner_jobs` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ListRunnerJobs {
    /// Runner whose jobs to list.
    pub runner_id: u64,
    /// Job status.
    pub status: Option<String>,
    /// Ordering field.
    pub order_by: Option<String>,
    /// `asc` or `desc`.
    pub sort: Option<String>,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl Operation for ListRunnerJobs {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::get(runner_path(self.runner_id, &["jobs"]))
            .query_opt("status", self.status)
            .query_opt("order_by", self.order_by)
            .query_opt("sort", self.sort);
        Ok(DispatchPlan::Request(self.pagination.apply(request)))
    }
}

/// `check_runner_health` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRunnerHealth {
    /// Runner to inspect.
    pub runner_id: u64,
}

impl Operation for CheckRunnerHealth {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        Ok(DispatchPlan::Derived {
            request: ApiRequest::get(runner_path(self.runner_id, &[])),
            derive: Derivation::RunnerHealth,
        })
    }
}
