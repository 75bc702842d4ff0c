// crates/gitlab-gate-mcp/src/requests/pipelines.rs
// ============================================================================
// Module: Pipeline Requests
// Description: Pipeline and job tool arguments.
// Purpose: Plan pipeline and job backend calls.
// Dependencies: gitlab-gate-client, serde, serde_json
// ============================================================================

use gitlab_gate_client::ApiRequest;
use serde::Deserialize;
use serde_json::Value;

use super::Body;
use super::DispatchPlan;
use super::Identifier;
use super::Operation;
use super::Pagination;
use super::project_path;
use crate::tools::ToolError;

// ============================================================================
// SECTION: Pipelines
// ============================================================================

/// `list_pipelines` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPipelines {
    /// Target project.
    pub project_id: Identifier,
    /// Pipeline scope.
    pub scope: Option<String>,
    /// Pipeline status.
    pub status: Option<String>,
    /// Ref filter.
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    /// Commit filter.
    pub sha: Option<String>,
    /// Triggering user.
    pub username: Option<String>,
    /// Ordering field.
    pub order_by: Option<String>,
    /// `asc` or `desc`.
    pub sort: Option<String>,
    /// Updated on or after.
    pub updated_after: Option<String>,
    /// Updated on or before.
    pub updated_before: Option<String>,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl Operation for ListPipelines {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::get(project_path(&self.project_id, &["pipelines"]))
            .query_opt("scope", self.scope)
            .query_opt("status", self.status)
            .query_opt("ref", self.git_ref)
            .query_opt("sha", self.sha)
            .query_opt("username", self.username)
            .query_opt("order_by", self.order_by)
            .query_opt("sort", self.sort)
            .query_opt("updated_after", self.updated_after)
            .query_opt("updated_before", self.updated_before);
        Ok(DispatchPlan::Request(self.pagination.apply(request)))
    }
}

/// Pipeline reference shared by the single-pipeline tools.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineRef {
    /// Target project.
    pub project_id: Identifier,
    /// Pipeline id.
    pub pipeline_id: u64,
}

impl PipelineRef {
    /// Path segments of the pipeline, with an optional action suffix.
    fn path(&self, action: Option<&str>) -> Vec<String> {
        let id = self.pipeline_id.to_string();
        let mut path = project_path(&self.project_id, &["pipelines", id.as_str()]);
        path.extend(action.map(str::to_string));
        path
    }
}

/// `get_pipeline` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct GetPipeline {
    /// Pipeline to fetch.
    #[serde(flatten)]
    pub pipeline: PipelineRef,
}

impl Operation for GetPipeline {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        Ok(DispatchPlan::Request(ApiRequest::get(self.pipeline.path(None))))
    }
}

/// One CI variable passed to a new pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineVariable {
    /// Variable name.
    pub key: String,
    /// Variable value.
    pub value: String,
    /// `env_var` or `file`.
    pub variable_type: Option<String>,
}

/// `create_pipeline` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePipeline {
    /// Target project.
    pub project_id: Identifier,
    /// Branch or tag to run.
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// CI variables for the run.
    pub variables: Option<Vec<PipelineVariable>>,
}

impl Operation for CreatePipeline {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let variables = self.variables.map(|variables| {
            variables
                .into_iter()
                .map(|variable| {
                    Body::new()
                        .set("key", variable.key)
                        .set("value", variable.value)
                        .set_opt("variable_type", variable.variable_type)
                        .build()
                })
                .collect::<Vec<Value>>()
        });
        let body = Body::new().set("ref", self.git_ref).set_opt("variables", variables).build();
        let request = ApiRequest::post(project_path(&self.project_id, &["pipeline"])).json(body);
        Ok(DispatchPlan::Request(request))
    }
}

/// `retry_pipeline` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryPipeline {
    /// Pipeline to retry.
    #[serde(flatten)]
    pub pipeline: PipelineRef,
}

impl Operation for RetryPipeline {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        Ok(DispatchPlan::Request(ApiRequest::post(self.pipeline.path(Some("retry")))))
    }
}

/// `cancel_pipeline` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelPipeline {
    /// Pipeline to cancel.
    #[serde(flatten)]
    pub pipeline: PipelineRef,
}

impl Operation for CancelPipeline {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        Ok(DispatchPlan::Request(ApiRequest::post(self.pipeline.path(Some("cancel")))))
    }
}

/// `list_pipeline_jobs` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPipelineJobs {
    /// Pipeline whose jobs to list.
    #[serde(flatten)]
    pub pipeline: PipelineRef,
    /// Job statuses to include.
    pub scope: Option<Vec<String>>,
    /// Include retried jobs.
    pub include_retried: Option<bool>,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl Operation for ListPipelineJobs {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::get(self.pipeline.path(Some("jobs")))
            .query_array("scope", self.scope.as_deref())
            .query_opt("include_retried", self.include_retried);
        Ok(DispatchPlan::Request(self.pagination.apply(request)))
    }
}

// ============================================================================
// SECTION: Jobs
// ============================================================================

/// Job reference shared by the job tools.
#[derive(Debug, Clone, Deserialize)]
pub struct JobRef {
    /// Target project.
    pub project_id: Identifier,
    /// Job id.
    pub job_id: u64,
}

impl JobRef {
    /// Path segments of the job, with an optional action suffix.
    fn path(&self, action: Option<&str>) -> Vec<String> {
        let id = self.job_id.to_string();
        let mut path = project_path(&self.project_id, &["jobs", id.as_str()]);
        path.extend(action.map(str::to_string));
        path
    }
}

/// `get_job` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct GetJob {
    /// Job to fetch.
    #[serde(flatten)]
    pub job: JobRef,
}

impl Operation for GetJob {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        Ok(DispatchPlan::Request(ApiRequest::get(self.job.path(None))))
    }
}

/// `retry_job` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryJob {
    /// Job to retry.
    #[serde(flatten)]
    pub job: JobRef,
}

impl Operation for RetryJob {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        Ok(DispatchPlan::Request(ApiRequest::post(self.job.path(Some("retry")))))
    }
}

/// `cancel_job` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelJob {
    /// Job to cancel.
    #[serde(flatten)]
    pub job: JobRef,
}

impl Operation for CancelJob {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        Ok(DispatchPlan::Request(ApiRequest::post(self.job.path(Some("cancel")))))
    }
}
