// crates/gitlab-gate-mcp/src/requests/repository.rs
// ============================================================================
// Module: Repository Requests
// Description: Repository, file, branch, and fork tool arguments.
// Purpose: Plan repository backend calls.
// Dependencies: gitlab-gate-client, serde
// ============================================================================

//! ## Overview
//! File writes go through [`DispatchPlan::WriteFile`]; the client decides
//! between create and update. `push_files` expands into one write per file,
//! in input order.

use gitlab_gate_client::ApiRequest;
use gitlab_gate_client::FileWrite;
use serde::Deserialize;

use super::Body;
use super::DispatchPlan;
use super::Identifier;
use super::Operation;
use super::Pagination;
use super::project_path;
use crate::tools::ToolError;

/// Ref used when a file read names none.
const DEFAULT_FILE_REF: &str = "HEAD";

/// `create_or_update_file` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrUpdateFile {
    /// Target project.
    pub project_id: Identifier,
    /// Path of the file.
    pub file_path: String,
    /// New content.
    pub content: String,
    /// Commit message.
    pub commit_message: String,
    /// Target branch.
    pub branch: String,
    /// `text` or `base64`.
    pub encoding: Option<String>,
    /// Expected last commit id.
    pub last_commit_id: Option<String>,
}

impl Operation for CreateOrUpdateFile {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        Ok(DispatchPlan::WriteFile(FileWrite {
            project_id: self.project_id.segment(),
            file_path: self.file_path,
            branch: self.branch,
            content: self.content,
            commit_message: self.commit_message,
            encoding: self.encoding,
            last_commit_id: self.last_commit_id,
        }))
    }
}

/// `search_repositories` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRepositories {
    /// Search query.
    pub search: String,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl Operation for SearchRepositories {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::get(["projects"]).query("search", self.search);
        Ok(DispatchPlan::Request(self.pagination.apply(request)))
    }
}

/// `create_repository` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRepository {
    /// Project name.
    pub name: String,
    /// Project description.
    pub description: Option<String>,
    /// Visibility level.
    pub visibility: Option<String>,
    /// Create an initial README.
    pub initialize_with_readme: Option<bool>,
    /// Namespace to create the project in.
    pub namespace_id: Option<u64>,
}

impl Operation for CreateRepository {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let body = Body::new()
            .set("name", self.name)
            .set_opt("description", self.description)
            .set_opt("visibility", self.visibility)
            .set_opt("initialize_with_readme", self.initialize_with_readme)
            .set_opt("namespace_id", self.namespace_id)
            .build();
        Ok(DispatchPlan::Request(ApiRequest::post(["projects"]).json(body)))
    }
}

/// `get_file_contents` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct GetFileContents {
    /// Target project.
    pub project_id: Identifier,
    /// Path of the file.
    pub file_path: String,
    /// Branch, tag, or commit.
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
}

impl Operation for GetFileContents {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let git_ref = self.git_ref.unwrap_or_else(|| DEFAULT_FILE_REF.to_string());
        let mut path = project_path(&self.project_id, &["repository", "files"]);
        path.push(self.file_path);
        let request = ApiRequest::get(path).query("ref", git_ref);
        Ok(DispatchPlan::Request(request))
    }
}

/// One file of a `push_files` request.
#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    /// Path of the file.
    pub file_path: String,
    /// File content.
    pub content: String,
}

/// `push_files` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct PushFiles {
    /// Target project.
    pub project_id: Identifier,
    /// Target branch.
    pub branch: String,
    /// Commit message for each write.
    pub commit_message: String,
    /// Files in write order.
    pub files: Vec<FileEntry>,
}

impl Operation for PushFiles {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let project_id = self.project_id.segment();
        let writes = self
            .files
            .into_iter()
            .map(|file| FileWrite {
                project_id: project_id.clone(),
                file_path: file.file_path,
                branch: self.branch.clone(),
                content: file.content,
                commit_message: self.commit_message.clone(),
                encoding: None,
                last_commit_id: None,
            })
            .collect();
        Ok(DispatchPlan::PushFiles(writes))
    }
}

/// `create_branch` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBranch {
    /// Target project.
    pub project_id: Identifier,
    /// New branch name.
    pub branch: String,
    /// Source ref.
    #[serde(rename = "ref")]
    pub git_ref: String,
}

impl Operation for CreateBranch {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let body = Body::new().set("branch", self.branch).set("ref", self.git_ref).build();
        let path = project_path(&self.project_id, &["repository", "branches"]);
        let request = ApiRequest::post(path).json(body);
        Ok(DispatchPlan::Request(request))
    }
}

/// `fork_repository` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ForkRepository {
    /// Project to fork.
    pub project_id: Identifier,
    /// Namespace path to fork into.
    pub namespace: Option<String>,
}

impl Operation for ForkRepository {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let body = Body::new().set_opt("namespace_path", self.namespace).build();
        let request = ApiRequest::post(project_path(&self.project_id, &["fork"])).json(body);
        Ok(DispatchPlan::Request(request))
    }
}

/// `get_repository_tree` arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct GetRepositoryTree {
    /// Target project.
    pub project_id: Identifier,
    /// Directory inside the repository.
    pub path: Option<String>,
    /// Branch, tag, or commit.
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    /// Walk subdirectories.
    pub recursive: Option<bool>,
    /// Page selection.
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl Operation for GetRepositoryTree {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::get(project_path(&self.project_id, &["repository", "tree"]))
            .query_opt("path", self.path)
            .query_opt("ref", self.git_ref)
            .query_opt("recursive", self.recursive);
        Ok(DispatchPlan::Request(self.pagination.apply(request)))
    }
}
