// crates/gitlab-gate-contract/src/tool_name.rs
// ============================================================================
// Module: Tool Identifiers
// Description: Canonical MCP tool identifiers for GitLab Gate.
// Purpose: Shared tool naming across contracts, routing, and audit.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Canonical tool identifiers used by the gateway. These names are part of the
//! external contract surface and never change once published.

use std::fmt;

use serde::Serialize;
use serde::Serializer;

/// Declares [`ToolName`] together with its string table.
///
/// Keeping the variant and its wire name on one line makes it impossible for
/// `as_str`, `parse`, and `all` to drift apart.
macro_rules! tool_names {
    ($($(#[doc = $doc:literal])* $variant:ident => $name:literal,)+) => {
        /// Canonical tool names for GitLab Gate.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum ToolName {
            $($(#[doc = $doc])* $variant,)+
        }

        impl ToolName {
            /// Returns the canonical string name for the tool.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// Returns all tool names in canonical listing order.
            #[must_use]
            pub const fn all() -> &'static [Self] {
                &[$(Self::$variant,)+]
            }

            /// Parses a tool name from its string representation.
            #[must_use]
            pub fn parse(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

tool_names! {
    /// Create or update a single repository file.
    CreateOrUpdateFile => "create_or_update_file",
    /// Search projects by name.
    SearchRepositories => "search_repositories",
    /// Create a new project.
    CreateRepository => "create_repository",
    /// Read a file or its metadata from a repository.
    GetFileContents => "get_file_contents",
    /// Write several files to a branch, one commit per file.
    PushFiles => "push_files",
    /// Create a branch from a ref.
    CreateBranch => "create_branch",
    /// Fork a project.
    ForkRepository => "fork_repository",
    /// List repository tree entries.
    GetRepositoryTree => "get_repository_tree",
    /// Create an issue.
    CreateIssue => "create_issue",
    /// List project issues.
    ListIssues => "list_issues",
    /// Fetch a single issue.
    GetIssue => "get_issue",
    /// Update an issue.
    UpdateIssue => "update_issue",
    /// Add a note to an issue.
    CreateIssueNote => "create_issue_note",
    /// List notes on an issue.
    ListIssueNotes => "list_issue_notes",
    /// List discussions on an issue.
    ListIssueDiscussions => "list_issue_discussions",
    /// Open a merge request.
    CreateMergeRequest => "create_merge_request",
    /// List project merge requests.
    ListMergeRequests => "list_merge_requests",
    /// Fetch a single merge request.
    GetMergeRequest => "get_merge_request",
    /// Fetch the diffs of a merge request.
    GetMergeRequestDiffs => "get_merge_request_diffs",
    /// Update a merge request.
    UpdateMergeRequest => "update_merge_request",
    /// List repository commits.
    ListCommits => "list_commits",
    /// Fetch a single commit.
    GetCommit => "get_commit",
    /// List project activity events.
    ListProjectEvents => "list_project_events",
    /// List project wiki pages.
    ListProjectWikiPages => "list_project_wiki_pages",
    /// Fetch a project wiki page.
    GetProjectWikiPage => "get_project_wiki_page",
    /// Create a project wiki page.
    CreateProjectWikiPage => "create_project_wiki_page",
    /// Update a project wiki page.
    UpdateProjectWikiPage => "update_project_wiki_page",
    /// Delete a project wiki page.
    DeleteProjectWikiPage => "delete_project_wiki_page",
    /// Upload an attachment to a project wiki.
    UploadProjectWikiAttachment => "upload_project_wiki_attachment",
    /// List group wiki pages.
    ListGroupWikiPages => "list_group_wiki_pages",
    /// Fetch a group wiki page.
    GetGroupWikiPage => "get_group_wiki_page",
    /// Create a group wiki page.
    CreateGroupWikiPage => "create_group_wiki_page",
    /// Update a group wiki page.
    UpdateGroupWikiPage => "update_group_wiki_page",
    /// Delete a group wiki page.
    DeleteGroupWikiPage => "delete_group_wiki_page",
    /// Upload an attachment to a group wiki.
    UploadGroupWikiAttachment => "upload_group_wiki_attachment",
    /// List project members.
    ListProjectMembers => "list_project_members",
    /// List group members.
    ListGroupMembers => "list_group_members",
    /// List project pipelines.
    ListPipelines => "list_pipelines",
    /// Fetch a single pipeline.
    GetPipeline => "get_pipeline",
    /// Trigger a new pipeline for a ref.
    CreatePipeline => "create_pipeline",
    /// Retry failed jobs of a pipeline.
    RetryPipeline => "retry_pipeline",
    /// Cancel a running pipeline.
    CancelPipeline => "cancel_pipeline",
    /// List jobs of a pipeline.
    ListPipelineJobs => "list_pipeline_jobs",
    /// Fetch a single job.
    GetJob => "get_job",
    /// Retry a job.
    RetryJob => "retry_job",
    /// Cancel a job.
    CancelJob => "cancel_job",
    /// List projects visible to the token.
    ListProjects => "list_projects",
    /// Fetch a single project.
    GetProject => "get_project",
    /// List projects belonging to a group.
    ListGroupProjects => "list_group_projects",
    /// Lint a CI configuration.
    ValidateCiConfig => "validate_ci_config",
    /// List runners.
    ListRunners => "list_runners",
    /// Fetch runner details.
    GetRunner => "get_runner",
    /// Enable a runner for a project.
    EnableProjectRunner => "enable_project_runner",
    /// Disable a runner for a project.
    DisableProjectRunner => "disable_project_runner",
    /// Create a runner owned by the current user.
    RegisterRunner => "register_runner",
    /// Check whether a runner carries a set of tags.
    ValidateRunnerTags => "validate_runner_tags",
    /// Update runner settings.
    UpdateRunner => "update_runner",
    /// List jobs processed by a runner.
    ListRunnerJobs => "list_runner_jobs",
    /// Summarize runner health.
    CheckRunnerHealth => "check_runner_health",
}

impl fmt::Display for ToolName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl Serialize for ToolName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions are permitted."
    )]

    use super::ToolName;

    #[test]
    fn parse_round_trips_every_name() {
        for tool in ToolName::all() {
            assert_eq!(ToolName::parse(tool.as_str()), Some(*tool));
        }
    }

    #[test]
    fn parse_rejects_unknown_and_case_variants() {
        assert_eq!(ToolName::parse("delete_everything"), None);
        assert_eq!(ToolName::parse("List_Issues"), None);
        assert_eq!(ToolName::parse(""), None);
    }

    #[test]
    fn serializes_as_wire_name() {
        let value = serde_json::to_value(ToolName::ListMergeRequests).unwrap();
        assert_eq!(value, serde_json::json!("list_merge_requests"));
    }
}
