// crates/gitlab-gate-contract/src/tooling.rs
// ============================================================================
// Module: MCP Tool Contracts
// Description: Canonical tool descriptors and input contracts for GitLab Gate.
// Purpose: Drive tool listing, argument validation, and access control.
// Dependencies: serde, serde_json, gitlab-gate-contract::schemas
// ============================================================================

//! ## Overview
//! This module defines the canonical tool surface. Each [`ToolDescriptor`]
//! carries the full input contract used for validation, the read-only
//! eligibility consulted by the access filter, and the cross-field rules the
//! tool declares. Listings expose a reduced [`ToolDefinition`].
//!
//! ## Invariants
//! - Read-only eligibility is fixed here and never changes at runtime.
//! - Every declared date field is also a property of the input contract.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::schemas;
use crate::schemas::object_schema;
use crate::tool_name::ToolName;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Whether a tool may run while the gateway is in read-only mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolAccess {
    /// Tool only reads from GitLab.
    ReadOnly,
    /// Tool changes GitLab state.
    Mutating,
}

/// Invariants spanning several fields that JSON Schema does not express.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossFieldRules {
    /// Tool accepts `page` and `per_page`.
    pub paginated: bool,
    /// Fields that must hold a calendar date or date-time.
    pub date_fields: Vec<&'static str>,
}

impl CrossFieldRules {
    /// Returns true when the tool declares no cross-field rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.paginated && self.date_fields.is_empty()
    }
}

/// Registered operation: contract, access class, and cross-field rules.
///
/// # Invariants
/// - `input_schema` is an object schema with a `properties` map.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    /// Stable tool name.
    pub name: ToolName,
    /// Human-readable description.
    pub description: String,
    /// Full JSON Schema input contract (including `required`).
    pub input_schema: Value,
    /// Read-only eligibility.
    pub access: ToolAccess,
    /// Cross-field rules declared by the tool.
    pub cross_field: CrossFieldRules,
}

impl ToolDescriptor {
    /// Returns true when the tool is eligible under read-only mode.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.access == ToolAccess::ReadOnly
    }

    /// Builds the listing shape for this descriptor.
    #[must_use]
    pub fn definition(&self) -> ToolDefinition {
        let properties = self
            .input_schema
            .get("properties")
            .filter(|value| value.is_object())
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        ToolDefinition {
            name: self.name,
            description: self.description.clone(),
            input_schema: json!({
                "type": "object",
                "properties": properties
            }),
        }
    }

    /// Adds `page`/`per_page` to the contract and marks the tool paginated.
    #[must_use]
    fn paginated(mut self) -> Self {
        self.insert_properties(schemas::pagination());
        self.cross_field.paginated = true;
        self
    }

    /// Adds calendar properties to the contract and declares them.
    #[must_use]
    fn with_date_fields(mut self, fields: &[(&'static str, &str)]) -> Self {
        let properties =
            fields.iter().map(|(name, description)| (*name, schemas::timestamp(description)));
        self.insert_properties(properties.collect());
        self.cross_field.date_fields.extend(fields.iter().map(|(name, _)| *name));
        self
    }

    /// Inserts properties into the contract's `properties` map.
    fn insert_properties(&mut self, properties: Vec<(&str, Value)>) {
        if let Some(Value::Object(map)) = self.input_schema.get_mut("properties") {
            for (name, schema) in properties {
                map.insert(name.to_string(), schema);
            }
        }
    }
}

/// Tool definition used by MCP tool listing.
///
/// # Invariants
/// - `input_schema` always has the shape `{type: "object", properties: {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDefinition {
    /// MCP tool name.
    pub name: ToolName,
    /// Tool description for clients.
    pub description: String,
    /// Structural description of the tool input.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

// ============================================================================
// SECTION: Tool Descriptors
// ============================================================================

/// Returns the canonical tool descriptors in listing order.
///
/// The order is part of the listing contract. Append new tools at the end of
/// their group.
#[must_use]
pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    let mut descriptors = Vec::with_capacity(ToolName::all().len());
    descriptors.extend(repository_tools());
    descriptors.extend(issue_tools());
    descriptors.extend(merge_request_tools());
    descriptors.extend(commit_tools());
    descriptors.extend(wiki_tools(WikiScope::Project));
    descriptors.extend(wiki_tools(WikiScope::Group));
    descriptors.extend(member_tools());
    descriptors.extend(pipeline_tools());
    descriptors.extend(project_tools());
    descriptors.extend(runner_tools());
    descriptors
}

/// Calendar bounds shared by issue and merge request listings.
const CREATED_UPDATED_BOUNDS: [(&str, &str); 4] = [
    ("created_after", "Only items created on or after this time."),
    ("created_before", "Only items created on or before this time."),
    ("updated_after", "Only items updated on or after this time."),
    ("updated_before", "Only items updated on or before this time."),
];

/// Repository and file tools.
fn repository_tools() -> Vec<ToolDescriptor> {
    vec![
        descriptor(
            ToolName::CreateOrUpdateFile,
            ToolAccess::Mutating,
            "Create or update a single file in a GitLab project.",
            vec![
                ("project_id", schemas::project_id()),
                ("file_path", schemas::non_empty_string("Path of the file to write.")),
                ("content", schemas::string("New file content.")),
                ("commit_message", schemas::non_empty_string("Commit message.")),
                ("branch", schemas::non_empty_string("Branch to commit to.")),
                ("encoding", schemas::string_enum(&["text", "base64"], "Content encoding.")),
                (
                    "last_commit_id",
                    schemas::string("Expected last commit id of the file, for conflict checks."),
                ),
            ],
            &["project_id", "file_path", "content", "commit_message", "branch"],
        ),
        descriptor(
            ToolName::SearchRepositories,
            ToolAccess::ReadOnly,
            "Search for GitLab projects.",
            vec![("search", schemas::non_empty_string("Search query."))],
            &["search"],
        )
        .paginated(),
        descriptor(
            ToolName::CreateRepository,
            ToolAccess::Mutating,
            "Create a new GitLab project.",
            vec![
                ("name", schemas::non_empty_string("Project name.")),
                ("description", schemas::string("Project description.")),
                (
                    "visibility",
                    schemas::string_enum(&["private", "internal", "public"], "Visibility level."),
                ),
                ("initialize_with_readme", schemas::boolean("Create an initial README.")),
                ("namespace_id", schemas::numeric_id("Namespace to create the project in.")),
            ],
            &["name"],
        ),
        descriptor(
            ToolName::GetFileContents,
            ToolAccess::ReadOnly,
            "Get the contents of a file from a GitLab project.",
            vec![
                ("project_id", schemas::project_id()),
                ("file_path", schemas::non_empty_string("Path of the file.")),
                ("ref", schemas::string("Branch, tag, or commit (defaults to HEAD).")),
            ],
            &["project_id", "file_path"],
        ),
        descriptor(
            ToolName::PushFiles,
            ToolAccess::Mutating,
            "Write several files to a branch. Files are written in order; a failure stops the \
             push and earlier files stay committed.",
            vec![
                ("project_id", schemas::project_id()),
                ("branch", schemas::non_empty_string("Branch to push to.")),
                ("commit_message", schemas::non_empty_string("Commit message for each file.")),
                ("files", schemas::non_empty_array(schemas::file_entry(), "Files to write.")),
            ],
            &["project_id", "branch", "commit_message", "files"],
        ),
        descriptor(
            ToolName::CreateBranch,
            ToolAccess::Mutating,
            "Create a new branch in a GitLab project.",
            vec![
                ("project_id", schemas::project_id()),
                ("branch", schemas::non_empty_string("Name of the new branch.")),
                ("ref", schemas::non_empty_string("Branch, tag, or commit to branch from.")),
            ],
            &["project_id", "branch", "ref"],
        ),
        descriptor(
            ToolName::ForkRepository,
            ToolAccess::Mutating,
            "Fork a GitLab project.",
            vec![
                ("project_id", schemas::project_id()),
                ("namespace", schemas::string("Namespace path to fork into.")),
            ],
            &["project_id"],
        ),
        descriptor(
            ToolName::GetRepositoryTree,
            ToolAccess::ReadOnly,
            "List files and directories of a repository.",
            vec![
                ("project_id", schemas::project_id()),
                ("path", schemas::string("Directory inside the repository.")),
                ("ref", schemas::string("Branch, tag, or commit.")),
                ("recursive", schemas::boolean("Walk subdirectories.")),
            ],
            &["project_id"],
        )
        .paginated(),
    ]
}

/// Issue tools.
fn issue_tools() -> Vec<ToolDescriptor> {
    vec![
        descriptor(
            ToolName::CreateIssue,
            ToolAccess::Mutating,
            "Create a new issue in a GitLab project.",
            vec![
                ("project_id", schemas::project_id()),
                ("title", schemas::non_empty_string("Issue title.")),
                ("description", schemas::string("Issue description.")),
                ("assignee_ids", schemas::id_list("User ids to assign.")),
                ("labels", schemas::string_list("Labels to apply.")),
                ("milestone_id", schemas::numeric_id("Milestone id.")),
            ],
            &["project_id", "title"],
        ),
        descriptor(
            ToolName::ListIssues,
            ToolAccess::ReadOnly,
            "List issues in a GitLab project.",
            vec![
                ("project_id", schemas::project_id()),
                ("state", schemas::string_enum(&["opened", "closed", "all"], "Issue state.")),
                ("labels", schemas::string_list("Only issues with all of these labels.")),
                ("search", schemas::string("Search title and description.")),
                ("assignee_username", schemas::string("Only issues assigned to this user.")),
                ("author_username", schemas::string("Only issues created by this user.")),
            ],
            &["project_id"],
        )
        .with_date_fields(&CREATED_UPDATED_BOUNDS)
        .paginated(),
        descriptor(
            ToolName::GetIssue,
            ToolAccess::ReadOnly,
            "Get a single issue.",
            vec![
                ("project_id", schemas::project_id()),
                ("issue_iid", schemas::numeric_id("Project-scoped issue number.")),
            ],
            &["project_id", "issue_iid"],
        ),
        descriptor(
            ToolName::UpdateIssue,
            ToolAccess::Mutating,
            "Update an issue.",
            vec![
                ("project_id", schemas::project_id()),
                ("issue_iid", schemas::numeric_id("Project-scoped issue number.")),
                ("title", schemas::non_empty_string("New title.")),
                ("description", schemas::string("New description.")),
                ("labels", schemas::string_list("Replacement label set.")),
                ("assignee_ids", schemas::id_list("Replacement assignees.")),
                ("state_event", schemas::string_enum(&["close", "reopen"], "State transition.")),
            ],
            &["project_id", "issue_iid"],
        ),
        descriptor(
            ToolName::CreateIssueNote,
            ToolAccess::Mutating,
            "Add a note (comment) to an issue.",
            vec![
                ("project_id", schemas::project_id()),
                ("issue_iid", schemas::numeric_id("Project-scoped issue number.")),
                ("body", schemas::non_empty_string("Note body.")),
            ],
            &["project_id", "issue_iid", "body"],
        ),
        descriptor(
            ToolName::ListIssueNotes,
            ToolAccess::ReadOnly,
            "List notes on an issue.",
            vec![
                ("project_id", schemas::project_id()),
                ("issue_iid", schemas::numeric_id("Project-scoped issue number.")),
                ("sort", schemas::sort_direction()),
                (
                    "order_by",
                    schemas::string_enum(&["created_at", "updated_at"], "Ordering field."),
                ),
            ],
            &["project_id", "issue_iid"],
        )
        .paginated(),
        descriptor(
            ToolName::ListIssueDiscussions,
            ToolAccess::ReadOnly,
            "List discussion threads on an issue.",
            vec![
                ("project_id", schemas::project_id()),
                ("issue_iid", schemas::numeric_id("Project-scoped issue number.")),
            ],
            &["project_id", "issue_iid"],
        )
        .paginated(),
    ]
}

/// Merge request tools.
fn merge_request_tools() -> Vec<ToolDescriptor> {
    vec![
        descriptor(
            ToolName::CreateMergeRequest,
            ToolAccess::Mutating,
            "Create a new merge request.",
            vec![
                ("project_id", schemas::project_id()),
                ("title", schemas::non_empty_string("Merge request title.")),
                ("source_branch", schemas::non_empty_string("Branch with the changes.")),
                ("target_branch", schemas::non_empty_string("Branch to merge into.")),
                ("description", schemas::string("Merge request description.")),
                ("draft", schemas::boolean("Open as a draft.")),
                ("remove_source_branch", schemas::boolean("Delete source branch on merge.")),
                ("labels", schemas::string_list("Labels to apply.")),
            ],
            &["project_id", "title", "source_branch", "target_branch"],
        ),
        descriptor(
            ToolName::ListMergeRequests,
            ToolAccess::ReadOnly,
            "List merge requests in a GitLab project.",
            vec![
                ("project_id", schemas::project_id()),
                (
                    "state",
                    schemas::string_enum(
                        &["opened", "closed", "locked", "merged", "all"],
                        "Merge request state.",
                    ),
                ),
                ("labels", schemas::string_list("Only merge requests with these labels.")),
                ("source_branch", schemas::string("Only this source branch.")),
                ("target_branch", schemas::string("Only this target branch.")),
                ("search", schemas::string("Search title and description.")),
            ],
            &["project_id"],
        )
        .with_date_fields(&CREATED_UPDATED_BOUNDS)
        .paginated(),
        descriptor(
            ToolName::GetMergeRequest,
            ToolAccess::ReadOnly,
            "Get a single merge request.",
            vec![
                ("project_id", schemas::project_id()),
                ("merge_request_iid", schemas::numeric_id("Project-scoped merge request number.")),
            ],
            &["project_id", "merge_request_iid"],
        ),
        descriptor(
            ToolName::GetMergeRequestDiffs,
            ToolAccess::ReadOnly,
            "Get the file diffs of a merge request.",
            vec![
                ("project_id", schemas::project_id()),
                ("merge_request_iid", schemas::numeric_id("Project-scoped merge request number.")),
            ],
            &["project_id", "merge_request_iid"],
        ),
        descriptor(
            ToolName::UpdateMergeRequest,
            ToolAccess::Mutating,
            "Update a merge request.",
            vec![
                ("project_id", schemas::project_id()),
                ("merge_request_iid", schemas::numeric_id("Project-scoped merge request number.")),
                ("title", schemas::non_empty_string("New title.")),
                ("description", schemas::string("New description.")),
                ("target_branch", schemas::non_empty_string("New target branch.")),
                ("labels", schemas::string_list("Replacement label set.")),
                ("state_event", schemas::string_enum(&["close", "reopen"], "State transition.")),
            ],
            &["project_id", "merge_request_iid"],
        ),
    ]
}

/// Commit and event tools.
fn commit_tools() -> Vec<ToolDescriptor> {
    vec![
        descriptor(
            ToolName::ListCommits,
            ToolAccess::ReadOnly,
            "List repository commits.",
            vec![
                ("project_id", schemas::project_id()),
                ("ref_name", schemas::string("Branch, tag, or commit range.")),
                ("path", schemas::string("Only commits touching this path.")),
            ],
            &["project_id"],
        )
        .with_date_fields(&[
            ("since", "Only commits after or on this time."),
            ("until", "Only commits before or on this time."),
        ])
        .paginated(),
        descriptor(
            ToolName::GetCommit,
            ToolAccess::ReadOnly,
            "Get a single commit.",
            vec![
                ("project_id", schemas::project_id()),
                ("sha", schemas::non_empty_string("Commit hash or ref name.")),
            ],
            &["project_id", "sha"],
        ),
        descriptor(
            ToolName::ListProjectEvents,
            ToolAccess::ReadOnly,
            "List activity events of a project.",
            vec![
                ("project_id", schemas::project_id()),
                ("action", schemas::string("Only events of this action type.")),
                ("target_type", schemas::string("Only events for this target type.")),
                ("sort", schemas::sort_direction()),
            ],
            &["project_id"],
        )
        .with_date_fields(&[
            ("after", "Only events created after this date."),
            ("before", "Only events created before this date."),
        ])
        .paginated(),
    ]
}

/// Owner of a wiki: a project or a group.
#[derive(Debug, Clone, Copy)]
enum WikiScope {
    /// Project wiki.
    Project,
    /// Group wiki.
    Group,
}

impl WikiScope {
    /// Returns the owner id property name.
    const fn id_field(self) -> &'static str {
        match self {
            Self::Project => "project_id",
            Self::Group => "group_id",
        }
    }

    /// Returns the owner id schema.
    fn id_schema(self) -> Value {
        match self {
            Self::Project => schemas::project_id(),
            Self::Group => schemas::group_id(),
        }
    }

    /// Returns the owner label for descriptions.
    const fn label(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Group => "group",
        }
    }

    /// Returns the tool names for this scope in listing order.
    const fn tools(self) -> [ToolName; 6] {
        match self {
            Self::Project => [
                ToolName::ListProjectWikiPages,
                ToolName::GetProjectWikiPage,
                ToolName::CreateProjectWikiPage,
                ToolName::UpdateProjectWikiPage,
                ToolName::DeleteProjectWikiPage,
                ToolName::UploadProjectWikiAttachment,
            ],
            Self::Group => [
                ToolName::ListGroupWikiPages,
                ToolName::GetGroupWikiPage,
                ToolName::CreateGroupWikiPage,
                ToolName::UpdateGroupWikiPage,
                ToolName::DeleteGroupWikiPage,
                ToolName::UploadGroupWikiAttachment,
            ],
        }
    }
}

/// Wiki tools for one scope.
fn wiki_tools(scope: WikiScope) -> Vec<ToolDescriptor> {
    let id = scope.id_field();
    let owner = scope.label();
    let [list, get, create, update, delete, upload] = scope.tools();
    vec![
        descriptor(
            list,
            ToolAccess::ReadOnly,
            &format!("List wiki pages of a GitLab {owner}."),
            vec![
                (id, scope.id_schema()),
                ("with_content", schemas::boolean("Include page content.")),
            ],
            &[id],
        ),
        descriptor(
            get,
            ToolAccess::ReadOnly,
            &format!("Get a wiki page of a GitLab {owner}."),
            vec![
                (id, scope.id_schema()),
                ("slug", schemas::non_empty_string("Page slug.")),
                ("version", schemas::string("Page version (commit sha).")),
                ("render_html", schemas::boolean("Return rendered HTML.")),
            ],
            &[id, "slug"],
        ),
        descriptor(
            create,
            ToolAccess::Mutating,
            &format!("Create a wiki page in a GitLab {owner}."),
            vec![
                (id, scope.id_schema()),
                ("title", schemas::non_empty_string("Page title.")),
                ("content", schemas::string("Page content.")),
                ("format", schemas::wiki_format()),
            ],
            &[id, "title", "content"],
        ),
        descriptor(
            update,
            ToolAccess::Mutating,
            &format!("Update a wiki page in a GitLab {owner}."),
            vec![
                (id, scope.id_schema()),
                ("slug", schemas::non_empty_string("Page slug.")),
                ("title", schemas::non_empty_string("New title.")),
                ("content", schemas::string("New content.")),
                ("format", schemas::wiki_format()),
            ],
            &[id, "slug"],
        ),
        descriptor(
            delete,
            ToolAccess::Mutating,
            &format!("Delete a wiki page from a GitLab {owner}."),
            vec![(id, scope.id_schema()), ("slug", schemas::non_empty_string("Page slug."))],
            &[id, "slug"],
        ),
        descriptor(
            upload,
            ToolAccess::Mutating,
            &format!("Upload an attachment to the wiki of a GitLab {owner}."),
            vec![
                (id, scope.id_schema()),
                ("file_name", schemas::non_empty_string("Attachment file name.")),
                ("content", schemas::string("Base64-encoded file content.")),
                ("branch", schemas::string("Wiki branch (defaults to the wiki default branch).")),
            ],
            &[id, "file_name", "content"],
        ),
    ]
}

/// Membership tools.
fn member_tools() -> Vec<ToolDescriptor> {
    vec![
        descriptor(
            ToolName::ListProjectMembers,
            ToolAccess::ReadOnly,
            "List members of a GitLab project.",
            vec![
                ("project_id", schemas::project_id()),
                ("query", schemas::string("Filter by name or username.")),
            ],
            &["project_id"],
        )
        .paginated(),
        descriptor(
            ToolName::ListGroupMembers,
            ToolAccess::ReadOnly,
            "List members of a GitLab group.",
            vec![
                ("group_id", schemas::group_id()),
                ("query", schemas::string("Filter by name or username.")),
            ],
            &["group_id"],
        )
        .paginated(),
    ]
}

/// Pipeline and job tools.
fn pipeline_tools() -> Vec<ToolDescriptor> {
    let pipeline_ref = || {
        vec![
            ("project_id", schemas::project_id()),
            ("pipeline_id", schemas::numeric_id("Pipeline id.")),
        ]
    };
    let job_ref = || {
        vec![("project_id", schemas::project_id()), ("job_id", schemas::numeric_id("Job id."))]
    };
    vec![
        descriptor(
            ToolName::ListPipelines,
            ToolAccess::ReadOnly,
            "List pipelines of a GitLab project.",
            vec![
                ("project_id", schemas::project_id()),
                (
                    "scope",
                    schemas::string_enum(
                        &["running", "pending", "finished", "branches", "tags"],
                        "Pipeline scope.",
                    ),
                ),
                ("status", schemas::string("Pipeline status.")),
                ("ref", schemas::string("Only pipelines for this ref.")),
                ("sha", schemas::string("Only pipelines for this commit.")),
                ("username", schemas::string("Only pipelines triggered by this user.")),
                (
                    "order_by",
                    schemas::string_enum(&["id", "status", "ref", "updated_at"], "Ordering field."),
                ),
                ("sort", schemas::sort_direction()),
            ],
            &["project_id"],
        )
        .with_date_fields(&[
            ("updated_after", "Only pipelines updated after this time."),
            ("updated_before", "Only pipelines updated before this time."),
        ])
        .paginated(),
        descriptor(
            ToolName::GetPipeline,
            ToolAccess::ReadOnly,
            "Get a single pipeline.",
            pipeline_ref(),
            &["project_id", "pipeline_id"],
        ),
        descriptor(
            ToolName::CreatePipeline,
            ToolAccess::Mutating,
            "Trigger a new pipeline for a ref.",
            vec![
                ("project_id", schemas::project_id()),
                ("ref", schemas::non_empty_string("Branch or tag to run.")),
                (
                    "variables",
                    json!({
                        "type": "array",
                        "items": schemas::pipeline_variable(),
                        "description": "CI variables for this run."
                    }),
                ),
            ],
            &["project_id", "ref"],
        ),
        descriptor(
            ToolName::RetryPipeline,
            ToolAccess::Mutating,
            "Retry the failed jobs of a pipeline.",
            pipeline_ref(),
            &["project_id", "pipeline_id"],
        ),
        descriptor(
            ToolName::CancelPipeline,
            ToolAccess::Mutating,
            "Cancel a running pipeline.",
            pipeline_ref(),
            &["project_id", "pipeline_id"],
        ),
        descriptor(
            ToolName::ListPipelineJobs,
            ToolAccess::ReadOnly,
            "List the jobs of a pipeline.",
            {
                let mut properties = pipeline_ref();
                properties.push(("scope", schemas::string_list("Job statuses to include.")));
                properties.push(("include_retried", schemas::boolean("Include retried jobs.")));
                properties
            },
            &["project_id", "pipeline_id"],
        )
        .paginated(),
        descriptor(
            ToolName::GetJob,
            ToolAccess::ReadOnly,
            "Get a single job.",
            job_ref(),
            &["project_id", "job_id"],
        ),
        descriptor(
            ToolName::RetryJob,
            ToolAccess::Mutating,
            "Retry a job.",
            job_ref(),
            &["project_id", "job_id"],
        ),
        descriptor(
            ToolName::CancelJob,
            ToolAccess::Mutating,
            "Cancel a job.",
            job_ref(),
            &["project_id", "job_id"],
        ),
    ]
}

/// Project discovery and CI tools.
fn project_tools() -> Vec<ToolDescriptor> {
    vec![
        descriptor(
            ToolName::ListProjects,
            ToolAccess::ReadOnly,
            "List projects visible to the authenticated user.",
            vec![
                ("search", schemas::string("Search by name.")),
                ("owned", schemas::boolean("Only projects owned by the user.")),
                ("membership", schemas::boolean("Only projects the user is a member of.")),
                (
                    "visibility",
                    schemas::string_enum(&["private", "internal", "public"], "Visibility level."),
                ),
                (
                    "order_by",
                    schemas::string_enum(
                        &["id", "name", "path", "created_at", "updated_at", "last_activity_at"],
                        "Ordering field.",
                    ),
                ),
                ("sort", schemas::sort_direction()),
                ("simple", schemas::boolean("Return a reduced project representation.")),
            ],
            &[],
        )
        .paginated(),
        descriptor(
            ToolName::GetProject,
            ToolAccess::ReadOnly,
            "Get a single project.",
            vec![("project_id", schemas::project_id())],
            &["project_id"],
        ),
        descriptor(
            ToolName::ListGroupProjects,
            ToolAccess::ReadOnly,
            "List projects in a group.",
            vec![
                ("group_id", schemas::group_id()),
                ("include_subgroups", schemas::boolean("Include projects in subgroups.")),
                ("search", schemas::string("Search by name.")),
                ("archived", schemas::boolean("Filter by archived state.")),
            ],
            &["group_id"],
        )
        .paginated(),
        descriptor(
            ToolName::ValidateCiConfig,
            ToolAccess::ReadOnly,
            "Validate a CI/CD configuration in the context of a project. Does not change the \
             repository.",
            vec![
                ("project_id", schemas::project_id()),
                ("content", schemas::non_empty_string("CI configuration (YAML).")),
                ("dry_run", schemas::boolean("Simulate pipeline creation.")),
                ("ref", schemas::string("Ref used for dry runs.")),
                ("include_jobs", schemas::boolean("Include the list of jobs.")),
            ],
            &["project_id", "content"],
        ),
    ]
}

/// Runner lifecycle tools.
fn runner_tools() -> Vec<ToolDescriptor> {
    let runner_id = || ("runner_id", schemas::numeric_id("Runner id."));
    vec![
        descriptor(
            ToolName::ListRunners,
            ToolAccess::ReadOnly,
            "List runners available to the user, a project, or a group.",
            vec![
                ("project_id", schemas::project_id()),
                ("group_id", schemas::group_id()),
                (
                    "type",
                    schemas::string_enum(
                        &["instance_type", "group_type", "project_type"],
                        "Runner type.",
                    ),
                ),
                (
                    "status",
                    schemas::string_enum(
                        &["online", "offline", "stale", "never_contacted"],
                        "Runner status.",
                    ),
                ),
                ("paused", schemas::boolean("Filter by paused state.")),
                ("tag_list", schemas::string_list("Only runners with all of these tags.")),
            ],
            &[],
        )
        .paginated(),
        descriptor(
            ToolName::GetRunner,
            ToolAccess::ReadOnly,
            "Get runner details.",
            vec![runner_id()],
            &["runner_id"],
        ),
        descriptor(
            ToolName::EnableProjectRunner,
            ToolAccess::Mutating,
            "Enable an existing runner for a project.",
            vec![("project_id", schemas::project_id()), runner_id()],
            &["project_id", "runner_id"],
        ),
        descriptor(
            ToolName::DisableProjectRunner,
            ToolAccess::Mutating,
            "Disable a runner for a project.",
            vec![("project_id", schemas::project_id()), runner_id()],
            &["project_id", "runner_id"],
        ),
        descriptor(
            ToolName::RegisterRunner,
            ToolAccess::Mutating,
            "Create a runner owned by the authenticated user and return its token.",
            vec![
                (
                    "runner_type",
                    schemas::string_enum(
                        &["instance_type", "group_type", "project_type"],
                        "Runner scope.",
                    ),
                ),
                ("group_id", schemas::numeric_id("Group id for group runners.")),
                ("project_id", schemas::numeric_id("Project id for project runners.")),
                ("description", schemas::string("Runner description.")),
                ("tag_list", schemas::string_list("Runner tags.")),
                ("run_untagged", schemas::boolean("Pick up untagged jobs.")),
                ("locked", schemas::boolean("Lock the runner to its current projects.")),
                ("access_level", schemas::runner_access_level()),
                ("maximum_timeout", schemas::integer("Maximum job timeout in seconds.")),
                ("paused", schemas::boolean("Create the runner paused.")),
            ],
            &["runner_type"],
        ),
        descriptor(
            ToolName::ValidateRunnerTags,
            ToolAccess::ReadOnly,
            "Check whether a runner carries every tag a job requires.",
            vec![
                runner_id(),
                (
                    "required_tags",
                    schemas::non_empty_array(json!({ "type": "string" }), "Tags the job requires."),
                ),
            ],
            &["runner_id", "required_tags"],
        ),
        descriptor(
            ToolName::UpdateRunner,
            ToolAccess::Mutating,
            "Update runner settings.",
            vec![
                runner_id(),
                ("description", schemas::string("Runner description.")),
                ("paused", schemas::boolean("Pause or resume the runner.")),
                ("tag_list", schemas::string_list("Replacement tag set.")),
                ("run_untagged", schemas::boolean("Pick up untagged jobs.")),
                ("locked", schemas::boolean("Lock the runner to its current projects.")),
                ("access_level", schemas::runner_access_level()),
                ("maximum_timeout", schemas::integer("Maximum job timeout in seconds.")),
            ],
            &["runner_id"],
        ),
        descriptor(
            ToolName::ListRunnerJobs,
            ToolAccess::ReadOnly,
            "List jobs processed by a runner.",
            vec![
                runner_id(),
                (
                    "status",
                    schemas::string_enum(
                        &["running", "success", "failed", "canceled"],
                        "Job status.",
                    ),
                ),
                ("order_by", schemas::string_enum(&["id"], "Ordering field.")),
                ("sort", schemas::sort_direction()),
            ],
            &["runner_id"],
        )
        .paginated(),
        descriptor(
            ToolName::CheckRunnerHealth,
            ToolAccess::ReadOnly,
            "Summarize whether a runner is online and able to take jobs.",
            vec![runner_id()],
            &["runner_id"],
        ),
    ]
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a descriptor with no cross-field rules.
fn descriptor(
    name: ToolName,
    access: ToolAccess,
    description: &str,
    properties: Vec<(&str, Value)>,
    required: &[&str],
) -> ToolDescriptor {
    ToolDescriptor {
        name,
        description: description.to_string(),
        input_schema: object_schema(properties, required),
        access,
        cross_field: CrossFieldRules::default(),
    }
}
