// crates/gitlab-gate-mcp/src/response.rs
// ============================================================================
// Module: Response Normalizer
// Description: Shapes backend results into MCP text content blocks.
// Purpose: Trim well-known list results to the fields callers act on.
// Dependencies: gitlab-gate-contract, serde, serde_json
// ============================================================================

//! ## Overview
//! Every tool answers with one or more text blocks. Most tools emit the
//! backend result as pretty JSON. List tools with a known element shape
//! project each element onto a fixed key set; nested keys such as
//! `author.username` are flattened to `author`. A result that is not an
//! array falls back to the default rendering, and the block list is never
//! empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use gitlab_gate_contract::ToolName;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::tools::ToolError;

// ============================================================================
// SECTION: Content
// ============================================================================

/// One MCP content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text.
    Text {
        /// Block text.
        text: String,
    },
}

impl ContentBlock {
    /// Builds a text block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
        }
    }

    /// Returns the block text.
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text {
                text,
            } => text,
        }
    }
}

/// Tool call response envelope.
///
/// # Invariants
/// - `content` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResponse {
    /// Ordered content blocks.
    pub content: Vec<ContentBlock>,
}

// ============================================================================
// SECTION: Projections
// ============================================================================

/// Output key and JSON pointer into the source element.
type Projection = &'static [(&'static str, &'static str)];

const EVENT_FIELDS: Projection = &[
    ("id", "/id"),
    ("action_name", "/action_name"),
    ("target_type", "/target_type"),
    ("target_id", "/target_id"),
    ("target_title", "/target_title"),
    ("author", "/author/username"),
    ("created_at", "/created_at"),
];

const COMMIT_FIELDS: Projection = &[
    ("id", "/id"),
    ("short_id", "/short_id"),
    ("title", "/title"),
    ("author_name", "/author_name"),
    ("authored_date", "/authored_date"),
    ("web_url", "/web_url"),
];

const ISSUE_FIELDS: Projection = &[
    ("iid", "/iid"),
    ("title", "/title"),
    ("state", "/state"),
    ("labels", "/labels"),
    ("author", "/author/username"),
    ("created_at", "/created_at"),
    ("updated_at", "/updated_at"),
    ("web_url", "/web_url"),
];

const MERGE_REQUEST_FIELDS: Projection = &[
    ("iid", "/iid"),
    ("title", "/title"),
    ("state", "/state"),
    ("source_branch", "/source_branch"),
    ("target_branch", "/target_branch"),
    ("author", "/author/username"),
    ("draft", "/draft"),
    ("created_at", "/created_at"),
    ("web_url", "/web_url"),
];

const WIKI_PAGE_FIELDS: Projection =
    &[("slug", "/slug"), ("title", "/title"), ("format", "/format"), ("content", "/content")];

const MEMBER_FIELDS: Projection = &[
    ("id", "/id"),
    ("username", "/username"),
    ("name", "/name"),
    ("state", "/state"),
    ("access_level", "/access_level"),
    ("expires_at", "/expires_at"),
];

const NOTE_FIELDS: Projection = &[
    ("id", "/id"),
    ("body", "/body"),
    ("author", "/author/username"),
    ("created_at", "/created_at"),
    ("system", "/system"),
];

const DISCUSSION_NOTE_FIELDS: Projection = &[
    ("id", "/id"),
    ("author", "/author/username"),
    ("body", "/body"),
    ("created_at", "/created_at"),
];

const WIKI_METADATA_FIELDS: Projection =
    &[("slug", "/slug"), ("title", "/title"), ("format", "/format"), ("encoding", "/encoding")];

/// Copies the projected fields present in `source`.
fn project(source: &Value, fields: Projection) -> Value {
    let mut out = Map::new();
    for (key, pointer) in fields {
        if let Some(value) = source.pointer(pointer) {
            out.insert((*key).to_string(), value.clone());
        }
    }
    Value::Object(out)
}

// ============================================================================
// SECTION: Shapes
// ============================================================================

/// Response shaping strategy for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Pretty JSON of the whole result.
    Default,
    /// Project activity events.
    Events,
    /// Commit list.
    Commits,
    /// Issue list.
    Issues,
    /// Merge request list.
    MergeRequests,
    /// Wiki page list.
    WikiPages,
    /// Member list.
    Members,
    /// Issue note list.
    Notes,
    /// Issue discussions, one block each.
    Discussions,
    /// Single wiki page: metadata then raw content.
    WikiPage,
    /// Wiki attachment: markdown link then record.
    Attachment,
}

impl ResponseShape {
    /// Selects the shape for a tool.
    #[must_use]
    pub const fn for_tool(tool: ToolName) -> Self {
        match tool {
            ToolName::ListProjectEvents => Self::Events,
            ToolName::ListCommits => Self::Commits,
            ToolName::ListIssues => Self::Issues,
            ToolName::ListMergeRequests => Self::MergeRequests,
            ToolName::ListProjectWikiPages | ToolName::ListGroupWikiPages => Self::WikiPages,
            ToolName::ListProjectMembers | ToolName::ListGroupMembers => Self::Members,
            ToolName::ListIssueNotes => Self::Notes,
            ToolName::ListIssueDiscussions => Self::Discussions,
            ToolName::GetProjectWikiPage | ToolName::GetGroupWikiPage => Self::WikiPage,
            ToolName::UploadProjectWikiAttachment | ToolName::UploadGroupWikiAttachment => {
                Self::Attachment
            }
            _ => Self::Default,
        }
    }

    /// Shapes a backend result.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Serialization`] when the result cannot be rendered.
    pub fn normalize(self, result: &Value) -> Result<ToolResponse, ToolError> {
        let content = match self {
            Self::Default => vec![pretty(result)?],
            Self::Events => project_list(result, EVENT_FIELDS)?,
            Self::Commits => project_list(result, COMMIT_FIELDS)?,
            Self::Issues => project_list(result, ISSUE_FIELDS)?,
            Self::MergeRequests => project_list(result, MERGE_REQUEST_FIELDS)?,
            Self::WikiPages => project_list(result, WIKI_PAGE_FIELDS)?,
            Self::Members => project_list(result, MEMBER_FIELDS)?,
            Self::Notes => project_list(result, NOTE_FIELDS)?,
            Self::Discussions => discussions(result)?,
            Self::WikiPage => wiki_page(result)?,
            Self::Attachment => attachment(result)?,
        };
        Ok(ToolResponse {
            content,
        })
    }
}

/// Renders a value as one pretty-JSON block.
fn pretty(value: &Value) -> Result<ContentBlock, ToolError> {
    serde_json::to_string_pretty(value)
        .map(ContentBlock::text)
        .map_err(|_| ToolError::Serialization)
}

/// Projects every array element; non-arrays use the default rendering.
fn project_list(result: &Value, fields: Projection) -> Result<Vec<ContentBlock>, ToolError> {
    let Some(items) = result.as_array() else {
        return Ok(vec![pretty(result)?]);
    };
    let projected: Vec<Value> = items.iter().map(|item| project(item, fields)).collect();
    Ok(vec![pretty(&Value::Array(projected))?])
}

/// One block per discussion with its notes projected.
fn discussions(result: &Value) -> Result<Vec<ContentBlock>, ToolError> {
    let Some(items) = result.as_array() else {
        return Ok(vec![pretty(result)?]);
    };
    if items.is_empty() {
        return Ok(vec![pretty(result)?]);
    }
    items
        .iter()
        .map(|discussion| {
            let notes: Vec<Value> = discussion
                .get("notes")
                .and_then(Value::as_array)
                .map(|notes| {
                    notes.iter().map(|note| project(note, DISCUSSION_NOTE_FIELDS)).collect()
                })
                .unwrap_or_default();
            let field = |name: &str| discussion.get(name).cloned().unwrap_or(Value::Null);
            pretty(&json!({
                "id": field("id"),
                "individual_note": field("individual_note"),
                "notes": notes
            }))
        })
        .collect()
}

/// Metadata block followed by the raw page content when present.
fn wiki_page(result: &Value) -> Result<Vec<ContentBlock>, ToolError> {
    if !result.is_object() {
        return Ok(vec![pretty(result)?]);
    }
    let mut blocks = vec![pretty(&project(result, WIKI_METADATA_FIELDS))?];
    if let Some(content) = result.get("content").and_then(Value::as_str) {
        blocks.push(ContentBlock::text(content));
    }
    Ok(blocks)
}

/// Markdown link block when present, then the full record.
fn attachment(result: &Value) -> Result<Vec<ContentBlock>, ToolError> {
    let mut blocks = Vec::with_capacity(2);
    if let Some(markdown) = result.pointer("/link/markdown").and_then(Value::as_str) {
        blocks.push(ContentBlock::text(markdown));
    }
    blocks.push(pretty(result)?);
    Ok(blocks)
}
