// crates/gitlab-gate-mcp/src/requests/wiki.rs
// ============================================================================
// Module: Wiki Requests
// Description: Project and group wiki tool arguments.
// Purpose: Plan wiki page and attachment backend calls for either owner.
// Dependencies: base64, gitlab-gate-client, serde
// ============================================================================

//! ## Overview
//! Project and group wikis share one API shape under different roots. The
//! owner wrappers [`ProjectWiki`] and [`GroupWiki`] decode the owner id field
//! and hand the remaining arguments a [`WikiOwner`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use gitlab_gate_client::ApiRequest;
use gitlab_gate_client::UploadRequest;
use serde::Deserialize;

use super::Body;
use super::Derivation;
use super::DispatchPlan;
use super::Identifier;
use super::Operation;
use super::scoped_path;
use crate::tools::ToolError;

// ============================================================================
// SECTION: Owners
// ============================================================================

/// Resolved wiki owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiOwner {
    /// `projects` or `groups`.
    root: &'static str,
    /// Owner id.
    id: Identifier,
}

impl WikiOwner {
    /// Path segments below the owner's wiki.
    fn path(&self, rest: &[&str]) -> Vec<String> {
        let mut path = scoped_path(self.root, &self.id, &["wikis"]);
        path.extend(rest.iter().map(|segment| (*segment).to_string()));
        path
    }
}

/// Wiki operation that runs against either owner.
pub trait WikiOperation {
    /// Builds the dispatch plan for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Validation`] when an argument cannot be converted
    /// into its wire form.
    fn plan_for(self, owner: WikiOwner) -> Result<DispatchPlan, ToolError>;
}

/// Project wiki arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectWiki<T> {
    /// Owning project.
    pub project_id: Identifier,
    /// Operation arguments.
    #[serde(flatten)]
    pub args: T,
}

impl<T: WikiOperation> Operation for ProjectWiki<T> {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        self.args.plan_for(WikiOwner {
            root: "projects",
            id: self.project_id,
        })
    }
}

/// Group wiki arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupWiki<T> {
    /// Owning group.
    pub group_id: Identifier,
    /// Operation arguments.
    #[serde(flatten)]
    pub args: T,
}

impl<T: WikiOperation> Operation for GroupWiki<T> {
    fn plan(self) -> Result<DispatchPlan, ToolError> {
        self.args.plan_for(WikiOwner {
            root: "groups",
            id: self.group_id,
        })
    }
}

// ============================================================================
// SECTION: Operations
// ============================================================================

/// List wiki pages.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPages {
    /// Include page content.
    pub with_content: Option<bool>,
}

impl WikiOperation for ListPages {
    fn plan_for(self, owner: WikiOwner) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::get(owner.path(&[])).query_opt("with_content", self.with_content);
        Ok(DispatchPlan::Request(request))
    }
}

/// Fetch one wiki page.
#[derive(Debug, Clone, Deserialize)]
pub struct GetPage {
    /// Page slug.
    pub slug: String,
    /// Page version.
    pub version: Option<String>,
    /// Return rendered HTML.
    pub render_html: Option<bool>,
}

impl WikiOperation for GetPage {
    fn plan_for(self, owner: WikiOwner) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::get(owner.path(&[self.slug.as_str()]))
            .query_opt("version", self.version)
            .query_opt("render_html", self.render_html);
        Ok(DispatchPlan::Request(request))
    }
}

/// Create a wiki page.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePage {
    /// Page title.
    pub title: String,
    /// Page content.
    pub content: String,
    /// Markup format.
    pub format: Option<String>,
}

impl WikiOperation for CreatePage {
    fn plan_for(self, owner: WikiOwner) -> Result<DispatchPlan, ToolError> {
        let body = Body::new()
            .set("title", self.title)
            .set("content", self.content)
            .set_opt("format", self.format)
            .build();
        Ok(DispatchPlan::Request(ApiRequest::post(owner.path(&[])).json(body)))
    }
}

/// Update a wiki page.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePage {
    /// Page slug.
    pub slug: String,
    /// New title.
    pub title: Option<String>,
    /// New content.
    pub content: Option<String>,
    /// Markup format.
    pub format: Option<String>,
}

impl WikiOperation for UpdatePage {
    fn plan_for(self, owner: WikiOwner) -> Result<DispatchPlan, ToolError> {
        let body = Body::new()
            .set_opt("title", self.title)
            .set_opt("content", self.content)
            .set_opt("format", self.format)
            .build();
        Ok(DispatchPlan::Request(ApiRequest::put(owner.path(&[self.slug.as_str()])).json(body)))
    }
}

/// Delete a wiki page.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletePage {
    /// Page slug.
    pub slug: String,
}

impl WikiOperation for DeletePage {
    fn plan_for(self, owner: WikiOwner) -> Result<DispatchPlan, ToolError> {
        let request = ApiRequest::delete(owner.path(&[self.slug.as_str()]));
        Ok(DispatchPlan::Derived {
            request,
            derive: Derivation::Acknowledge {
                status: "deleted",
                subject: vec![("slug", self.slug)],
            },
        })
    }
}

/// Upload a wiki attachment.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadAttachment {
    /// Attachment file name.
    pub file_name: String,
    /// Base64-encoded content.
    pub content: String,
    /// Wiki branch.
    pub branch: Option<String>,
}

impl WikiOperation for UploadAttachment {
    fn plan_for(self, owner: WikiOwner) -> Result<DispatchPlan, ToolError> {
        let content = STANDARD.decode(self.content.trim()).map_err(|err| {
            ToolError::Validation(format!("Invalid arguments: content: not valid base64 ({err})"))
        })?;
        Ok(DispatchPlan::Upload(UploadRequest {
            path: owner.path(&["attachments"]),
            file_name: self.file_name,
            content,
            branch: self.branch,
        }))
    }
}
