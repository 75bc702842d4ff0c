// crates/gitlab-gate-mcp/src/tools.rs
// ============================================================================
// Module: Tool Router
// Description: Tool listing, invocation pipeline, and error translation.
// Purpose: Run each tool call through access, validation, dispatch, and shaping.
// Dependencies: gitlab-gate-client, gitlab-gate-contract, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`ToolRouter`] owns the invocation pipeline:
//!
//! 1. catalog lookup and the read-only gate ([`AccessFilter`]),
//! 2. structural validation ([`ArgumentValidator`]),
//! 3. cross-field validation ([`CrossFieldValidator`]),
//! 4. typed decoding and planning ([`ToolRequest`]),
//! 5. backend execution of the [`DispatchPlan`],
//! 6. response shaping ([`ResponseShape`]).
//!
//! Steps 1-4 are pure and exposed together as [`ToolRouter::prepare`], so no
//! backend call is made until every check has passed. The router holds no
//! mutable state; clones share the catalog, validators, and backend.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use gitlab_gate_client::BackendError;
use gitlab_gate_client::GitlabBackend;
use gitlab_gate_contract::CatalogError;
use gitlab_gate_contract::ToolCatalog;
use gitlab_gate_contract::ToolDefinition;
use gitlab_gate_contract::ToolName;
use serde_json::Value;
use thiserror::Error;

use crate::access::AccessFilter;
use crate::requests::DispatchPlan;
use crate::requests::ToolRequest;
use crate::response::ResponseShape;
use crate::response::ToolResponse;
use crate::validation::ArgumentValidator;
use crate::validation::CrossFieldValidator;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Tool invocation failures. Display strings are the caller-facing messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Arguments failed structural or cross-field validation.
    #[error("{0}")]
    Validation(String),
    /// The tool exists but is not eligible under read-only mode.
    #[error("Tool '{0}' is not available in read-only mode")]
    AccessDenied(String),
    /// The tool name is not registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    /// The backend call failed; the message is passed through verbatim.
    #[error("{0}")]
    Backend(String),
    /// The backend result could not be serialized into a response.
    #[error("serialization failed")]
    Serialization,
}

impl ToolError {
    /// Stable label used in audit events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::AccessDenied(_) => "access_denied",
            Self::UnknownTool(_) => "unknown_tool",
            Self::Backend(_) => "backend",
            Self::Serialization => "serialization",
        }
    }
}

impl From<BackendError> for ToolError {
    fn from(err: BackendError) -> Self {
        Self::Backend(err.to_string())
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Tool listing and invocation entry point.
///
/// # Invariants
/// - The catalog and read-only mode are fixed at construction.
/// - No backend call happens before both validation stages succeed.
#[derive(Clone)]
pub struct ToolRouter {
    /// Immutable tool catalog.
    catalog: Arc<ToolCatalog>,
    /// Compiled input contracts.
    validator: Arc<ArgumentValidator>,
    /// Read-only gate.
    access: AccessFilter,
    /// GitLab backend.
    backend: Arc<dyn GitlabBackend>,
}

impl ToolRouter {
    /// Builds a router over `catalog`, compiling every input contract.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidContract`] when a contract does not
    /// compile.
    pub fn new(
        catalog: Arc<ToolCatalog>,
        backend: Arc<dyn GitlabBackend>,
        read_only: bool,
    ) -> Result<Self, CatalogError> {
        let validator = ArgumentValidator::new(&catalog)?;
        Ok(Self {
            catalog,
            validator: Arc::new(validator),
            access: AccessFilter::new(read_only),
            backend,
        })
    }

    /// Returns true when the router runs in read-only mode.
    #[must_use]
    pub const fn read_only(&self) -> bool {
        self.access.read_only()
    }

    /// Returns the tool catalog.
    #[must_use]
    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Lists the tools visible under the current mode, in catalog order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.access.list_visible(&self.catalog)
    }

    /// Runs every pre-dispatch check and returns the backend plan.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's [`ToolError`].
    pub fn prepare(
        &self,
        name: &str,
        arguments: Option<Value>,
    ) -> Result<(ToolName, DispatchPlan), ToolError> {
        let tool = self.access.authorize(&self.catalog, name)?;
        let arguments = self.validator.validate(tool, arguments.as_ref())?;
        CrossFieldValidator.validate(&tool.cross_field, arguments)?;
        let request = ToolRequest::decode(tool.name, arguments.clone())?;
        Ok((tool.name, request.plan()?))
    }

    /// Invokes a tool and returns the shaped response.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] when any pipeline stage or the backend fails.
    pub async fn handle_tool_call(
        &self,
        name: &str,
        arguments: Option<Value>,
    ) -> Result<ToolResponse, ToolError> {
        let (tool, plan) = self.prepare(name, arguments)?;
        let result = self.execute(plan).await?;
        ResponseShape::for_tool(tool).normalize(&result)
    }

    /// Executes a dispatch plan against the backend.
    async fn execute(&self, plan: DispatchPlan) -> Result<Value, ToolError> {
        match plan {
            DispatchPlan::Request(request) => Ok(self.backend.execute(request).await?),
            DispatchPlan::WriteFile(write) => Ok(self.backend.write_file(write).await?),
            DispatchPlan::PushFiles(writes) => {
                let mut results = Vec::with_capacity(writes.len());
                for write in writes {
                    results.push(self.backend.write_file(write).await?);
                }
                Ok(Value::Array(results))
            }
            DispatchPlan::Upload(upload) => Ok(self.backend.upload(upload).await?),
            DispatchPlan::Derived {
                request,
                derive,
            } => {
                let result = self.backend.execute(request).await?;
                Ok(derive.apply(result))
            }
        }
    }
}

#[cfg(test)]
mod tests;
