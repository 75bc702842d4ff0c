// crates/gitlab-gate-mcp/src/access.rs
// ============================================================================
// Module: Access Control
// Description: Read-only mode enforcement for tool listing and invocation.
// Purpose: Gate every tool against the process-wide restrictive flag.
// Dependencies: gitlab-gate-contract
// ============================================================================

//! ## Overview
//! The [`AccessFilter`] receives the read-only flag at construction and never
//! consults ambient process state afterwards. Listing and invocation apply the
//! same eligibility rule, so a tool hidden from `tools/list` can never be
//! called.

// ============================================================================
// SECTION: Imports
// ============================================================================

use gitlab_gate_contract::ToolCatalog;
use gitlab_gate_contract::ToolDefinition;
use gitlab_gate_contract::ToolDescriptor;

use crate::tools::ToolError;

// ============================================================================
// SECTION: Access Filter
// ============================================================================

/// Read-only mode gate.
///
/// # Invariants
/// - The mode is fixed for the lifetime of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessFilter {
    /// Restrictive mode flag.
    read_only: bool,
}

impl AccessFilter {
    /// Creates a filter for the given mode.
    #[must_use]
    pub const fn new(read_only: bool) -> Self {
        Self {
            read_only,
        }
    }

    /// Returns true when the gateway runs in read-only mode.
    #[must_use]
    pub const fn read_only(&self) -> bool {
        self.read_only
    }

    /// Returns true when the tool may be listed and invoked under this mode.
    #[must_use]
    pub fn permits(&self, tool: &ToolDescriptor) -> bool {
        !self.read_only || tool.is_read_only()
    }

    /// Returns the listing visible under this mode, in catalog order.
    #[must_use]
    pub fn list_visible(&self, catalog: &ToolCatalog) -> Vec<ToolDefinition> {
        catalog.definitions(|tool| self.permits(tool))
    }

    /// Resolves `name` and checks it against the mode.
    ///
    /// Lookup happens first so the error names the right failure: unknown
    /// names are reported as unknown in either mode.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] for unregistered names and
    /// [`ToolError::AccessDenied`] for mutating tools under read-only mode.
    pub fn authorize<'a>(
        &self,
        catalog: &'a ToolCatalog,
        name: &str,
    ) -> Result<&'a ToolDescriptor, ToolError> {
        let tool = catalog.lookup(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        if !self.permits(tool) {
            return Err(ToolError::AccessDenied(name.to_string()));
        }
        Ok(tool)
    }
}
