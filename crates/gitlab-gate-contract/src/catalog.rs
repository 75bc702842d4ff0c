// crates/gitlab-gate-contract/src/catalog.rs
// ============================================================================
// Module: Tool Catalog
// Description: Immutable registry of tool descriptors keyed by name.
// Purpose: Resolve tool names and produce listings without runtime mutation.
// Dependencies: thiserror, gitlab-gate-contract::tooling
// ============================================================================

//! ## Overview
//! The [`ToolCatalog`] is built once at startup from a descriptor list and is
//! read-only afterwards. Construction rejects duplicate names and contracts
//! that are not object schemas, so a running gateway never holds an
//! inconsistent catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::tool_name::ToolName;
use crate::tooling::ToolDefinition;
use crate::tooling::ToolDescriptor;
use crate::tooling::tool_descriptors;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building a catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Two descriptors share a name.
    #[error("duplicate tool: {0}")]
    DuplicateTool(ToolName),
    /// A descriptor's input contract is malformed.
    #[error("invalid contract for {tool}: {message}")]
    InvalidContract {
        /// Offending tool.
        tool: ToolName,
        /// Problem description.
        message: String,
    },
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Immutable tool registry.
///
/// # Invariants
/// - Names are unique.
/// - Listing order equals registration order.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    /// Descriptors in registration order.
    tools: Vec<ToolDescriptor>,
    /// Name to position in `tools`.
    index: BTreeMap<ToolName, usize>,
}

impl ToolCatalog {
    /// Builds a catalog from descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when names repeat or a contract is not an
    /// object schema with a `properties` map.
    pub fn new(tools: Vec<ToolDescriptor>) -> Result<Self, CatalogError> {
        let mut index = BTreeMap::new();
        for (position, tool) in tools.iter().enumerate() {
            check_contract(tool)?;
            if index.insert(tool.name, position).is_some() {
                return Err(CatalogError::DuplicateTool(tool.name));
            }
        }
        Ok(Self { tools, index })
    }

    /// Builds the catalog of every built-in tool.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the built-in descriptors are inconsistent.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(tool_descriptors())
    }

    /// Returns every descriptor in registration order.
    #[must_use]
    pub fn list(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Resolves a tool by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        let name = ToolName::parse(name)?;
        self.get(name)
    }

    /// Resolves a tool by identifier.
    #[must_use]
    pub fn get(&self, name: ToolName) -> Option<&ToolDescriptor> {
        self.index.get(&name).and_then(|position| self.tools.get(*position))
    }

    /// Returns listing definitions for descriptors accepted by `include`.
    #[must_use]
    pub fn definitions<F>(&self, include: F) -> Vec<ToolDefinition>
    where
        F: Fn(&ToolDescriptor) -> bool,
    {
        self.tools.iter().filter(|tool| include(tool)).map(ToolDescriptor::definition).collect()
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true when no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Checks that a contract is an object schema with a properties map.
fn check_contract(tool: &ToolDescriptor) -> Result<(), CatalogError> {
    let invalid = |message: &str| CatalogError::InvalidContract {
        tool: tool.name,
        message: message.to_string(),
    };
    let schema =
        tool.input_schema.as_object().ok_or_else(|| invalid("contract must be an object"))?;
    if schema.get("type").and_then(serde_json::Value::as_str) != Some("object") {
        return Err(invalid("contract type must be object"));
    }
    if !schema.get("properties").is_some_and(serde_json::Value::is_object) {
        return Err(invalid("contract properties must be an object"));
    }
    Ok(())
}
