// crates/gitlab-gate-contract/src/lib.rs
// ============================================================================
// Module: GitLab Gate Contract
// Description: Canonical tool identifiers, input contracts, and catalog.
// Purpose: Single source of truth for the MCP tool surface.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `gitlab-gate-contract` defines every tool the gateway exposes: its stable
//! name, description, JSON Schema input contract, read-only eligibility, and
//! the cross-field rules (pagination, calendar fields) it declares. The
//! [`ToolCatalog`] is built once at startup and is read-only afterwards.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod schemas;
pub mod tool_name;
pub mod tooling;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::CatalogError;
pub use catalog::ToolCatalog;
pub use tool_name::ToolName;
pub use tooling::CrossFieldRules;
pub use tooling::ToolAccess;
pub use tooling::ToolDefinition;
pub use tooling::ToolDescriptor;
pub use tooling::tool_descriptors;
