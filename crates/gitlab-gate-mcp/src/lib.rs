// crates/gitlab-gate-mcp/src/lib.rs
// ============================================================================
// Module: GitLab Gate MCP Library
// Description: Request dispatch and access control for GitLab MCP tools.
// Purpose: Turn validated tool calls into GitLab API requests under a mode.
// Dependencies: gitlab-gate-client, gitlab-gate-config, gitlab-gate-contract
// ============================================================================

//! ## Overview
//! Every tool call follows one pipeline, owned by [`ToolRouter`]:
//!
//! 1. resolve the name and authorize it against the [`AccessFilter`];
//! 2. validate the arguments against the tool schema, then cross-field rules;
//! 3. decode them into a typed [`ToolRequest`] and plan the backend calls;
//! 4. execute the [`DispatchPlan`] and shape the result into content blocks.
//!
//! Nothing reaches the backend until steps 1 and 2 pass. [`McpServer`] wraps
//! the router in JSON-RPC over stdio, HTTP, or SSE and audits each request.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod access;
pub mod audit;
pub mod requests;
pub mod response;
pub mod server;
pub mod telemetry;
pub mod tools;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use access::AccessFilter;
pub use audit::McpAuditEvent;
pub use audit::McpAuditSink;
pub use audit::McpFileAuditSink;
pub use audit::McpNoopAuditSink;
pub use audit::McpStderrAuditSink;
pub use audit::SecurityAuditEvent;
pub use requests::Derivation;
pub use requests::DispatchPlan;
pub use requests::Identifier;
pub use requests::ToolRequest;
pub use response::ContentBlock;
pub use response::ResponseShape;
pub use response::ToolResponse;
pub use server::McpServer;
pub use server::McpServerError;
pub use tools::ToolError;
pub use tools::ToolRouter;
pub use validation::ArgumentValidator;
pub use validation::CrossFieldValidator;
