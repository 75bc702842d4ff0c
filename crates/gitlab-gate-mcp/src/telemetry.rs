// crates/gitlab-gate-mcp/src/telemetry.rs
// ============================================================================
// Module: MCP Telemetry Labels
// Description: Stable classification labels for MCP requests.
// Purpose: Give audit events fixed method and outcome vocabularies.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Labels here are emitted verbatim in audit records; renaming a variant's
//! label is a breaking change for log consumers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Labels
// ============================================================================

/// MCP request method classification.
///
/// # Invariants
/// - Variants are stable for audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum McpMethod {
    /// JSON-RPC initialize.
    #[serde(rename = "initialize")]
    Initialize,
    /// JSON-RPC ping.
    #[serde(rename = "ping")]
    Ping,
    /// JSON-RPC tools/list.
    #[serde(rename = "tools/list")]
    ToolsList,
    /// JSON-RPC tools/call.
    #[serde(rename = "tools/call")]
    ToolsCall,
    /// Client notification (no id).
    #[serde(rename = "notification")]
    Notification,
    /// Invalid or malformed JSON-RPC request.
    #[serde(rename = "invalid")]
    Invalid,
    /// Unsupported JSON-RPC method.
    #[serde(rename = "other")]
    Other,
}

impl McpMethod {
    /// Classifies a JSON-RPC method name.
    #[must_use]
    pub fn classify(method: &str) -> Self {
        match method {
            "initialize" => Self::Initialize,
            "ping" => Self::Ping,
            "tools/list" => Self::ToolsList,
            "tools/call" => Self::ToolsCall,
            _ => Self::Other,
        }
    }

    /// Returns a stable label for the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Ping => "ping",
            Self::ToolsList => "tools/list",
            Self::ToolsCall => "tools/call",
            Self::Notification => "notification",
            Self::Invalid => "invalid",
            Self::Other => "other",
        }
    }
}

/// MCP request outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum McpOutcome {
    /// Successful request.
    Ok,
    /// Failed request.
    Error,
}

impl McpOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}
