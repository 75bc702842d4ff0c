// crates/gitlab-gate-config/src/lib.rs
// ============================================================================
// Module: GitLab Gate Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for gitlab-gate.toml semantics.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! `gitlab-gate-config` defines the configuration model for the gateway:
//! restrictive mode, transport binding, GitLab client limits, and audit
//! logging. Loading is strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
