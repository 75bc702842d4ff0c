// crates/gitlab-gate-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for gitlab-gate-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::BTreeMap;

use gitlab_gate_config::GatewayConfig;
use gitlab_gate_config::ServerTransport;

/// Parses a TOML string into a `GatewayConfig` for tests.
pub fn config_from_toml(toml_str: &str) -> Result<GatewayConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<GatewayConfig, toml::de::Error> {
    config_from_toml("")
}

/// Returns a minimal config bound to the given transport and address.
pub fn config_with_transport(
    transport: ServerTransport,
    bind: Option<&str>,
) -> Result<GatewayConfig, toml::de::Error> {
    let mut config = minimal_config()?;
    config.server.transport = transport;
    config.server.bind = bind.map(str::to_string);
    Ok(config)
}

/// Fixed environment used in place of process state.
#[derive(Debug, Default)]
pub struct FakeEnv {
    /// Variables visible to the loader.
    vars: BTreeMap<String, String>,
}

impl FakeEnv {
    /// Adds a variable.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    /// Looks up a variable.
    pub fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
