//! Config file resolution and environment override tests.
// crates/gitlab-gate-config/tests/config_loading.rs
// =============================================================================
// Module: Config Loading Tests
// Description: Validate file loading limits and environment overrides.
// Purpose: Ensure loading fails closed and overrides apply after parsing.
// =============================================================================

use std::fs;

use gitlab_gate_config::API_URL_ENV_VAR;
use gitlab_gate_config::CONFIG_ENV_VAR;
use gitlab_gate_config::ConfigError;
use gitlab_gate_config::GatewayConfig;
use gitlab_gate_config::READ_ONLY_ENV_VAR;
use tempfile::TempDir;

mod common;

use common::FakeEnv;

type TestResult = Result<(), String>;

fn write_config(dir: &TempDir, content: &[u8]) -> Result<std::path::PathBuf, String> {
    let path = dir.path().join("gitlab-gate.toml");
    fs::write(&path, content).map_err(|err| err.to_string())?;
    Ok(path)
}

#[test]
fn explicit_path_is_loaded_and_recorded() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, b"read_only = true\n")?;
    let env = FakeEnv::default();
    let config = GatewayConfig::load_with_env(Some(&path), &|name| env.get(name))
        .map_err(|err| err.to_string())?;
    if !config.read_only {
        return Err("read_only not loaded".to_string());
    }
    if config.source.as_deref() != Some(path.as_path()) {
        return Err("source path not recorded".to_string());
    }
    Ok(())
}

#[test]
fn missing_explicit_path_is_io_error() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    let env = FakeEnv::default();
    match GatewayConfig::load_with_env(Some(&path), &|name| env.get(name)) {
        Err(ConfigError::Io(_)) => Ok(()),
        other => Err(format!("expected io error, got {:?}", other.map(|_| ()))),
    }
}

#[test]
fn env_var_path_is_used_when_no_explicit_path() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, b"[gitlab]\ntimeout_ms = 1234\n")?;
    let env = FakeEnv::default().with(CONFIG_ENV_VAR, &path.to_string_lossy());
    let config =
        GatewayConfig::load_with_env(None, &|name| env.get(name)).map_err(|err| err.to_string())?;
    if config.gitlab.timeout_ms != 1234 {
        return Err("env config path not honored".to_string());
    }
    Ok(())
}

#[test]
fn oversized_file_is_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let mut content = b"# ".to_vec();
    content.extend(std::iter::repeat_n(b'x', 1024 * 1024));
    let path = write_config(&dir, &content)?;
    let env = FakeEnv::default();
    match GatewayConfig::load_with_env(Some(&path), &|name| env.get(name)) {
        Err(ConfigError::Invalid(message)) if message.contains("size limit") => Ok(()),
        other => Err(format!("expected size error, got {:?}", other.map(|_| ()))),
    }
}

#[test]
fn non_utf8_file_is_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, &[0xff, 0xfe, 0x00])?;
    let env = FakeEnv::default();
    match GatewayConfig::load_with_env(Some(&path), &|name| env.get(name)) {
        Err(ConfigError::Invalid(message)) if message.contains("utf-8") => Ok(()),
        other => Err(format!("expected utf-8 error, got {:?}", other.map(|_| ()))),
    }
}

#[test]
fn malformed_toml_is_parse_error() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, b"read_only = maybe\n")?;
    let env = FakeEnv::default();
    match GatewayConfig::load_with_env(Some(&path), &|name| env.get(name)) {
        Err(ConfigError::Parse(_)) => Ok(()),
        other => Err(format!("expected parse error, got {:?}", other.map(|_| ()))),
    }
}

#[test]
fn env_overrides_apply_after_parsing() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, b"read_only = false\n")?;
    let env = FakeEnv::default()
        .with(READ_ONLY_ENV_VAR, "1")
        .with(API_URL_ENV_VAR, "https://self-hosted.example/api/v4");
    let config = GatewayConfig::load_with_env(Some(&path), &|name| env.get(name))
        .map_err(|err| err.to_string())?;
    if !config.read_only {
        return Err("read-only override not applied".to_string());
    }
    if config.gitlab.api_url != "https://self-hosted.example/api/v4" {
        return Err("api url override not applied".to_string());
    }
    Ok(())
}

#[test]
fn malformed_read_only_override_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    let env = FakeEnv::default().with(READ_ONLY_ENV_VAR, "sometimes");
    match config.apply_env_overrides(&|name| env.get(name)) {
        Err(ConfigError::Invalid(message)) if message.contains(READ_ONLY_ENV_VAR) => Ok(()),
        other => Err(format!("expected invalid override, got {other:?}")),
    }
}

#[test]
fn overridden_api_url_is_validated() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, b"")?;
    let env = FakeEnv::default().with(API_URL_ENV_VAR, "gitlab.example.com");
    match GatewayConfig::load_with_env(Some(&path), &|name| env.get(name)) {
        Err(ConfigError::Invalid(message)) if message.contains("gitlab.api_url") => Ok(()),
        other => Err(format!("expected invalid url, got {:?}", other.map(|_| ()))),
    }
}
