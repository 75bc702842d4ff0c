//! Config defaults and core validation tests for gitlab-gate-config.
// crates/gitlab-gate-config/tests/config_defaults.rs
// =============================================================================
// Module: Config Defaults and Core Validation Tests
// Description: Validate default behavior and core config invariants.
// Purpose: Ensure minimal config is valid and invalid settings fail closed.
// =============================================================================

use gitlab_gate_config::ConfigError;
use gitlab_gate_config::DEFAULT_API_URL;
use gitlab_gate_config::DEFAULT_TOKEN_ENV;
use gitlab_gate_config::ServerTransport;

mod common;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn default_config_validates() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if config.read_only {
        return Err("read_only should default to false".to_string());
    }
    if config.server.transport != ServerTransport::Stdio {
        return Err("transport should default to stdio".to_string());
    }
    if config.gitlab.api_url != DEFAULT_API_URL || config.gitlab.token_env != DEFAULT_TOKEN_ENV {
        return Err("gitlab defaults drifted".to_string());
    }
    if !config.audit.enabled || config.audit.log_arguments {
        return Err("audit defaults drifted".to_string());
    }
    Ok(())
}

#[test]
fn full_document_parses() -> TestResult {
    let config = common::config_from_toml(
        r#"
read_only = true

[server]
transport = "http"
bind = "127.0.0.1:8080"
max_body_bytes = 4096

[gitlab]
api_url = "https://gitlab.example.com/api/v4"
token_env = "GL_TOKEN"
timeout_ms = 5000
max_response_bytes = 65536
user_agent = "gate-test"

[audit]
enabled = false
log_arguments = true
"#,
    )
    .map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if !config.read_only || config.server.max_body_bytes != 4096 {
        return Err("top-level values not applied".to_string());
    }
    if config.gitlab.token_env != "GL_TOKEN" || config.gitlab.timeout_ms != 5000 {
        return Err("gitlab values not applied".to_string());
    }
    Ok(())
}

#[test]
fn unknown_transport_is_a_parse_error() -> TestResult {
    match common::config_from_toml("[server]\ntransport = \"websocket\"\n") {
        Err(_) => Ok(()),
        Ok(_) => Err("expected parse failure".to_string()),
    }
}

#[test]
fn http_requires_bind() -> TestResult {
    let config = common::config_with_transport(ServerTransport::Http, None)
        .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "requires bind address")
}

#[test]
fn sse_rejects_non_loopback_bind() -> TestResult {
    let config = common::config_with_transport(ServerTransport::Sse, Some("0.0.0.0:8080"))
        .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "must be loopback")
}

#[test]
fn malformed_bind_is_rejected() -> TestResult {
    let config = common::config_with_transport(ServerTransport::Http, Some("localhost"))
        .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "invalid bind address")
}

#[test]
fn stdio_rejects_bind() -> TestResult {
    let config = common::config_with_transport(ServerTransport::Stdio, Some("127.0.0.1:8080"))
        .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "does not accept a bind address")
}

#[test]
fn zero_body_limit_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.max_body_bytes = 0;
    assert_invalid(config.validate(), "max_body_bytes")
}

#[test]
fn api_url_requires_http_scheme() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.gitlab.api_url = "ftp://gitlab.example.com".to_string();
    assert_invalid(config.validate(), "gitlab.api_url")
}

#[test]
fn zero_limits_are_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.gitlab.timeout_ms = 0;
    assert_invalid(config.validate(), "gitlab.timeout_ms")?;
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.gitlab.max_response_bytes = 0;
    assert_invalid(config.validate(), "gitlab.max_response_bytes")
}

#[test]
fn empty_token_env_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.gitlab.token_env = "  ".to_string();
    assert_invalid(config.validate(), "gitlab.token_env")
}

#[test]
fn empty_audit_path_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.audit.path = Some(String::new());
    assert_invalid(config.validate(), "audit.path")
}

#[test]
fn access_token_comes_from_named_variable() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    let env = common::FakeEnv::default().with(DEFAULT_TOKEN_ENV, " glpat-secret ");
    let token =
        config.gitlab.access_token_with_env(&|name| env.get(name)).map_err(|err| err.to_string())?;
    if token != "glpat-secret" {
        return Err(format!("unexpected token {token}"));
    }
    let missing = config.gitlab.access_token_with_env(&|_| None).map(|_| ());
    assert_invalid(missing, DEFAULT_TOKEN_ENV)
}
