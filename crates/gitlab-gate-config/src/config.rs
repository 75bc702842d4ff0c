// crates/gitlab-gate-config/src/config.rs
// ============================================================================
// Module: GitLab Gate Configuration
// Description: Configuration loading and validation for GitLab Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits,
//! then environment overrides are applied and the result is validated.
//! Credentials never live in the file: the access token is read from the
//! environment variable named by `gitlab.token_env`.
//!
//! Environment access goes through an [`EnvLookup`] so loading can be tested
//! without mutating process state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "gitlab-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "GITLAB_GATE_CONFIG";
/// Environment variable overriding `gitlab.api_url`.
pub const API_URL_ENV_VAR: &str = "GITLAB_API_URL";
/// Environment variable overriding `read_only`.
pub const READ_ONLY_ENV_VAR: &str = "GITLAB_READ_ONLY_MODE";
/// Default environment variable holding the access token.
pub const DEFAULT_TOKEN_ENV: &str = "GITLAB_PERSONAL_ACCESS_TOKEN";
/// Default GitLab REST API base URL.
pub const DEFAULT_API_URL: &str = "https://gitlab.com/api/v4";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum GitLab request timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 600_000;

/// Environment lookup used during loading.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// GitLab Gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    /// Restrictive mode: only read-only tools are listed and invokable.
    #[serde(default)]
    pub read_only: bool,
    /// Server transport configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// GitLab client configuration.
    #[serde(default)]
    pub gitlab: GitlabConfig,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Path the configuration was loaded from (not serialized).
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl GatewayConfig {
    /// Loads configuration using process environment and default resolution.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, &|name| env::var(name).ok())
    }

    /// Loads configuration with an explicit environment lookup.
    ///
    /// Resolution order: explicit path (must exist), then [`CONFIG_ENV_VAR`],
    /// then [`DEFAULT_CONFIG_NAME`] when present, then built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_with_env(path: Option<&Path>, env: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let mut config = match resolve_path(path, env)? {
            Some(resolved) => Self::from_file(&resolved)?,
            None => Self::default(),
        };
        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file without overrides or validation.
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Applies [`API_URL_ENV_VAR`] and [`READ_ONLY_ENV_VAR`] overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an override value is malformed.
    pub fn apply_env_overrides(&mut self, env: EnvLookup<'_>) -> Result<(), ConfigError> {
        if let Some(url) = env(API_URL_ENV_VAR) {
            let url = url.trim();
            if !url.is_empty() {
                self.gitlab.api_url = url.to_string();
            }
        }
        if let Some(flag) = env(READ_ONLY_ENV_VAR) {
            self.read_only = parse_flag(READ_ONLY_ENV_VAR, &flag)?;
        }
        Ok(())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.gitlab.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

/// Supported MCP transport types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerTransport {
    /// Use stdin/stdout transport.
    #[default]
    Stdio,
    /// Use HTTP JSON-RPC transport.
    Http,
    /// Use SSE transport for responses.
    Sse,
}

impl ServerTransport {
    /// Returns the transport label used in audit events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
            Self::Sse => "sse",
        }
    }
}

/// Server transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Transport type for MCP.
    #[serde(default)]
    pub transport: ServerTransport,
    /// Bind address for HTTP or SSE transports.
    #[serde(default)]
    pub bind: Option<String>,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            bind: None,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Validates server transport configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_body_bytes must be greater than zero".to_string(),
            ));
        }
        match self.transport {
            ServerTransport::Http | ServerTransport::Sse => {
                let addr = self.bind_addr()?;
                if !addr.ip().is_loopback() {
                    return Err(ConfigError::Invalid(
                        "http/sse bind address must be loopback".to_string(),
                    ));
                }
            }
            ServerTransport::Stdio => {
                if self.bind.is_some() {
                    return Err(ConfigError::Invalid(
                        "stdio transport does not accept a bind address".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Parses the configured bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the address is missing or malformed.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let bind = self.bind.as_deref().unwrap_or_default().trim();
        if bind.is_empty() {
            return Err(ConfigError::Invalid(
                "http/sse transport requires bind address".to_string(),
            ));
        }
        bind.parse().map_err(|_| ConfigError::Invalid("invalid bind address".to_string()))
    }
}

/// GitLab REST client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GitlabConfig {
    /// REST API base URL, including the `/api/v4` prefix.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Name of the environment variable holding the access token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum accepted response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// User-Agent header sent to GitLab.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for GitlabConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_env: default_token_env(),
            timeout_ms: default_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

impl GitlabConfig {
    /// Validates GitLab client configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::Invalid(
                "gitlab.api_url must include http:// or https://".to_string(),
            ));
        }
        if self.token_env.trim().is_empty() {
            return Err(ConfigError::Invalid("gitlab.token_env must be non-empty".to_string()));
        }
        if self.timeout_ms == 0 || self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "gitlab.timeout_ms must be between 1 and {MAX_TIMEOUT_MS}"
            )));
        }
        if self.max_response_bytes == 0 {
            return Err(ConfigError::Invalid(
                "gitlab.max_response_bytes must be greater than zero".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("gitlab.user_agent must be non-empty".to_string()));
        }
        Ok(())
    }

    /// Reads the access token from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the variable is unset or empty.
    pub fn access_token(&self) -> Result<String, ConfigError> {
        self.access_token_with_env(&|name| env::var(name).ok())
    }

    /// Reads the access token through an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the variable is unset or empty.
    pub fn access_token_with_env(&self, env: EnvLookup<'_>) -> Result<String, ConfigError> {
        let token = env(&self.token_env).unwrap_or_default();
        let token = token.trim();
        if token.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "access token missing: set {}",
                self.token_env
            )));
        }
        Ok(token.to_string())
    }
}

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Enable structured audit logging.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional audit log path (JSON lines). Stderr when absent.
    #[serde(default)]
    pub path: Option<String>,
    /// Include raw tool arguments in audit events (explicit opt-in).
    #[serde(default)]
    pub log_arguments: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
            log_arguments: false,
        }
    }
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI, environment, or the default name.
///
/// Returns `None` when no explicit source is given and the default file does
/// not exist.
fn resolve_path(path: Option<&Path>, env: EnvLookup<'_>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(env_path) = env(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(Some(PathBuf::from(env_path)));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default.is_file().then_some(default))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Parses a boolean environment flag.
fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::Invalid(format!("{name} must be true, false, 1, or 0"))),
    }
}

/// Default maximum request body size.
pub(crate) const fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Default GitLab API URL.
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Default token environment variable name.
fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

/// Default GitLab request timeout.
pub(crate) const fn default_timeout_ms() -> u64 {
    30_000
}

/// Default maximum GitLab response size.
pub(crate) const fn default_max_response_bytes() -> usize {
    16 * 1024 * 1024
}

/// Default User-Agent header.
fn default_user_agent() -> String {
    format!("gitlab-gate/{}", env!("CARGO_PKG_VERSION"))
}

/// Default audit logging toggle.
pub(crate) const fn default_audit_enabled() -> bool {
    true
}
