// crates/gitlab-gate-mcp/src/server.rs
// ============================================================================
// Module: MCP Server
// Description: MCP server implementations for stdio, HTTP, and SSE transports.
// Purpose: Expose GitLab Gate tools via JSON-RPC 2.0.
// Dependencies: axum, gitlab-gate-client, gitlab-gate-config, tokio
// ============================================================================

//! ## Overview
//! The MCP server speaks JSON-RPC 2.0 and always routes tool calls through
//! [`crate::tools::ToolRouter`]. Three transports share one request handler:
//!
//! - stdio: newline-delimited JSON or `Content-Length` framed messages,
//!   answered in the framing of the request;
//! - HTTP: `POST /mcp`, one JSON response per request;
//! - SSE: `POST /mcp`, the response streamed as one `message` event.
//!
//! Request bodies above `max_body_bytes` are rejected before parsing.
//! Notifications (requests without an id) are acknowledged with no response.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::response::Sse;
use axum::response::sse::Event;
use axum::routing::post;
use gitlab_gate_client::GitlabClient;
use gitlab_gate_config::AuditConfig;
use gitlab_gate_config::GatewayConfig;
use gitlab_gate_config::ServerConfig;
use gitlab_gate_config::ServerTransport;
use gitlab_gate_contract::ToolCatalog;
use gitlab_gate_contract::ToolDefinition;
use gitlab_gate_contract::ToolName;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio_stream::wrappers::ReceiverStream;

use crate::audit::McpAuditEvent;
use crate::audit::McpAuditEventParams;
use crate::audit::McpAuditSink;
use crate::audit::McpFileAuditSink;
use crate::audit::McpNoopAuditSink;
use crate::audit::McpStderrAuditSink;
use crate::audit::SecurityAuditEvent;
use crate::telemetry::McpMethod;
use crate::telemetry::McpOutcome;
use crate::tools::ToolError;
use crate::tools::ToolRouter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// HTTP and SSE route.
pub const MCP_PATH: &str = "/mcp";

/// JSON-RPC protocol version.
const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol version reported when the client does not name one.
const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported by `initialize`.
const SERVER_NAME: &str = "gitlab-gate";

/// Upper bound for a single stdio header line.
const MAX_HEADER_LINE_BYTES: u64 = 1024;

/// Response used when the real response cannot be serialized.
const SERIALIZATION_FALLBACK: &str =
    "{\"jsonrpc\":\"2.0\",\"id\":null,\"error\":{\"code\":-32060,\"message\":\"serialization \
     failed\"}}";

// ============================================================================
// SECTION: MCP Server
// ============================================================================

/// MCP server instance.
pub struct McpServer {
    /// Server transport configuration.
    server: ServerConfig,
    /// Shared request handling state.
    state: Arc<ServerState>,
}

impl McpServer {
    /// Builds a new MCP server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the configuration is invalid, the
    /// access token is missing, or the audit log cannot be opened.
    pub fn from_config(config: GatewayConfig) -> Result<Self, McpServerError> {
        config.validate().map_err(|err| McpServerError::Config(err.to_string()))?;
        let client = GitlabClient::from_config(&config.gitlab)
            .map_err(|err| McpServerError::Init(err.to_string()))?;
        let catalog =
            ToolCatalog::builtin().map_err(|err| McpServerError::Init(err.to_string()))?;
        let router = ToolRouter::new(Arc::new(catalog), Arc::new(client), config.read_only)
            .map_err(|err| McpServerError::Init(err.to_string()))?;
        let audit = build_audit_sink(&config.audit)?;
        Ok(Self::new(&config, router, audit))
    }

    /// Builds a server around an existing router and audit sink.
    ///
    /// Emits the startup security event.
    #[must_use]
    pub fn new(config: &GatewayConfig, router: ToolRouter, audit: Arc<dyn McpAuditSink>) -> Self {
        audit.record_security(&SecurityAuditEvent::startup(
            router.read_only(),
            config.server.transport,
            router.list_tools().len(),
        ));
        let state = ServerState {
            router,
            audit,
            max_body_bytes: config.server.max_body_bytes,
            log_arguments: config.audit.log_arguments,
        };
        Self {
            server: config.server.clone(),
            state: Arc::new(state),
        }
    }

    /// Returns the tool router.
    #[must_use]
    pub fn router(&self) -> &ToolRouter {
        &self.state.router
    }

    /// Serves requests using the configured transport.
    ///
    /// # Errors
    ///
    /// Returns [`McpServerError`] when the server fails.
    pub async fn serve(self) -> Result<(), McpServerError> {
        match self.server.transport {
            ServerTransport::Stdio => {
                let reader = BufReader::new(tokio::io::stdin());
                serve_stream(&self.state, reader, tokio::io::stdout()).await
            }
            transport @ (ServerTransport::Http | ServerTransport::Sse) => {
                serve_http(&self.server, self.state, transport).await
            }
        }
    }
}

/// Builds the audit sink named by configuration.
fn build_audit_sink(config: &AuditConfig) -> Result<Arc<dyn McpAuditSink>, McpServerError> {
    if !config.enabled {
        return Ok(Arc::new(McpNoopAuditSink));
    }
    match config.path.as_deref() {
        Some(path) => {
            let sink = McpFileAuditSink::new(Path::new(path))
                .map_err(|err| McpServerError::Init(format!("audit log {path}: {err}")))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(McpStderrAuditSink)),
    }
}

// ============================================================================
// SECTION: Stdio Transport
// ============================================================================

/// Message framing on the stdio transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    /// One JSON message per line.
    Line,
    /// `Content-Length` header block followed by the body.
    Header,
}

/// Result of reading one stdio message.
#[derive(Debug, PartialEq, Eq)]
enum Inbound {
    /// A complete message body.
    Message {
        /// Framing the message arrived in.
        framing: Framing,
        /// Raw message bytes.
        body: Vec<u8>,
    },
    /// A message above the size limit; its bytes were discarded.
    Oversized {
        /// Framing the message arrived in.
        framing: Framing,
        /// Bytes seen before the message was rejected.
        size: usize,
    },
    /// The input stream ended.
    Closed,
}

/// Serves JSON-RPC messages from `reader` until it closes.
async fn serve_stream<R, W>(
    state: &ServerState,
    mut reader: R,
    mut writer: W,
) -> Result<(), McpServerError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let (framing, reply) = match read_message(&mut reader, state.max_body_bytes).await? {
            Inbound::Closed => return Ok(()),
            Inbound::Oversized {
                framing,
                size,
            } => (framing, state.reject_oversized(ServerTransport::Stdio, size)),
            Inbound::Message {
                framing,
                body,
            } => (framing, state.handle_bytes(ServerTransport::Stdio, &body).await),
        };
        if let Some(payload) = reply.payload {
            write_message(&mut writer, framing, &payload).await?;
        }
    }
}

/// Reads one message in either framing.
async fn read_message<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    max_body_bytes: usize,
) -> Result<Inbound, McpServerError> {
    let limit = u64::try_from(max_body_bytes).unwrap_or(u64::MAX).saturating_add(1);
    loop {
        let mut line = Vec::new();
        let read =
            (&mut *reader).take(limit).read_until(b'\n', &mut line).await.map_err(read_error)?;
        if read == 0 {
            return Ok(Inbound::Closed);
        }
        if line.last() != Some(&b'\n') && line.len() > max_body_bytes {
            skip_line(reader).await?;
            return Ok(Inbound::Oversized {
                framing: Framing::Line,
                size: line.len(),
            });
        }
        let text = line.trim_ascii();
        if text.is_empty() {
            continue;
        }
        if let Some(length) = content_length(text)? {
            return read_header_body(reader, length, max_body_bytes).await;
        }
        return Ok(Inbound::Message {
            framing: Framing::Line,
            body: text.to_vec(),
        });
    }
}

/// Parses a `Content-Length` header line; other lines yield `None`.
fn content_length(line: &[u8]) -> Result<Option<usize>, McpServerError> {
    let Ok(text) = std::str::from_utf8(line) else {
        return Ok(None);
    };
    let Some((name, value)) = text.split_once(':') else {
        return Ok(None);
    };
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return Ok(None);
    }
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| McpServerError::Transport("invalid content length".to_string()))
}

/// Reads the rest of a header block and the body it announces.
async fn read_header_body<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    length: usize,
    max_body_bytes: usize,
) -> Result<Inbound, McpServerError> {
    loop {
        let mut line = Vec::new();
        let read = (&mut *reader)
            .take(MAX_HEADER_LINE_BYTES)
            .read_until(b'\n', &mut line)
            .await
            .map_err(read_error)?;
        if read == 0 {
            return Err(McpServerError::Transport("stdio closed inside headers".to_string()));
        }
        if line.trim_ascii().is_empty() {
            break;
        }
    }
    if length > max_body_bytes {
        let skip = u64::try_from(length).unwrap_or(u64::MAX);
        tokio::io::copy(&mut (&mut *reader).take(skip), &mut tokio::io::sink())
            .await
            .map_err(read_error)?;
        return Ok(Inbound::Oversized {
            framing: Framing::Header,
            size: length,
        });
    }
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await.map_err(read_error)?;
    Ok(Inbound::Message {
        framing: Framing::Header,
        body,
    })
}

/// Discards input up to and including the next newline.
async fn skip_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<(), McpServerError> {
    loop {
        let buf = reader.fill_buf().await.map_err(read_error)?;
        if buf.is_empty() {
            return Ok(());
        }
        if let Some(pos) = buf.iter().position(|byte| *byte == b'\n') {
            reader.consume(pos + 1);
            return Ok(());
        }
        let len = buf.len();
        reader.consume(len);
    }
}

/// Writes one message in the given framing.
async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    framing: Framing,
    payload: &[u8],
) -> Result<(), McpServerError> {
    match framing {
        Framing::Header => {
            let header = format!("Content-Length: {}\r\n\r\n", payload.len());
            writer.write_all(header.as_bytes()).await.map_err(write_error)?;
            writer.write_all(payload).await.map_err(write_error)?;
        }
        Framing::Line => {
            writer.write_all(payload).await.map_err(write_error)?;
            writer.write_all(b"\n").await.map_err(write_error)?;
        }
    }
    writer.flush().await.map_err(write_error)
}

/// Maps a stdio read failure.
fn read_error(_: std::io::Error) -> McpServerError {
    McpServerError::Transport("stdio read failed".to_string())
}

/// Maps a stdio write failure.
fn write_error(_: std::io::Error) -> McpServerError {
    McpServerError::Transport("stdio write failed".to_string())
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// Serves JSON-RPC requests over HTTP or SSE.
async fn serve_http(
    server: &ServerConfig,
    state: Arc<ServerState>,
    transport: ServerTransport,
) -> Result<(), McpServerError> {
    let addr = server.bind_addr().map_err(|err| McpServerError::Config(err.to_string()))?;
    let app = match transport {
        ServerTransport::Sse => Router::new().route(MCP_PATH, post(handle_sse)),
        _ => Router::new().route(MCP_PATH, post(handle_http)),
    }
    .with_state(state);
    let label = transport.as_str();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|_| McpServerError::Transport(format!("{label} bind failed")))?;
    axum::serve(listener, app.into_make_service())
        .await
        .map_err(|_| McpServerError::Transport(format!("{label} server failed")))
}

/// Handles HTTP JSON-RPC requests.
async fn handle_http(State(state): State<Arc<ServerState>>, bytes: Bytes) -> Response {
    let reply = state.handle_bytes(ServerTransport::Http, &bytes).await;
    match reply.payload {
        Some(payload) => {
            (reply.status, [(CONTENT_TYPE, "application/json")], payload).into_response()
        }
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Handles SSE JSON-RPC requests.
async fn handle_sse(State(state): State<Arc<ServerState>>, bytes: Bytes) -> Response {
    let reply = state.handle_bytes(ServerTransport::Sse, &bytes).await;
    let Some(payload) = reply.payload else {
        return StatusCode::ACCEPTED.into_response();
    };
    let data = String::from_utf8(payload).unwrap_or_else(|_| SERIALIZATION_FALLBACK.to_string());
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<Event, Infallible>>(1);
    let _ = tx.send(Ok(Event::default().event("message").data(data))).await;
    Sse::new(ReceiverStream::new(rx)).into_response()
}

// ============================================================================
// SECTION: JSON-RPC Handling
// ============================================================================

/// Incoming JSON-RPC request payload.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC protocol version.
    jsonrpc: String,
    /// Request identifier; absent or null for notifications.
    #[serde(default)]
    id: Option<Value>,
    /// Method name.
    method: String,
    /// Optional parameters payload.
    #[serde(default)]
    params: Option<Value>,
}

/// JSON-RPC response envelope.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    /// JSON-RPC protocol version.
    jsonrpc: &'static str,
    /// Request identifier.
    id: Value,
    /// Successful result payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    /// Error payload when the request fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error payload.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    /// Error code.
    code: i64,
    /// Human-readable error message.
    message: String,
}

/// Tool call parameters for JSON-RPC requests.
#[derive(Debug, Deserialize)]
struct ToolCallParams {
    /// Tool name.
    name: String,
    /// Raw JSON arguments.
    #[serde(default)]
    arguments: Option<Value>,
}

/// Tool list response payload.
#[derive(Debug, Serialize)]
struct ToolListResult {
    /// Visible tool definitions.
    tools: Vec<ToolDefinition>,
}

/// Failed request, ready for the error envelope.
#[derive(Debug)]
struct Failure {
    /// HTTP status for the HTTP transport.
    status: StatusCode,
    /// JSON-RPC error code.
    code: i64,
    /// Audit label.
    kind: &'static str,
    /// Caller-facing message.
    message: String,
}

impl Failure {
    /// Protocol-level failure.
    fn protocol(code: i64, kind: &'static str, message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code,
            kind,
            message: message.to_string(),
        }
    }

    /// Tool failure as surfaced in the given mode.
    ///
    /// Under read-only mode an unknown name carries the denial code and
    /// status; only the message tells the two apart.
    fn tool(error: ToolError, read_only: bool) -> Self {
        let unknown = matches!(error, ToolError::UnknownTool(_));
        let mut failure = Self::from(error);
        if read_only && unknown {
            failure.status = StatusCode::FORBIDDEN;
            failure.code = -32003;
        }
        failure
    }

    /// Body over the configured limit.
    fn too_large() -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            code: -32070,
            kind: "request_too_large",
            message: "request body too large".to_string(),
        }
    }
}

impl From<ToolError> for Failure {
    fn from(error: ToolError) -> Self {
        let (status, code) = match &error {
            ToolError::UnknownTool(_) => (StatusCode::BAD_REQUEST, -32601),
            ToolError::Validation(_) => (StatusCode::BAD_REQUEST, -32602),
            ToolError::AccessDenied(_) => (StatusCode::FORBIDDEN, -32003),
            ToolError::Backend(_) => (StatusCode::OK, -32050),
            ToolError::Serialization => (StatusCode::OK, -32060),
        };
        Self {
            status,
            code,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Transport-neutral reply.
#[derive(Debug)]
struct Reply {
    /// HTTP status for the HTTP transport.
    status: StatusCode,
    /// Serialized response; `None` for notifications.
    payload: Option<Vec<u8>>,
}

/// Audit bookkeeping gathered while handling one request.
#[derive(Debug)]
struct RequestInfo {
    /// Request id label.
    request_id: Option<String>,
    /// Method classification.
    method: McpMethod,
    /// Tool name for tools/call.
    tool: Option<ToolName>,
    /// Tool arguments when argument logging is enabled.
    arguments: Option<Value>,
}

impl RequestInfo {
    /// Starts with nothing known about the request.
    const fn new() -> Self {
        Self {
            request_id: None,
            method: McpMethod::Invalid,
            tool: None,
            arguments: None,
        }
    }
}

/// Shared server state for all transports.
struct ServerState {
    /// Tool router for request dispatch.
    router: ToolRouter,
    /// Audit sink.
    audit: Arc<dyn McpAuditSink>,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
    /// Include tool arguments in audit events.
    log_arguments: bool,
}

impl ServerState {
    /// Handles one raw request body.
    async fn handle_bytes(&self, transport: ServerTransport, bytes: &[u8]) -> Reply {
        let mut info = RequestInfo::new();
        if bytes.len() > self.max_body_bytes {
            return self.reject_oversized(transport, bytes.len());
        }
        let request = match parse_request(bytes) {
            Ok(request) => request,
            Err((id, failure)) => {
                return self.finish(transport, bytes.len(), info, id, Err(failure));
            }
        };
        let Some(id) = request.id.clone() else {
            info.method = McpMethod::Notification;
            self.record(transport, bytes.len(), 0, info, None);
            return Reply {
                status: StatusCode::ACCEPTED,
                payload: None,
            };
        };
        info.request_id = Some(request_id_label(&id));
        info.method = McpMethod::classify(&request.method);
        let outcome = self.handle_request(request, &mut info).await;
        self.finish(transport, bytes.len(), info, id, outcome)
    }

    /// Rejects a stdio message that exceeded the size limit while reading.
    fn reject_oversized(&self, transport: ServerTransport, size: usize) -> Reply {
        self.finish(transport, size, RequestInfo::new(), Value::Null, Err(Failure::too_large()))
    }

    /// Dispatches a parsed request by method.
    async fn handle_request(
        &self,
        request: JsonRpcRequest,
        info: &mut RequestInfo,
    ) -> Result<Value, Failure> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(Failure::protocol(-32600, "invalid_request", "invalid json-rpc version"));
        }
        match request.method.as_str() {
            "initialize" => Ok(initialize_result(request.params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => serde_json::to_value(ToolListResult {
                tools: self.router.list_tools(),
            })
            .map_err(|_| Failure::from(ToolError::Serialization)),
            "tools/call" => {
                let call = request
                    .params
                    .and_then(|params| serde_json::from_value::<ToolCallParams>(params).ok())
                    .ok_or_else(|| {
                        Failure::protocol(-32602, "invalid_params", "invalid tool params")
                    })?;
                info.tool = ToolName::parse(&call.name);
                if self.log_arguments {
                    info.arguments.clone_from(&call.arguments);
                }
                let response = self
                    .router
                    .handle_tool_call(&call.name, call.arguments)
                    .await
                    .map_err(|err| Failure::tool(err, self.router.read_only()))?;
                serde_json::to_value(response).map_err(|_| Failure::from(ToolError::Serialization))
            }
            _ => Err(Failure::protocol(-32601, "method_not_found", "method not found")),
        }
    }

    /// Serializes the response and records the audit event.
    fn finish(
        &self,
        transport: ServerTransport,
        request_bytes: usize,
        info: RequestInfo,
        id: Value,
        outcome: Result<Value, Failure>,
    ) -> Reply {
        let (status, failure, response) = match outcome {
            Ok(result) => (
                StatusCode::OK,
                None,
                JsonRpcResponse {
                    jsonrpc: JSONRPC_VERSION,
                    id,
                    result: Some(result),
                    error: None,
                },
            ),
            Err(failure) => (
                failure.status,
                Some((failure.code, failure.kind)),
                JsonRpcResponse {
                    jsonrpc: JSONRPC_VERSION,
                    id,
                    result: None,
                    error: Some(JsonRpcError {
                        code: failure.code,
                        message: failure.message,
                    }),
                },
            ),
        };
        let payload = serde_json::to_vec(&response)
            .unwrap_or_else(|_| SERIALIZATION_FALLBACK.as_bytes().to_vec());
        self.record(transport, request_bytes, payload.len(), info, failure);
        Reply {
            status,
            payload: Some(payload),
        }
    }

    /// Emits the audit event for one request.
    fn record(
        &self,
        transport: ServerTransport,
        request_bytes: usize,
        response_bytes: usize,
        info: RequestInfo,
        failure: Option<(i64, &'static str)>,
    ) {
        let outcome = if failure.is_some() { McpOutcome::Error } else { McpOutcome::Ok };
        self.audit.record(&McpAuditEvent::new(McpAuditEventParams {
            request_id: info.request_id,
            transport,
            method: info.method,
            tool: info.tool,
            outcome,
            error_code: failure.map(|(code, _)| code),
            error_kind: failure.map(|(_, kind)| kind),
            request_bytes,
            response_bytes,
            read_only: self.router.read_only(),
            arguments: info.arguments,
        }));
    }
}

/// Parses a request body into a JSON-RPC request.
///
/// Malformed JSON is a parse error; well-formed JSON that is not a request
/// is an invalid request, answered with the id when one can be read.
fn parse_request(bytes: &[u8]) -> Result<JsonRpcRequest, (Value, Failure)> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|_| (Value::Null, Failure::protocol(-32700, "parse_error", "parse error")))?;
    let id = value.get("id").cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|_| {
        (id, Failure::protocol(-32600, "invalid_request", "invalid json-rpc request"))
    })
}

/// Builds the `initialize` result.
fn initialize_result(params: Option<&Value>) -> Value {
    let protocol_version = params
        .and_then(|params| params.get("protocolVersion"))
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);
    json!({
        "protocolVersion": protocol_version,
        "capabilities": { "tools": { "listChanged": false } },
        "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") }
    })
}

/// Renders a request id for audit records.
fn request_id_label(id: &Value) -> String {
    match id {
        Value::String(id) => id.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// MCP server errors.
#[derive(Debug, thiserror::Error)]
pub enum McpServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
