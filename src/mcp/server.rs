//! MCP server implementation for Solid Edge automation.
//!
//! This module implements the MCP server lifecycle:
//!
//! 1. **Initialisation**: Capability negotiation and version agreement
//! 2. **Operation**: Handling tool calls, resource reads and other requests
//! 3. **Shutdown**: Graceful connection termination
//!
//! # Architecture
//!
//! The server owns exactly one [`Session`]. Every tool call borrows the
//! session's document, sketch or feature manager for the duration of the
//! call, so sketch state carries over between calls exactly as it would in
//! an interactive modelling session.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader, Stdin, Stdout};
use tracing::{debug, info, warn};

use crate::cad::model::{AssemblyExtent, HelixHand, ProfileSide};
use crate::cad::{DocumentKind, DocumentSelector};
use crate::mcp::protocol::{
    parse_message, IncomingMessage, JsonRpcError, JsonRpcErrorData, JsonRpcNotification,
    JsonRpcRequest, JsonRpcResponse, RequestId, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use crate::mcp::tools::{tool_definitions, Args, ToolError};
use crate::mcp::transport::{StdioTransport, Transport};
use crate::session::Session;

/// Server state in the MCP lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for initialize request.
    AwaitingInit,
    /// Initialize received, waiting for initialized notification.
    Initialising,
    /// Ready for normal operation.
    Running,
    /// Shutdown in progress.
    ShuttingDown,
}

/// Server capabilities advertised during initialisation.
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    /// Tool-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolCapabilities>,
    /// Resource-related capabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceCapabilities>,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            tools: Some(ToolCapabilities::default()),
            resources: Some(ResourceCapabilities::default()),
        }
    }
}

/// Tool-specific capabilities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolCapabilities {
    /// Whether the tool list can change during the session.
    #[serde(rename = "listChanged", skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

/// Resource-specific capabilities.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCapabilities {
    /// Whether clients may subscribe to resource updates.
    #[serde(skip_serializing_if = "is_false")]
    pub subscribe: bool,
    /// Whether the resource list can change during the session.
    #[serde(skip_serializing_if = "is_false")]
    pub list_changed: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires a predicate fn(&T) -> bool, so we must take &bool here
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Server information for initialisation response.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Client information received during initialisation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    #[serde(default)]
    pub version: Option<String>,
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by client.
    pub protocol_version: String,
    /// Client capabilities.
    #[serde(default)]
    pub capabilities: Value,
    /// Client information.
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

/// Parameters for tools/call request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// Parameters for resources/read request.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceReadParams {
    /// URI of the resource to read.
    pub uri: String,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call resulted in an error.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }
}

/// A resource advertised by resources/list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    /// Resource URI.
    pub uri: &'static str,
    /// Short name.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Content type of the resource text.
    pub mime_type: &'static str,
}

const DOCUMENT_LIST_URI: &str = "solidedge://document/list";
const MODEL_FEATURES_URI: &str = "solidedge://model/features";
const SKETCH_STATE_URI: &str = "solidedge://sketch/state";

const RESOURCES: [ResourceDefinition; 3] = [
    ResourceDefinition {
        uri: DOCUMENT_LIST_URI,
        name: "Open documents",
        description: "Documents open in the session, in open order",
        mime_type: "application/json",
    },
    ResourceDefinition {
        uri: MODEL_FEATURES_URI,
        name: "Model features",
        description: "Features of the active document",
        mime_type: "application/json",
    },
    ResourceDefinition {
        uri: SKETCH_STATE_URI,
        name: "Sketch state",
        description: "Active profile, accumulated profiles and axis of revolution",
        mime_type: "application/json",
    },
];

/// A message written back to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// Successful response.
    Response(JsonRpcResponse),
    /// Error response.
    Error(JsonRpcError),
}

impl Reply {
    /// The `result` member of a successful response.
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        match self {
            Self::Response(resp) => Some(&resp.result),
            Self::Error(_) => None,
        }
    }

    /// The `error` member of an error response.
    #[must_use]
    pub const fn error(&self) -> Option<&JsonRpcErrorData> {
        match self {
            Self::Response(_) => None,
            Self::Error(err) => Some(&err.error),
        }
    }
}

impl From<Result<JsonRpcResponse, JsonRpcError>> for Reply {
    fn from(result: Result<JsonRpcResponse, JsonRpcError>) -> Self {
        match result {
            Ok(resp) => Self::Response(resp),
            Err(err) => Self::Error(err),
        }
    }
}

/// The MCP server for Solid Edge automation.
pub struct McpServer<R = BufReader<Stdin>, W = Stdout> {
    /// Current server state.
    state: ServerState,
    /// The transport layer.
    transport: Transport<R, W>,
    /// Negotiated protocol version (set after initialisation).
    protocol_version: Option<String>,
    /// Directories documents may be read from or written to.
    allowed_paths: Vec<PathBuf>,
    /// The automation session all tools operate on.
    session: Session,
}

impl McpServer {
    /// Creates a server on stdio.
    #[must_use]
    pub fn new(session: Session, allowed_paths: Vec<PathBuf>) -> Self {
        Self::with_transport(StdioTransport::stdio(), session, allowed_paths)
    }
}

impl<R, W> McpServer<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a server on an arbitrary transport.
    pub const fn with_transport(
        transport: Transport<R, W>,
        session: Session,
        allowed_paths: Vec<PathBuf>,
    ) -> Self {
        Self {
            state: ServerState::AwaitingInit,
            transport,
            protocol_version: None,
            allowed_paths,
            session,
        }
    }

    /// Returns the current server state.
    #[must_use]
    pub const fn state(&self) -> ServerState {
        self.state
    }

    /// Returns the negotiated protocol version, once initialised.
    #[must_use]
    pub fn protocol_version(&self) -> Option<&str> {
        self.protocol_version.as_deref()
    }

    /// Returns the session the server operates on.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Validates that a path is within one of the allowed paths.
    fn validate_path(&self, filepath: &str) -> Result<PathBuf, ToolError> {
        let path = Path::new(filepath);

        // No allowed paths configured means no restriction
        if self.allowed_paths.is_empty() {
            return Ok(path.to_path_buf());
        }

        // Paths that do not exist yet (save targets) are checked through their parent
        let canonical_path = if path.exists() {
            path.canonicalize().map_err(|e| {
                ToolError::new(
                    "INVALID_PATH",
                    format!("Failed to resolve path '{}': {e}", path.display()),
                )
            })?
        } else {
            let parent = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                Some(_) => Path::new("."),
                None => {
                    return Err(ToolError::new(
                        "INVALID_PATH",
                        format!("Invalid path '{}': no parent directory", path.display()),
                    ))
                }
            };
            let filename = path.file_name().ok_or_else(|| {
                ToolError::new(
                    "INVALID_PATH",
                    format!("Invalid path '{}': no filename specified", path.display()),
                )
            })?;
            let canonical_parent = parent.canonicalize().map_err(|e| {
                ToolError::new(
                    "INVALID_PATH",
                    format!(
                        "Parent directory '{}' does not exist or is inaccessible: {e}",
                        parent.display()
                    ),
                )
            })?;
            canonical_parent.join(filename)
        };

        for allowed in &self.allowed_paths {
            let Ok(canonical_allowed) = allowed.canonicalize() else {
                continue;
            };

            if canonical_path.starts_with(&canonical_allowed) {
                return Ok(canonical_path);
            }
        }

        // Do not echo the configured directories back to the client
        Err(ToolError::new(
            "ACCESS_DENIED",
            "Access denied: path is outside the configured allowed directories",
        ))
    }

    /// Runs the MCP server main loop with graceful shutdown handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn run(&mut self) -> std::io::Result<()> {
        self.run_with_shutdown().await
    }

    /// Runs the main loop until the input closes, without signal handling.
    ///
    /// # Errors
    ///
    /// Returns an error if transport I/O fails.
    pub async fn serve(&mut self) -> std::io::Result<()> {
        loop {
            let line_result = self.transport.read_line().await;
            if self.handle_transport_result(line_result).await? {
                return Ok(());
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(unix)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).map_err(std::io::Error::other)?;
        let mut sigterm = signal(SignalKind::terminate()).map_err(std::io::Error::other)?;

        loop {
            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                _ = sigterm.recv() => {
                    info!("Received SIGTERM, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Runs the main loop and handles shutdown.
    #[cfg(windows)]
    async fn run_with_shutdown(&mut self) -> std::io::Result<()> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Received Ctrl+C, initiating graceful shutdown");
                    self.state = ServerState::ShuttingDown;
                    return Ok(());
                }

                line_result = self.transport.read_line() => {
                    if self.handle_transport_result(line_result).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Handles the result from transport read.
    ///
    /// Returns `true` if the server should shut down.
    async fn handle_transport_result(
        &mut self,
        line_result: std::io::Result<Option<String>>,
    ) -> std::io::Result<bool> {
        let Some(line) = line_result? else {
            info!("Input closed, shutting down");
            self.state = ServerState::ShuttingDown;
            return Ok(true);
        };

        if let Some(reply) = self.process_line(&line) {
            self.transport.write_message(&reply).await?;
        }

        Ok(self.state == ServerState::ShuttingDown)
    }

    /// Handles one line of input and returns the reply to send, if any.
    ///
    /// Notifications and blank lines produce no reply.
    pub fn process_line(&mut self, line: &str) -> Option<Reply> {
        if line.trim().is_empty() {
            return None;
        }

        match parse_message(line) {
            Ok(IncomingMessage::Request(req)) => Some(self.handle_request(&req).into()),
            Ok(IncomingMessage::Notification(notif)) => {
                self.handle_notification(&notif);
                None
            }
            Err(error) => {
                debug!(code = error.error.code, "Rejected malformed message");
                Some(Reply::Error(error))
            }
        }
    }

    /// Handles an incoming request.
    fn handle_request(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        debug!(method = %req.method, id = %req.id, "Request");
        match req.method.as_str() {
            "initialize" => self.handle_initialize(req),
            "tools/list" => self.handle_tools_list(req),
            "tools/call" => self.handle_tools_call(req),
            "resources/list" => self.handle_resources_list(req),
            "resources/read" => self.handle_resources_read(req),
            "ping" => Ok(Self::handle_ping(req)),
            _ => Err(JsonRpcError::method_not_found(req.id.clone(), &req.method)),
        }
    }

    /// Handles an incoming notification.
    fn handle_notification(&mut self, notif: &JsonRpcNotification) {
        if notif.method == "notifications/initialized" && self.state == ServerState::Initialising {
            self.state = ServerState::Running;
            info!("Client initialised, server running");
        } else {
            debug!(method = %notif.method, "Ignoring notification");
        }
    }

    /// Deserialises request params, which must be present.
    fn parse_params<T: DeserializeOwned>(
        req: &JsonRpcRequest,
        what: &str,
    ) -> Result<T, JsonRpcError> {
        let params = req.params.clone().ok_or_else(|| {
            JsonRpcError::invalid_params(req.id.clone(), format!("Missing {what} params"))
        })?;
        serde_json::from_value(params).map_err(|e| {
            JsonRpcError::invalid_params(req.id.clone(), format!("Invalid {what} params: {e}"))
        })
    }

    /// Handles the initialize request.
    fn handle_initialize(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        if self.state != ServerState::AwaitingInit {
            return Err(JsonRpcError::already_initialised(req.id.clone()));
        }

        let params: InitializeParams = Self::parse_params(req, "initialize")?;
        info!(
            client = params.client_info.as_ref().map_or("unknown", |c| c.name.as_str()),
            requested = %params.protocol_version,
            "Initialize"
        );

        let negotiated_version = MCP_PROTOCOL_VERSION.to_string();

        self.protocol_version = Some(negotiated_version.clone());
        self.state = ServerState::Initialising;

        let result = json!({
            "protocolVersion": negotiated_version,
            "capabilities": ServerCapabilities::default(),
            "serverInfo": ServerInfo::default(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the tools/list request.
    fn handle_tools_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let result = json!({
            "tools": tool_definitions(),
        });

        Ok(JsonRpcResponse::success(req.id.clone(), result))
    }

    /// Handles the tools/call request.
    fn handle_tools_call(&mut self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let params: ToolCallParams = Self::parse_params(req, "tool call")?;

        let result = match self.call_tool(&params.name, &params.arguments) {
            Ok(value) => {
                debug!(tool = %params.name, "Tool call succeeded");
                ToolCallResult::text(
                    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()),
                )
            }
            Err(e) => {
                warn!(tool = %params.name, code = e.code, error = %e.message, "Tool call failed");
                ToolCallResult::error(e.to_json().to_string())
            }
        };

        let result_value = serde_json::to_value(&result).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialise tool call result");
            JsonRpcError::internal_error(
                req.id.clone(),
                "Internal error: failed to serialise result",
            )
        })?;

        Ok(JsonRpcResponse::success(req.id.clone(), result_value))
    }

    /// Handles the resources/list request.
    fn handle_resources_list(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        Ok(JsonRpcResponse::success(
            req.id.clone(),
            json!({ "resources": RESOURCES }),
        ))
    }

    /// Handles the resources/read request.
    fn handle_resources_read(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, JsonRpcError> {
        self.require_running(&req.id)?;

        let params: ResourceReadParams = Self::parse_params(req, "resource read")?;
        let Some(body) = self.read_resource(&params.uri) else {
            return Err(JsonRpcError::resource_not_found(req.id.clone(), &params.uri));
        };
        let text = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());

        Ok(JsonRpcResponse::success(
            req.id.clone(),
            json!({
                "contents": [{
                    "uri": params.uri,
                    "mimeType": "application/json",
                    "text": text,
                }]
            }),
        ))
    }

    /// Builds the body of a resource, or `None` for an unknown URI.
    fn read_resource(&self, uri: &str) -> Option<Value> {
        let engine = self.session.engine();
        match uri {
            DOCUMENT_LIST_URI => {
                let documents = engine.list_documents();
                let active = documents.iter().find(|d| d.active).map(|d| d.name.clone());
                Some(json!({ "documents": documents, "active": active }))
            }
            MODEL_FEATURES_URI => {
                let document = engine.active_document().ok().map(|d| d.name);
                let features = engine.features().unwrap_or_default();
                Some(json!({ "document": document, "features": features }))
            }
            SKETCH_STATE_URI => serde_json::to_value(self.session.sketch_state().summary()).ok(),
            _ => None,
        }
    }

    /// Handles the ping request.
    fn handle_ping(req: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(req.id.clone(), json!({}))
    }

    /// Ensures the server is in the Running state.
    fn require_running(&self, id: &RequestId) -> Result<(), JsonRpcError> {
        if self.state != ServerState::Running {
            return Err(JsonRpcError::not_initialised(id.clone()));
        }
        Ok(())
    }

    // ==================== Tool dispatch ====================

    fn call_tool(&mut self, name: &str, arguments: &Value) -> Result<Value, ToolError> {
        let args = Args::new(arguments);
        match name {
            // Documents
            "create_document" => self.call_create_document(args),
            "open_document" => self.call_open_document(args),
            "save_document" => self.call_save_document(args),
            "close_document" => self.call_close_document(args),
            "activate_document" => self.call_activate_document(args),
            "list_documents" => Ok(self.call_list_documents()),
            "get_active_document" => self.call_get_active_document(),
            "place_component" => self.call_place_component(args),
            // Sketching
            "create_sketch" => self.call_create_sketch(args),
            "draw_line" | "draw_circle" | "draw_rectangle" | "draw_arc" | "draw_polygon"
            | "draw_ellipse" | "draw_spline" | "draw_point" => self.call_draw(name, args),
            "set_axis_of_revolution" => self.call_set_axis_of_revolution(args),
            "close_sketch" => self.call_close_sketch(),
            "get_sketch_state" => Ok(self.call_get_sketch_state()),
            // Features
            "create_extrude"
            | "create_extruded_cutout"
            | "create_extrude_thin_wall"
            | "create_revolve"
            | "create_revolved_cutout"
            | "create_revolve_thin_wall"
            | "create_revolved_surface"
            | "create_helix"
            | "create_helix_cutout"
            | "create_loft"
            | "create_lofted_cutout"
            | "create_loft_with_guides"
            | "create_sweep"
            | "create_swept_cutout"
            | "create_user_defined_pattern"
            | "create_assembly_extruded_cutout"
            | "create_assembly_revolved_cutout"
            | "create_assembly_swept_protrusion" => self.call_feature(name, args),
            "list_features" => self.call_list_features(),
            _ => Err(unknown_tool(name)),
        }
    }

    fn sketch_state_json(&self) -> Value {
        serde_json::to_value(self.session.sketch_state().summary()).unwrap_or(Value::Null)
    }

    // ---- Documents ----

    fn call_create_document(&mut self, args: Args<'_>) -> Result<Value, ToolError> {
        let type_name = args.str("type")?;
        let kind = DocumentKind::parse(type_name).ok_or_else(|| {
            ToolError::invalid(
                "type",
                format!("unknown document type '{type_name}'. Use part, assembly, sheet_metal or draft"),
            )
        })?;
        let template = args
            .opt_str("template")?
            .map(|t| self.validate_path(t))
            .transpose()?;

        let doc = self
            .session
            .documents()
            .create_document(kind, template.as_deref())?;
        Ok(json!({
            "status": "created",
            "document": doc,
            "sketch_state": self.sketch_state_json(),
        }))
    }

    fn call_open_document(&mut self, args: Args<'_>) -> Result<Value, ToolError> {
        let path = self.validate_path(args.str("path")?)?;
        let doc = self.session.documents().open_document(&path)?;
        Ok(json!({
            "status": "opened",
            "document": doc,
            "sketch_state": self.sketch_state_json(),
        }))
    }

    fn call_save_document(&mut self, args: Args<'_>) -> Result<Value, ToolError> {
        let path = args
            .opt_str("path")?
            .map(|p| self.validate_path(p))
            .transpose()?;
        let doc = self.session.documents().save_document(path.as_deref())?;
        Ok(json!({ "status": "saved", "document": doc }))
    }

    fn call_close_document(&mut self, args: Args<'_>) -> Result<Value, ToolError> {
        let save = args.bool_or("save", false)?;
        let doc = self.session.documents().close_document(save)?;
        let active = self.session.engine().active_document().ok().map(|d| d.name);
        Ok(json!({
            "status": "closed",
            "document": doc,
            "active": active,
            "sketch_state": self.sketch_state_json(),
        }))
    }

    fn call_activate_document(&mut self, args: Args<'_>) -> Result<Value, ToolError> {
        let selector = match (args.opt_str("name")?, args.opt_usize("index")?) {
            (Some(name), _) => DocumentSelector::Name(name.to_string()),
            (None, Some(index)) => DocumentSelector::Index(index),
            (None, None) => return Err(ToolError::missing("name or index")),
        };
        let doc = self.session.documents().activate_document(&selector)?;
        Ok(json!({
            "status": "activated",
            "document": doc,
            "sketch_state": self.sketch_state_json(),
        }))
    }

    fn call_list_documents(&self) -> Value {
        let documents = self.session.engine().list_documents();
        json!({
            "status": "ok",
            "count": documents.len(),
            "documents": documents,
        })
    }

    fn call_get_active_document(&self) -> Result<Value, ToolError> {
        let doc = self.session.engine().active_document()?;
        Ok(json!({ "status": "ok", "document": doc }))
    }

    fn call_place_component(&mut self, args: Args<'_>) -> Result<Value, ToolError> {
        let path = self.validate_path(args.str("path")?)?;
        let occurrence = self.session.documents().place_component(&path)?;
        Ok(json!({ "status": "placed", "occurrence": occurrence }))
    }

    // ---- Sketching ----

    fn call_create_sketch(&mut self, args: Args<'_>) -> Result<Value, ToolError> {
        let plane = args.str_or_int("plane")?;
        let sketch = self.session.sketches().create_sketch(&plane)?;
        Ok(json!({ "status": "sketch_open", "sketch": sketch }))
    }

    fn call_draw(&mut self, tool: &str, args: Args<'_>) -> Result<Value, ToolError> {
        let mut sketches = self.session.sketches();
        let count = match tool {
            "draw_line" => sketches.draw_line(
                args.f64("x1")?,
                args.f64("y1")?,
                args.f64("x2")?,
                args.f64("y2")?,
            )?,
            "draw_circle" => sketches.draw_circle(
                args.f64("center_x")?,
                args.f64("center_y")?,
                args.f64("radius")?,
            )?,
            "draw_rectangle" => sketches.draw_rectangle(
                args.f64("x1")?,
                args.f64("y1")?,
                args.f64("x2")?,
                args.f64("y2")?,
            )?,
            "draw_arc" => sketches.draw_arc(
                args.f64("center_x")?,
                args.f64("center_y")?,
                args.f64("radius")?,
                args.f64("start_angle")?,
                args.f64("end_angle")?,
            )?,
            "draw_polygon" => sketches.draw_polygon(
                args.f64("center_x")?,
                args.f64("center_y")?,
                args.f64("radius")?,
                args.usize("sides")?,
            )?,
            "draw_ellipse" => sketches.draw_ellipse(
                args.f64("center_x")?,
                args.f64("center_y")?,
                args.f64("major_radius")?,
                args.f64("minor_radius")?,
                args.opt_f64("angle")?.unwrap_or(0.0),
            )?,
            "draw_spline" => sketches.draw_spline(&args.points("points")?)?,
            "draw_point" => sketches.draw_point(args.f64("x")?, args.f64("y")?)?,
            _ => return Err(unknown_tool(tool)),
        };
        Ok(json!({
            "status": "drawn",
            "element": tool.trim_start_matches("draw_"),
            "element_count": count,
        }))
    }

    fn call_set_axis_of_revolution(&mut self, args: Args<'_>) -> Result<Value, ToolError> {
        let axis = self.session.sketches().set_axis_of_revolution(
            args.f64("x1")?,
            args.f64("y1")?,
            args.f64("x2")?,
            args.f64("y2")?,
        )?;
        Ok(json!({
            "status": "axis_set",
            "axis": axis,
            "sketch_state": self.sketch_state_json(),
        }))
    }

    fn call_close_sketch(&mut self) -> Result<Value, ToolError> {
        let closed = self.session.sketches().close_sketch()?;
        Ok(json!({
            "status": "closed",
            "sketch": closed,
            "sketch_state": self.sketch_state_json(),
        }))
    }

    fn call_get_sketch_state(&self) -> Value {
        json!({
            "status": "ok",
            "sketch_state": self.sketch_state_json(),
        })
    }

    // ---- Features ----

    fn call_feature(&mut self, tool: &str, args: Args<'_>) -> Result<Value, ToolError> {
        let mut features = self.session.features();
        let feature = match tool {
            "create_extrude" => features.extrude(args.f64("distance")?, side(args)?)?,
            "create_extruded_cutout" => {
                features.extruded_cutout(args.f64("distance")?, side(args)?)?
            }
            "create_extrude_thin_wall" => features.extrude_thin_wall(
                args.f64("distance")?,
                args.f64("wall_thickness")?,
                side(args)?,
            )?,
            "create_revolve" => features.revolve(angle(args)?)?,
            "create_revolved_cutout" => features.revolved_cutout(angle(args)?)?,
            "create_revolve_thin_wall" => {
                features.revolve_thin_wall(angle(args)?, args.f64("wall_thickness")?)?
            }
            "create_revolved_surface" => features.revolved_surface(angle(args)?)?,
            "create_helix" => features.helix(
                args.f64("pitch")?,
                args.f64("height")?,
                args.opt_f64("revolutions")?,
                hand(args)?,
                args.opt_f64("wall_thickness")?,
            )?,
            "create_helix_cutout" => features.helix_cutout(
                args.f64("pitch")?,
                args.f64("height")?,
                args.opt_f64("revolutions")?,
                hand(args)?,
            )?,
            "create_loft" => features.loft(
                args.opt_indices("profile_indices")?.as_deref(),
                args.opt_f64("wall_thickness")?,
            )?,
            "create_loft_with_guides" => features.loft_with_guides(
                args.opt_indices("guide_profile_indices")?.as_deref(),
                args.opt_indices("profile_indices")?.as_deref(),
            )?,
            "create_sweep" => features.sweep(
                args.opt_usize("path_profile_index")?,
                args.opt_f64("wall_thickness")?,
            )?,
            "create_lofted_cutout" => {
                features.lofted_cutout(args.opt_indices("profile_indices")?.as_deref())?
            }
            "create_swept_cutout" => {
                features.swept_cutout(args.opt_usize("path_profile_index")?)?
            }
            "create_user_defined_pattern" => {
                features.user_defined_pattern(args.str("feature_name")?)?
            }
            "create_assembly_extruded_cutout" => {
                let extent = args
                    .opt_f64("distance")?
                    .map_or(AssemblyExtent::ThroughAll, AssemblyExtent::Finite);
                features.assembly_extruded_cutout(&scope(args)?, extent, side(args)?)?
            }
            "create_assembly_revolved_cutout" => {
                features.assembly_revolved_cutout(&scope(args)?, angle(args)?)?
            }
            "create_assembly_swept_protrusion" => features.assembly_swept_protrusion(
                args.opt_usize("num_trace_curves")?.unwrap_or(1),
                args.opt_usize("num_cross_sections")?.unwrap_or(1),
            )?,
            _ => return Err(unknown_tool(tool)),
        };
        Ok(json!({
            "status": "created",
            "feature": feature,
            "sketch_state": self.sketch_state_json(),
        }))
    }

    fn call_list_features(&self) -> Result<Value, ToolError> {
        let features = self.session.engine().features()?;
        Ok(json!({
            "status": "ok",
            "count": features.len(),
            "features": features,
        }))
    }
}

fn unknown_tool(name: &str) -> ToolError {
    ToolError::new("UNKNOWN_TOOL", format!("Unknown tool: {name}"))
}

fn side(args: Args<'_>) -> Result<ProfileSide, ToolError> {
    args.opt_str("direction")?.map_or(Ok(ProfileSide::default()), |d| {
        ProfileSide::parse(d).ok_or_else(|| {
            ToolError::invalid("direction", format!("expected Normal, Reverse or Symmetric, got '{d}'"))
        })
    })
}

fn hand(args: Args<'_>) -> Result<HelixHand, ToolError> {
    args.opt_str("direction")?.map_or(Ok(HelixHand::default()), |d| {
        HelixHand::parse(d)
            .ok_or_else(|| ToolError::invalid("direction", format!("expected Right or Left, got '{d}'")))
    })
}

fn angle(args: Args<'_>) -> Result<f64, ToolError> {
    Ok(args.opt_f64("angle")?.unwrap_or(360.0))
}

fn scope(args: Args<'_>) -> Result<Vec<usize>, ToolError> {
    args.opt_indices("scope_parts")?
        .ok_or_else(|| ToolError::missing("scope_parts"))
}
