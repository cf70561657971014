/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin
/// 2. Processes tool calls against the diary
/// 3. Sends JSON-RPC responses to stdout

use chrono::Local;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, ToolError};
use crate::{DiaryServer, ServerError};

/// Why a tool call produced no result
enum CallFailure {
    /// Arguments did not match the tool's input schema
    BadArguments(serde_json::Error),
    UnknownTool,
    Tool(ToolError),
}

impl From<ToolError> for CallFailure {
    fn from(e: ToolError) -> Self {
        CallFailure::Tool(e)
    }
}

fn arguments<P: DeserializeOwned>(args: Value) -> Result<P, CallFailure> {
    serde_json::from_value(args).map_err(CallFailure::BadArguments)
}

/// Tool definition with the input schema derived from the parameter type
fn tool<P: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let schema = schemars::schema_for!(P);
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::to_value(schema).unwrap_or_else(|_| json!({"type": "object"})),
    }
}

/// Every tool this server provides
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        tool::<tools::WriteEntryParams>(
            "diary_write",
            "Write a diary entry; it is analyzed (summary, emotions, life metrics, feedback) before saving",
        ),
        tool::<tools::UpdateEntryParams>(
            "diary_update",
            "Edit a diary entry; the analysis is recomputed",
        ),
        tool::<tools::DeleteEntryParams>("diary_delete", "Delete a diary entry permanently"),
        tool::<tools::ListEntriesParams>(
            "diary_list",
            "List diary entries with optional month filter, text search and sort order",
        ),
        tool::<tools::ReviewParams>(
            "diary_review",
            "Weekly, monthly or yearly review: averages, strongest and weakest areas, mood distribution and chart points",
        ),
        tool::<tools::DashboardParams>(
            "diary_dashboard",
            "Today's status, the latest entry and its weighted score",
        ),
        tool::<tools::GetSettingsParams>("settings_get", "Show the current settings"),
        tool::<tools::UpdateSettingsParams>(
            "settings_update",
            "Change personality, metric weights, plan, API key, model or debug mode",
        ),
        tool::<tools::ExportParams>(
            "diary_export",
            "Export all entries as a JSON backup or a markdown document",
        ),
        tool::<tools::ImportParams>(
            "diary_import",
            "Restore a JSON backup, replacing all entries",
        ),
        tool::<tools::TestConnectionParams>(
            "ai_test_connection",
            "Check the AI provider with the configured API key and model",
        ),
    ]
}

/// MCP server that handles communication with Claude
pub struct McpServer {
    /// The underlying diary server
    diary: DiaryServer,
    /// Whether the client finished initialization
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(diary: DiaryServer) -> Self {
        Self {
            diary,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        let Some(id) = request.id.clone() else {
            self.handle_notification(&request.method);
            return None;
        };

        Some(self.handle_request(id, request).await)
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                info!("MCP client initialized");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    /// Handle a JSON-RPC request
    async fn handle_request(&mut self, id: Value, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, json!(null))
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Diary Insight MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
        }
    }

    /// Handle tools/call request
    async fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        if !self.initialized {
            debug!("Tool call before initialization completed");
        }

        let args = Value::Object(tool_params.arguments.into_iter().collect());
        let result = match self.call_tool(&tool_params.name, args).await {
            Ok(message) => ToolCallResult::success(message),
            Err(CallFailure::UnknownTool) => ToolCallResult::error(format!("Unknown tool: {}", tool_params.name)),
            Err(CallFailure::Tool(e)) => {
                warn!(
                    "Tool {} failed (code {}): {}",
                    tool_params.name,
                    tool_error_to_json_rpc_code(&e),
                    e
                );
                ToolCallResult::error(e.to_string())
            }
            Err(CallFailure::BadArguments(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid arguments for {}: {}", tool_params.name, e),
                    None,
                );
            }
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
        }
    }

    /// Run one tool and return its user-facing message
    async fn call_tool(&self, name: &str, args: Value) -> Result<String, CallFailure> {
        let storage = self.diary.storage();
        let provider = self.diary.provider();
        let analytics = self.diary.analytics();
        let today = Local::now().date_naive();

        let message = match name {
            "diary_write" => tools::write_entry(storage, provider, arguments(args)?, today).await?.message,
            "diary_update" => tools::update_entry(storage, provider, arguments(args)?, today).await?.message,
            "diary_delete" => tools::delete_entry(storage, arguments(args)?)?.message,
            "diary_list" => tools::list_entries(storage, arguments(args)?)?.message,
            "diary_review" => tools::review_period(storage, analytics, arguments(args)?, today)?.message,
            "diary_dashboard" => tools::dashboard(storage, analytics, arguments(args)?, today)?.message,
            "settings_get" => {
                let _: tools::GetSettingsParams = arguments(args)?;
                tools::get_settings(storage, today)?.message
            }
            "settings_update" => tools::update_settings(storage, arguments(args)?, today)?.message,
            "diary_export" => tools::export_diary(storage, arguments(args)?, today)?.message,
            "diary_import" => tools::import_diary(storage, arguments(args)?)?.message,
            "ai_test_connection" => tools::check_connection(storage, provider, arguments(args)?).await?.message,
            _ => return Err(CallFailure::UnknownTool),
        };

        Ok(message)
    }
}
