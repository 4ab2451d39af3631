//! Line-delimited JSON-RPC server loop.
//!
//! Reads one JSON message per line and writes one response per line.
//! Requests are handled strictly one at a time. The loop ends when the
//! input reaches end of file. A line that is too long or not UTF-8 gets a
//! parse error and the loop carries on with the next line.

use bytes::BytesMut;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Decoder, FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::{debug, info, warn};

use super::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JSONRPC_VERSION, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, PROTOCOL_VERSION, ServerCapabilities,
    ServerInfo, ToolsCapability,
};
use super::registry::{ToolError, ToolRegistry};

/// Longest accepted input line, in bytes.
const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Errors that stop the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Reading or writing the transport failed
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be encoded
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<LinesCodecError> for ServerError {
    fn from(err: LinesCodecError) -> Self {
        match err {
            LinesCodecError::Io(e) => ServerError::Io(e),
            LinesCodecError::MaxLineLengthExceeded => ServerError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "line too long",
            )),
        }
    }
}

/// One line read from the client.
#[derive(Debug, PartialEq, Eq)]
enum Inbound {
    Line(String),
    TooLong,
    NotUtf8,
}

/// [`LinesCodec`] that yields bad lines as items instead of errors.
///
/// `FramedRead` ends the stream after any decoder error, so only genuine
/// I/O failures are reported as errors here.
#[derive(Debug)]
struct InboundCodec(LinesCodec);

impl InboundCodec {
    fn new() -> Self {
        Self(LinesCodec::new_with_max_length(MAX_LINE_LENGTH))
    }
}

impl Decoder for InboundCodec {
    type Item = Inbound;
    type Error = std::io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Inbound>, std::io::Error> {
        classify(self.0.decode(src))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Inbound>, std::io::Error> {
        classify(self.0.decode_eof(src))
    }
}

/// `LinesCodec` has already consumed an offending line when it reports it
/// (or discards the rest of it on the next call), so decoding can resume.
fn classify(
    decoded: Result<Option<String>, LinesCodecError>,
) -> Result<Option<Inbound>, std::io::Error> {
    match decoded {
        Ok(line) => Ok(line.map(Inbound::Line)),
        Err(LinesCodecError::MaxLineLengthExceeded) => Ok(Some(Inbound::TooLong)),
        Err(LinesCodecError::Io(e)) if e.kind() == std::io::ErrorKind::InvalidData => {
            Ok(Some(Inbound::NotUtf8))
        }
        Err(LinesCodecError::Io(e)) => Err(e),
    }
}

/// MCP server over any line-oriented byte stream.
pub struct McpServer {
    registry: ToolRegistry,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            info: ServerInfo::from_crate(),
        }
    }

    /// Serve requests from `reader`, writing responses to `writer`, until EOF.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), ServerError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = FramedRead::new(reader, InboundCodec::new());
        let mut out = FramedWrite::new(writer, LinesCodec::new());

        info!(tools = self.registry.len(), "MCP server ready");

        while let Some(inbound) = lines.next().await {
            let response = match inbound? {
                Inbound::Line(line) => self.handle_line(&line).await,
                Inbound::TooLong => {
                    warn!(max = MAX_LINE_LENGTH, "discarding oversized message");
                    Some(JsonRpcResponse::error(
                        Value::Null,
                        JsonRpcError::parse_error("message too long"),
                    ))
                }
                Inbound::NotUtf8 => {
                    warn!("discarding message that is not valid UTF-8");
                    Some(JsonRpcResponse::error(
                        Value::Null,
                        JsonRpcError::parse_error("message is not valid UTF-8"),
                    ))
                }
            };

            if let Some(response) = response {
                out.send(serde_json::to_string(&response)?).await?;
            }
        }

        info!("input closed, shutting down");
        Ok(())
    }

    /// Handle one raw input line. Returns `None` when nothing should be sent.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        if line.trim().is_empty() {
            return None;
        }

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "unparseable message");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(e),
                ));
            }
        };

        // Keep the id (if any) so even a malformed request gets a correlated error
        let id = value.get("id").cloned();

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id.unwrap_or(Value::Null),
                    JsonRpcError::invalid_request(e),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(Value::Null),
                JsonRpcError::invalid_request(format!("unsupported version {}", request.jsonrpc)),
            ));
        }

        self.handle(request).await
    }

    /// Dispatch a parsed request. Notifications never produce a response.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, id = ?request.id, "request");

        let Some(id) = request.id.clone() else {
            debug!(method = %request.method, "notification");
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.initialize(request.params.as_ref())),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                ListToolsResult {
                    tools: self.registry.list_schemas(),
                },
            ),
            "tools/call" => match self.call_tool(request.params).await {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(error) => JsonRpcResponse::error(id, error),
            },
            method => {
                warn!(method, "unknown method");
                JsonRpcResponse::error(id, JsonRpcError::method_not_found(method))
            }
        };
        Some(response)
    }

    fn initialize(&self, params: Option<&Value>) -> InitializeResult {
        let protocol_version = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str)
            .unwrap_or(PROTOCOL_VERSION)
            .to_string();

        info!(%protocol_version, "client initialized");

        InitializeResult {
            protocol_version,
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: self.info.clone(),
        }
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<CallToolResult, JsonRpcError> {
        let params: CallToolParams = params
            .ok_or_else(|| JsonRpcError::invalid_params("missing params"))
            .and_then(|p| {
                serde_json::from_value(p).map_err(|e| JsonRpcError::invalid_params(e.to_string()))
            })?;

        let Some(tool) = self.registry.get(&params.name) else {
            warn!(tool = %params.name, "unknown tool");
            return Ok(CallToolResult::error(format!("Unknown tool: {}", params.name)));
        };

        let arguments = if params.arguments.is_null() {
            serde_json::json!({})
        } else {
            params.arguments
        };

        tool.execute(arguments).await.map_err(|e| match e {
            ToolError::InvalidArguments { .. } => JsonRpcError::invalid_params(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tools::{FindStationTool, SearchTrainsTool};
    use crate::navitia::{FixtureApi, TransitApi};
    use crate::search::{SearchConfig, TrainSearch};
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::Arc;

    fn server() -> McpServer {
        let api: Arc<dyn TransitApi> = Arc::new(
            FixtureApi::new()
                .with_places_json("Paris", include_str!("../../testdata/places_paris.json"))
                .unwrap()
                .with_places_json("Lyon", include_str!("../../testdata/places_lyon.json"))
                .unwrap()
                .with_journeys_json(
                    "admin:fr:75056",
                    "admin:fr:69123",
                    include_str!("../../testdata/journeys_paris_lyon.json"),
                )
                .unwrap(),
        );
        let now = NaiveDate::from_ymd_opt(2025, 11, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let search = TrainSearch::new(api, SearchConfig::default()).with_reference_time(now);

        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(SearchTrainsTool::new(search.clone())));
        registry.register(Arc::new(FindStationTool::new(search)));
        McpServer::new(registry)
    }

    /// Run the server over `input` and return the parsed output lines.
    async fn exchange(input: &str) -> Vec<Value> {
        exchange_bytes(input.as_bytes()).await
    }

    async fn exchange_bytes(input: &[u8]) -> Vec<Value> {
        let mut output = Vec::new();
        server().serve(input, &mut output).await.unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn initialize_echoes_protocol_version() {
        let out = exchange(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26","capabilities":{},"clientInfo":{"name":"t","version":"0"}}}"#,
        )
        .await;

        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["id"], 1);
        assert_eq!(out[0]["result"]["protocolVersion"], "2025-03-26");
        assert_eq!(out[0]["result"]["serverInfo"]["name"], "sncf-server");
        assert!(out[0]["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn initialize_without_version_uses_default() {
        let out = exchange(r#"{"jsonrpc":"2.0","id":"a","method":"initialize"}"#).await;
        assert_eq!(out[0]["id"], "a");
        assert_eq!(out[0]["result"]["protocolVersion"], PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
            "\n",
        );
        let out = exchange(input).await;

        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["id"], 2);
        assert_eq!(out[0]["result"], json!({}));
    }

    #[tokio::test]
    async fn tools_list_names_both_tools() {
        let out = exchange(r#"{"jsonrpc":"2.0","id":3,"method":"tools/list"}"#).await;

        let names: Vec<&str> = out[0]["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["find_station", "search_trains"]);
        assert!(out[0]["result"]["tools"][0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn tools_call_search_trains() {
        let out = exchange(
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"search_trains","arguments":{"origin":"Paris","destination":"Lyon","departure_datetime":"20/11/2025 14:00"}}}"#,
        )
        .await;

        let result = &out[0]["result"];
        assert!(result.get("isError").is_none());
        assert_eq!(result["content"][0]["type"], "text");
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("API datetime format: 20251120T140000"));
        assert!(text.contains("Showing results 1-3 of 3 journey option(s) (page 1/1)"));
    }

    #[tokio::test]
    async fn tool_failure_sets_is_error() {
        let out = exchange(
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"search_trains","arguments":{"origin":"Paris","destination":"Lyon","departure_datetime":"someday"}}}"#,
        )
        .await;

        assert_eq!(out[0]["result"]["isError"], true);
        let text = out[0]["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("could not parse date 'someday'"));
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error_result() {
        let out = exchange(
            r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"check_prices","arguments":{}}}"#,
        )
        .await;

        assert_eq!(out[0]["result"]["isError"], true);
        assert!(out[0].get("error").is_none());
    }

    #[tokio::test]
    async fn protocol_errors() {
        let input = [
            "this is not json",
            r#"{"jsonrpc":"2.0","id":7,"method":"resources/list"}"#,
            r#"{"jsonrpc":"2.0","id":8,"method":"tools/call","params":{"name":"find_station","arguments":{}}}"#,
            r#"{"jsonrpc":"2.0","id":9,"method":"tools/call"}"#,
            r#"{"jsonrpc":"2.0","id":10}"#,
            r#"{"jsonrpc":"1.0","id":11,"method":"ping"}"#,
        ]
        .join("\n");
        let out = exchange(&input).await;

        assert_eq!(out.len(), 6);
        assert_eq!(out[0]["id"], Value::Null);
        assert_eq!(out[0]["error"]["code"], JsonRpcError::PARSE_ERROR);
        assert_eq!(out[1]["error"]["code"], JsonRpcError::METHOD_NOT_FOUND);
        assert_eq!(out[2]["error"]["code"], JsonRpcError::INVALID_PARAMS);
        assert_eq!(out[3]["error"]["code"], JsonRpcError::INVALID_PARAMS);
        assert_eq!(out[4]["id"], 10);
        assert_eq!(out[4]["error"]["code"], JsonRpcError::INVALID_REQUEST);
        assert_eq!(out[5]["error"]["code"], JsonRpcError::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn oversized_line_does_not_stop_the_server() {
        let mut input = vec![b'x'; MAX_LINE_LENGTH + 10];
        input.push(b'\n');
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#);
        input.push(b'\n');

        let out = exchange_bytes(&input).await;

        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["id"], Value::Null);
        assert_eq!(out[0]["error"]["code"], JsonRpcError::PARSE_ERROR);
        assert_eq!(out[1]["id"], 2);
        assert_eq!(out[1]["result"], json!({}));
    }

    #[tokio::test]
    async fn non_utf8_line_does_not_stop_the_server() {
        let mut input = b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"p\xffing\"}\n".to_vec();
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#);
        input.extend_from_slice(b"\n\xfe");

        let out = exchange_bytes(&input).await;

        assert_eq!(out.len(), 3);
        assert_eq!(out[0]["id"], Value::Null);
        assert_eq!(out[0]["error"]["code"], JsonRpcError::PARSE_ERROR);
        assert_eq!(out[1]["id"], 2);
        assert_eq!(out[1]["result"], json!({}));
        assert_eq!(out[2]["error"]["code"], JsonRpcError::PARSE_ERROR);
    }

    #[test]
    fn codec_resumes_after_bad_lines() {
        let mut codec = InboundCodec::new();
        let mut buf = BytesMut::from(&b"\xff\nok\n"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), Some(Inbound::NotUtf8));
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(Inbound::Line("ok".to_string()))
        );
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[tokio::test]
    async fn empty_input_ends_cleanly() {
        assert!(exchange("").await.is_empty());
    }

    #[tokio::test]
    async fn handle_direct_request() {
        let response = server()
            .handle(JsonRpcRequest::new(12, "ping", json!({})))
            .await
            .unwrap();
        assert_eq!(response.id, json!(12));
        assert!(response.error.is_none());

        let none = server()
            .handle(JsonRpcRequest::notification("notifications/cancelled"))
            .await;
        assert!(none.is_none());
    }
}
