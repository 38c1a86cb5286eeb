use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::agent::Agent;
use crate::handlers;
use crate::prompts::PromptRegistry;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Default maximum bytes per JSON-RPC message (1 MiB).
pub const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("response encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Everything the router reads. Built once before serving; never mutated after.
pub struct ServerState {
    pub agent: Agent,
    pub prompts: PromptRegistry,
}

/// MCP server that speaks newline-delimited JSON-RPC 2.0 over a byte stream.
pub struct McpServer {
    state: ServerState,
    max_message_bytes: usize,
    initialized: bool,
}

impl McpServer {
    pub fn new(state: ServerState) -> Self {
        Self {
            state,
            max_message_bytes: MAX_MESSAGE_BYTES,
            initialized: false,
        }
    }

    pub fn with_max_message_bytes(mut self, limit: usize) -> Self {
        self.max_message_bytes = limit;
        self
    }

    /// Whether the `initialize` handshake has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Serve requests one at a time until `reader` reaches end of input.
    pub async fn serve<R, W>(&mut self, reader: &mut R, writer: &mut W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut raw = Vec::new();

        loop {
            raw.clear();
            let n = reader.read_until(b'\n', &mut raw).await?;
            if n == 0 {
                debug!("end of input");
                break;
            }
            self.handle_message(&raw, writer).await?;
        }

        Ok(())
    }

    /// Handle one raw line read from the transport, writing at most one
    /// response. Runs to completion once started.
    pub async fn handle_message<W>(&mut self, raw: &[u8], writer: &mut W) -> Result<(), ServerError>
    where
        W: AsyncWrite + Unpin,
    {
        if raw.len() > self.max_message_bytes {
            warn!(bytes = raw.len(), limit = self.max_message_bytes, "message too large");
            return write_response(writer, &JsonRpcResponse::error(None, JsonRpcError::parse_error()))
                .await;
        }

        let trimmed = match std::str::from_utf8(raw) {
            Ok(s) => s.trim(),
            Err(_) => {
                return write_response(
                    writer,
                    &JsonRpcResponse::error(None, JsonRpcError::parse_error()),
                )
                .await;
            }
        };

        if trimmed.is_empty() {
            return Ok(());
        }

        let req: JsonRpcRequest = match serde_json::from_str(trimmed) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "parse error");
                return write_response(
                    writer,
                    &JsonRpcResponse::error(None, JsonRpcError::parse_error()),
                )
                .await;
            }
        };

        if req.jsonrpc != "2.0" {
            return write_response(
                writer,
                &JsonRpcResponse::error(req.id.clone(), JsonRpcError::invalid_request()),
            )
            .await;
        }

        // Initialization gate: only `initialize` is allowed before handshake completes
        if !self.initialized && req.method != "initialize" {
            if req.id.is_none() {
                return Ok(());
            }
            return write_response(
                writer,
                &JsonRpcResponse::error(
                    req.id.clone(),
                    JsonRpcError::invalid_request_with("Server not initialized"),
                ),
            )
            .await;
        }

        debug!(method = %req.method, "request");
        if let Some(resp) = handlers::dispatch(&req, &self.state).await {
            write_response(writer, &resp).await?;
        }

        if req.method == "initialize" {
            self.initialized = true;
        }
        Ok(())
    }
}

async fn write_response<W>(writer: &mut W, resp: &JsonRpcResponse) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin,
{
    let out = serde_json::to_string(resp)?;
    writer.write_all(out.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
