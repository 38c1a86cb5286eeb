//! MCP server for the BinkAI wallet agent.
//!
//! Exposes every tool registered by the agent's plugins, plus the `swap-token`
//! and `get-balance` prompts, over JSON-RPC 2.0 stdio transport.

pub mod agent;
pub mod config;
pub mod handlers;
pub mod lifecycle;
pub mod logging;
pub mod plugins;
pub mod prompts;
pub mod protocol;
pub mod server;

pub mod schema;
