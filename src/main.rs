use bink_mcp_server::config::ServerConfig;
use bink_mcp_server::lifecycle::{os_signals, Lifecycle};
use bink_mcp_server::logging::{self, LogFormat};
use bink_mcp_server::plugins;
use bink_mcp_server::prompts::PromptRegistry;
use bink_mcp_server::server::{McpServer, ServerState};
use tokio::io::BufReader;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init(LogFormat::from_env());
    logging::install_panic_hook();
    info!("Starting BinkAI MCP server");

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "configuration error");
            std::process::exit(1);
        }
    };

    let agent = match plugins::build_agent(&config, Vec::new()).await {
        Ok(a) => a,
        Err(e) => {
            error!(error = %e, "failed to initialize agent");
            std::process::exit(1);
        }
    };

    let prompts = match PromptRegistry::builtin() {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "invalid prompt catalog");
            std::process::exit(1);
        }
    };

    let mut signals = match os_signals() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to install signal handlers");
            std::process::exit(1);
        }
    };

    let server = McpServer::new(ServerState { agent, prompts })
        .with_max_message_bytes(config.max_message_bytes);
    let mut lifecycle = Lifecycle::new(server);
    if let Err(e) = lifecycle.start(BufReader::new(tokio::io::stdin()), tokio::io::stdout()) {
        error!(error = %e, "failed to start transport");
        std::process::exit(1);
    }
    info!("Server started successfully");

    match lifecycle.run(&mut signals).await {
        Ok(reason) => info!(?reason, "server stopped"),
        Err(e) => {
            error!(error = %e, "fatal error");
            std::process::exit(1);
        }
    }
}
