//! The shellgate worker: tools served over line-delimited JSON-RPC on stdio.

pub mod error;
pub mod file_edit;
pub mod logging;
pub mod mcp_server;
pub mod restart;
pub mod tools;

pub use error::Result;
pub use error::ServerError;
pub use logging::init_logging;
pub use logging::shutdown_logging;
pub use mcp_server::McpServer;
pub use restart::ExitAction;
pub use restart::ProcessExit;
pub use restart::RestartSignal;
pub use tools::GatewayTools;

use shellgate_config::GatewayConfig;

/// Serves the process's own stdin/stdout until stdin closes.
pub async fn serve_stdio(config: &GatewayConfig) -> Result<()> {
    let server = McpServer::new(GatewayTools::from_config(config));
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    server.run(input, tokio::io::stdout()).await
}
