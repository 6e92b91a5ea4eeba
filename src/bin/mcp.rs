//! joplin-mcp: exposes a local Joplin instance to AI agents over MCP.
//!
//! Usage:
//!   joplin-mcp [--config config.toml] [--port 3000] [serve|ping|init]
//!
//! The server accepts JSON-RPC 2.0 envelopes as HTTP POST bodies and
//! translates each tool call into one request against Joplin's REST API.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use joplin_mcp::cli::{Cli, Commands};
use joplin_mcp::health::{spawn_liveness_probe, BackendStatus, PROBE_DELAY};
use joplin_mcp::mcp::server;
use joplin_mcp::{BackendClient, BridgeConfig, McpServer, ToolExecutor, ToolRegistry};

#[tokio::main]
async fn main() {
    // Logs go to stderr so `ping` output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %e, "joplin-mcp exiting");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config();

    match cli.command() {
        Commands::Serve => serve(config).await,
        Commands::Ping => {
            let client = BackendClient::new(&config)?;
            client
                .ping()
                .await
                .with_context(|| format!("Joplin not reachable at {}", client.base_url()))?;
            println!("Joplin is reachable at {}", client.base_url());
            Ok(())
        }
        Commands::Init => {
            config
                .save(&cli.config)
                .with_context(|| format!("failed to write {}", cli.config.display()))?;
            info!(path = %cli.config.display(), "config written");
            Ok(())
        }
    }
}

async fn serve(config: BridgeConfig) -> Result<()> {
    info!(
        backend_port = config.backend_port,
        adapter_port = config.adapter_port,
        token = config.token().is_some(),
        "Joplin MCP server starting"
    );

    let client = BackendClient::new(&config)?;
    let listener = server::bind(config.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr()))?;

    let status = BackendStatus::default();
    let _probe = spawn_liveness_probe(client.clone(), PROBE_DELAY, status.clone());

    let mcp = McpServer::new(ToolRegistry::new(), ToolExecutor::new(client), status);
    server::serve(listener, mcp).await?;

    info!("Joplin MCP server shutting down");
    Ok(())
}
