//! CLI module for joplin-mcp.
//!
//! Commands:
//! - serve (default): run the JSON-RPC endpoint
//! - ping: one-shot backend liveness check
//! - init: write the effective config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::BridgeConfig;

#[derive(Debug, Parser)]
#[command(name = "joplin-mcp")]
#[command(about = "MCP tool server for the Joplin notes app", version)]
pub struct Cli {
    /// Config file (TOML). Missing file means defaults.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Port for the JSON-RPC endpoint
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Port of the Joplin REST API
    #[arg(long)]
    pub backend_port: Option<u16>,

    /// Joplin API token
    #[arg(long)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Run the MCP server (default)
    Serve,

    /// Check that Joplin is reachable, then exit
    Ping,

    /// Write the effective configuration to the config file
    Init,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }

    /// Load the config file and apply command-line overrides.
    pub fn load_config(&self) -> BridgeConfig {
        let mut config = BridgeConfig::load(&self.config);
        self.apply_overrides(&mut config);
        config
    }

    pub fn apply_overrides(&self, config: &mut BridgeConfig) {
        if let Some(port) = self.port {
            config.adapter_port = port;
        }
        if let Some(port) = self.backend_port {
            config.backend_port = port;
        }
        if let Some(token) = &self.token {
            config.backend_token = token.clone();
        }
    }
}
