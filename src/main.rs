use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use mcp_github_admin::config::{
    GatewayConfig, DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use mcp_github_admin::dispatch::Dispatcher;
use mcp_github_admin::error::McpGithubError;
use mcp_github_admin::ops::GithubOps;
use mcp_github_admin::server;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

/// MCP server for GitHub: create and delete repositories, commit file changes
#[derive(Parser)]
#[command(name = "mcp-github-admin", version, about)]
struct Cli {
    /// GitHub personal access token.
    /// Can also be set via GITHUB_TOKEN environment variable.
    #[arg(long)]
    token: Option<String>,

    /// Read GitHub token from an environment variable.
    /// Default: GITHUB_TOKEN
    #[arg(long = "token-env")]
    token_env: Option<String>,

    /// GitHub REST API base URL
    #[arg(long = "api-url", default_value = DEFAULT_API_BASE)]
    api_url: String,

    /// User-Agent sent with every request
    #[arg(long = "user-agent", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Deadline in seconds for read requests
    #[arg(long = "read-timeout", default_value_t = DEFAULT_TIMEOUT_SECS)]
    read_timeout: u64,

    /// Deadline in seconds for create, update and delete requests
    #[arg(long = "write-timeout", default_value_t = DEFAULT_TIMEOUT_SECS)]
    write_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Resolve token: --token > --token-env > GITHUB_TOKEN
    let token = if let Some(t) = cli.token {
        Some(t)
    } else {
        let env_name = cli.token_env.as_deref().unwrap_or("GITHUB_TOKEN");
        match std::env::var(env_name) {
            Ok(t) if !t.is_empty() => {
                tracing::info!(env = env_name, "Read GitHub token from environment variable");
                Some(t)
            }
            _ => None,
        }
    };

    if token.is_none() {
        tracing::warn!("No GitHub token provided; every request will be rejected upstream");
    }
    let authenticated = token.is_some();

    let config = GatewayConfig::default()
        .with_api_base(cli.api_url)
        .with_token(token)
        .with_user_agent(cli.user_agent)
        .with_read_timeout(Duration::from_secs(cli.read_timeout))
        .with_write_timeout(Duration::from_secs(cli.write_timeout));

    tracing::info!(
        authenticated,
        api_base = %config.api_base,
        read_timeout_secs = cli.read_timeout,
        write_timeout_secs = cli.write_timeout,
        "Starting mcp-github-admin server"
    );

    let dispatcher = Dispatcher::new(config).map_err(McpGithubError::from)?;
    let service = server::McpGithubServer::new(GithubOps::new(dispatcher));
    let running = service.serve(stdio()).await?;
    running.waiting().await?;

    Ok(())
}
