//! gitmgr-mcp - git operations for AI assistants over MCP.
//!
//! Requests and responses go through stdin/stdout; logs go to stderr.
//! `RUST_LOG` controls verbosity (default `info`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gitmgr_core::{CONFIG_FILE_NAME, Config, RepoContext};
use gitmgr_github::Auth;
use gitmgr_mcp::{McpServer, ToolContext, ToolRegistry};
use tracing_subscriber::EnvFilter;

/// MCP server for everyday git operations.
#[derive(Parser)]
#[command(name = "gitmgr-mcp")]
#[command(version, about)]
struct Args {
    /// Directory the repository is discovered from.
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Configuration file [default: <root>/.gitmgr.toml].
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = args
        .config
        .unwrap_or_else(|| args.root.join(CONFIG_FILE_NAME));
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let token_env = &config.github.token_env;
    let auth = Auth::from_env(token_env.as_str());
    if auth.has_token() {
        tracing::info!(var = %token_env, "token available for authenticated GitHub operations");
    } else {
        tracing::warn!(
            var = %token_env,
            "token not set; push and pull to GitHub rely on git credentials"
        );
    }

    let registry = ToolRegistry::builtin().context("tool registration failed")?;
    let context = ToolContext::new(RepoContext::new(&args.root), config, auth);

    tracing::info!(root = %args.root.display(), "starting gitmgr-mcp");
    let server = McpServer::new(registry, context);
    server.run(std::io::stdin().lock(), std::io::stdout().lock())?;

    Ok(())
}
