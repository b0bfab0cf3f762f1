//! # gitmgr-mcp
//!
//! MCP server exposing six git operations as tools: `git_status`,
//! `git_commit`, `git_create_branch`, `git_push`, `git_pull` and
//! `git_sync_with_main`.
//!
//! ```text
//! [ MCP client ] --JSON-RPC over stdio--> [ server ] --> [ registry ]
//!                                                            |
//!                                                            v
//!                                      [ services ] --> [ gitmgr-git ]
//! ```
//!
//! Failures of a tool are returned as tool results flagged `isError`, with
//! the classified error as structured content.

pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod services;

pub use error::{Error, Result};
pub use registry::{Tool, ToolContext, ToolRegistry};
pub use server::McpServer;
