//! Error types for the MCP server.

use thiserror::Error;

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving requests.
#[derive(Debug, Error)]
pub enum Error {
    /// A tool failed; reported to the client as a tool result, not a protocol error.
    #[error(transparent)]
    Tool(#[from] gitmgr_core::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error on the transport.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The registry was built without tools.
    #[error("no tools registered")]
    NoTools,

    /// Two tools share a name.
    #[error("duplicate tool name: {0}")]
    DuplicateTool(&'static str),
}
