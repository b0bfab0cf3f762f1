//! Tool registry.
//!
//! The registry is an explicit table from tool name to description, JSON
//! input schema and handler, built once at startup. Handlers decode their
//! arguments with serde, open the shared repository handle and run the
//! matching service.

use gitmgr_core::{Config, Error as ToolError, RepoContext};
use gitmgr_github::Auth;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::protocol::ToolDefinition;
use crate::services::{
    BranchService, CommitRequest, CommitService, CreateBranchRequest, PullRequest, PushRequest,
    RemoteService, StatusService, SyncRequest, SyncService,
};
use crate::{Error, Result};

/// Everything a tool handler needs.
pub struct ToolContext {
    pub repo: RepoContext,
    pub config: Config,
    pub auth: Auth,
}

impl ToolContext {
    #[must_use]
    pub const fn new(repo: RepoContext, config: Config, auth: Auth) -> Self {
        Self { repo, config, auth }
    }
}

type Handler = fn(&ToolContext, Value) -> Result<Value>;

/// A registered tool.
pub struct Tool {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    handler: Handler,
}

impl Tool {
    /// Run the tool with raw JSON arguments.
    ///
    /// # Errors
    /// Returns [`Error::Tool`] when the operation fails or the arguments don't
    /// decode.
    pub fn call(&self, ctx: &ToolContext, arguments: Value) -> Result<Value> {
        tracing::debug!(tool = self.name, "calling tool");
        (self.handler)(ctx, arguments)
    }

    #[must_use]
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name,
            description: self.description,
            input_schema: self.input_schema.clone(),
        }
    }
}

/// Name-indexed table of tools.
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    /// Build a registry from `tools`.
    ///
    /// # Errors
    /// Fails when `tools` is empty or two tools share a name.
    pub fn new(tools: Vec<Tool>) -> Result<Self> {
        if tools.is_empty() {
            return Err(Error::NoTools);
        }
        for (i, tool) in tools.iter().enumerate() {
            if tools[..i].iter().any(|t| t.name == tool.name) {
                return Err(Error::DuplicateTool(tool.name));
            }
        }
        Ok(Self { tools })
    }

    /// The six git tools.
    ///
    /// # Errors
    /// Propagates [`ToolRegistry::new`] failures.
    pub fn builtin() -> Result<Self> {
        let registry = Self::new(vec![
            status_tool(),
            commit_tool(),
            create_branch_tool(),
            push_tool(),
            pull_tool(),
            sync_tool(),
        ])?;

        tracing::info!(
            count = registry.tools.len(),
            tools = %registry.names().join(", "),
            "registered tools"
        );
        Ok(registry)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|tool| tool.name).collect()
    }

    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(Tool::definition).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Decode tool arguments; a missing or `null` argument object means no arguments.
fn decode<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments)
        .map_err(|e| Error::Tool(ToolError::InvalidArguments(e.to_string())))
}

fn respond<T: Serialize>(result: gitmgr_core::Result<T>) -> Result<Value> {
    Ok(serde_json::to_value(result?)?)
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct NoArguments {}

fn status_tool() -> Tool {
    Tool {
        name: "git_status",
        description: "Show the current branch, its tracking branch with ahead/behind \
                      counts, and staged, modified and untracked files.",
        input_schema: json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }),
        handler: |ctx, arguments| {
            let NoArguments {} = decode(arguments)?;
            let repo = ctx.repo.handle()?;
            respond(StatusService::new(&*repo).status())
        },
    }
}

fn commit_tool() -> Tool {
    Tool {
        name: "git_commit",
        description: "Stage changes and create a conventional commit ('type: message') \
                      with the attribution footer.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "type": {
                    "type": "string",
                    "enum": gitmgr_core::CommitType::ALL
                        .iter()
                        .map(|t| t.as_str())
                        .collect::<Vec<_>>(),
                    "description": "Conventional commit type"
                },
                "message": {
                    "type": "string",
                    "description": "Commit subject, without the type prefix"
                },
                "files": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Paths to stage; all changes when omitted"
                },
                "skip_hooks": {
                    "type": "boolean",
                    "default": false,
                    "description": "Skip pre-commit hooks (--no-verify)"
                }
            },
            "required": ["type", "message"],
            "additionalProperties": false
        }),
        handler: |ctx, arguments| {
            let request: CommitRequest = decode(arguments)?;
            let repo = ctx.repo.handle()?;
            respond(CommitService::new(&*repo, &ctx.config.commit).commit(&request))
        },
    }
}

fn create_branch_tool() -> Tool {
    Tool {
        name: "git_create_branch",
        description: "Create and check out a branch, either by explicit name or derived \
                      from an issue number and/or description (issue-42-add-login).",
        input_schema: json!({
            "type": "object",
            "properties": {
                "branch_name": {"type": "string", "description": "Explicit branch name"},
                "issue_number": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Issue number for auto-naming"
                },
                "description": {
                    "type": "string",
                    "description": "Lowercase hyphenated slug for auto-naming"
                },
                "from_branch": {
                    "type": "string",
                    "description": "Base branch; the primary branch when auto-naming"
                },
                "pull_latest": {
                    "type": "boolean",
                    "default": false,
                    "description": "Pull the base branch before branching"
                }
            },
            "additionalProperties": false
        }),
        handler: |ctx, arguments| {
            let request: CreateBranchRequest = decode(arguments)?;
            let repo = ctx.repo.handle()?;
            let remote = &ctx.config.general.default_remote;
            respond(BranchService::new(&*repo, &ctx.auth, remote).create(&request))
        },
    }
}

fn push_tool() -> Tool {
    Tool {
        name: "git_push",
        description: "Push a branch to a remote, setting the upstream for new branches.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "remote": {"type": "string", "description": "Remote name"},
                "branch": {"type": "string", "description": "Branch; the current one when omitted"},
                "set_upstream": {"type": "boolean", "default": true},
                "force": {"type": "boolean", "default": false}
            },
            "additionalProperties": false
        }),
        handler: |ctx, arguments| {
            let request: PushRequest = decode(arguments)?;
            let repo = ctx.repo.handle()?;
            let remote = &ctx.config.general.default_remote;
            respond(RemoteService::new(&*repo, &ctx.auth, remote).push(&request))
        },
    }
}

fn pull_tool() -> Tool {
    Tool {
        name: "git_pull",
        description: "Pull a branch from a remote with a merge. Refuses to run with \
                      uncommitted changes.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "remote": {"type": "string", "description": "Remote name"},
                "branch": {"type": "string", "description": "Branch; the current one when omitted"}
            },
            "additionalProperties": false
        }),
        handler: |ctx, arguments| {
            let request: PullRequest = decode(arguments)?;
            let repo = ctx.repo.handle()?;
            let remote = &ctx.config.general.default_remote;
            respond(RemoteService::new(&*repo, &ctx.auth, remote).pull(&request))
        },
    }
}

fn sync_tool() -> Tool {
    Tool {
        name: "git_sync_with_main",
        description: "Fetch the primary branch and merge or rebase the current branch onto it. \
                      Conflicts are aborted and reported.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "main_branch": {"type": "string", "description": "Primary branch name"},
                "strategy": {
                    "type": "string",
                    "enum": ["merge", "rebase"],
                    "default": "merge"
                },
                "remote": {"type": "string", "description": "Remote name"}
            },
            "additionalProperties": false
        }),
        handler: |ctx, arguments| {
            let request: SyncRequest = decode(arguments)?;
            let repo = ctx.repo.handle()?;
            respond(SyncService::new(&*repo, &ctx.auth, &ctx.config.general).sync(&request))
        },
    }
}
