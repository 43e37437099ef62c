use serde::{Deserialize, Serialize};
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum AgentError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Tool execution failed: {0}")]
    ExecutionError(String),

    #[error("Reached the limit of {0} model calls without a final answer")]
    MaxTurnsExceeded(usize),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AgentResult<T> = Result<T, AgentError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "ANTHROPIC_API_KEY is not set. Export it, or add `ANTHROPIC_API_KEY=your-api-key` to {path}"
    )]
    MissingApiKey { path: String },

    #[error("Failed to read secrets file {path}: {reason}")]
    SecretsFile { path: String, reason: String },

    #[error(transparent)]
    Other(#[from] config::ConfigError),
}
