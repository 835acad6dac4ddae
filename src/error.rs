use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("duckdb error: {0}")]
    DuckDb(#[from] duckdb::Error),
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid tool arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),
    #[error("internal error: {0}")]
    Internal(String),
}
