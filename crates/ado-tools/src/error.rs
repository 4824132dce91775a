//! Tool errors
//!
//! Every failure a tool call can hit ends up as one of these; the registry
//! renders them as `Error: ...` result text.

use std::path::PathBuf;

use ado_client::ClientError;
use ado_core::WorkItemId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(
        "File not found: {path}. Ensure the file is available in one of these locations: {}",
        searched_list(.searched)
    )]
    FileNotFound { path: String, searched: Vec<PathBuf> },

    #[error("No attachments found in work item {work_item_id}")]
    NoAttachments { work_item_id: WorkItemId },

    #[error("Attachment {attachment_id} not found in work item {work_item_id}")]
    AttachmentNotFound {
        attachment_id: String,
        work_item_id: WorkItemId,
    },

    #[error("Work item {work_item_id} not found")]
    WorkItemNotFound { work_item_id: WorkItemId },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ToolResult<T> = Result<T, ToolError>;

fn searched_list(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
