//! Tool definitions and dispatch
//!
//! The surface the hosting agent framework sees: named tools with JSON
//! schemas, invoked with JSON arguments, answering in plain text. A failed
//! call is not a transport error; its result text is the `Error: ...`
//! message.

use ado_client::WorkItemClient;
use ado_core::WorkItemId;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, instrument};

use crate::attachments::AttachmentTools;
use crate::error::{ToolError, ToolResult};

pub const DOWNLOAD_TOOL: &str = "download_work_item_attachment";
pub const UPLOAD_TOOL: &str = "upload_attachment_to_work_item";

/// A callable tool as advertised to the agent framework.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters_schema: Value,
}

#[derive(Debug, Deserialize)]
struct DownloadArgs {
    work_item_id: WorkItemId,
    attachment_id: String,
    output_path: String,
}

#[derive(Debug, Deserialize)]
struct UploadArgs {
    work_item_id: WorkItemId,
    file_path: String,
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default)]
    comment: Option<String>,
}

/// Registry of the attachment tools.
pub struct ToolRegistry<C: WorkItemClient> {
    tools: AttachmentTools<C>,
}

impl<C: WorkItemClient> ToolRegistry<C> {
    pub fn new(tools: AttachmentTools<C>) -> Self {
        Self { tools }
    }

    /// Advertised tool definitions.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: DOWNLOAD_TOOL.to_string(),
                description: "Downloads an attachment from a work item into the downloads \
                              directory. Use a simple filename or relative path as the \
                              output_path; the file is saved under the downloads directory."
                    .to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": {
                        "work_item_id": {
                            "type": "integer",
                            "description": "The work item ID"
                        },
                        "attachment_id": {
                            "type": "string",
                            "description": "The attachment ID"
                        },
                        "output_path": {
                            "type": "string",
                            "description": "Path where to save the downloaded file"
                        }
                    },
                    "required": ["work_item_id", "attachment_id", "output_path"]
                }),
            },
            ToolDefinition {
                name: UPLOAD_TOOL.to_string(),
                description: "Uploads a file and attaches it to a work item. The file_path \
                              may be a bare filename, a Windows host path, or a full path; \
                              it is located across the well-known exchange directories."
                    .to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": {
                        "work_item_id": {
                            "type": "integer",
                            "description": "The ID of the work item to attach the file to"
                        },
                        "file_path": {
                            "type": "string",
                            "description": "Path to the file to upload"
                        },
                        "file_name": {
                            "type": "string",
                            "description": "Optional name to use for the attachment"
                        },
                        "comment": {
                            "type": "string",
                            "description": "Optional comment about the attachment"
                        }
                    },
                    "required": ["work_item_id", "file_path"]
                }),
            },
        ]
    }

    /// Invoke a tool by name. Failures are rendered into the result text.
    #[instrument(skip(self, arguments))]
    pub async fn call(&self, name: &str, arguments: Value) -> String {
        match self.dispatch(name, arguments).await {
            Ok(text) => text,
            Err(e) => {
                error!(tool = name, error = %e, "Tool call failed");
                format!("Error: {e}")
            }
        }
    }

    async fn dispatch(&self, name: &str, arguments: Value) -> ToolResult<String> {
        match name {
            DOWNLOAD_TOOL => {
                let args: DownloadArgs = serde_json::from_value(arguments)?;
                let result = self
                    .tools
                    .download(args.work_item_id, &args.attachment_id, &args.output_path)
                    .await?;
                Ok(result.summary())
            }
            UPLOAD_TOOL => {
                let args: UploadArgs = serde_json::from_value(arguments)?;
                let report = self
                    .tools
                    .upload(
                        args.work_item_id,
                        &args.file_path,
                        args.file_name.as_deref(),
                        args.comment.as_deref(),
                    )
                    .await?;
                Ok(report.summary())
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ado_client::{MemoryWorkItemClient, WorkItem};
    use ado_core::config::DirectoriesConfig;
    use tempfile::TempDir;

    struct Fixture {
        client: Arc<MemoryWorkItemClient>,
        registry: ToolRegistry<MemoryWorkItemClient>,
        dirs: DirectoriesConfig,
        _guards: Vec<TempDir>,
    }

    fn fixture() -> Fixture {
        let downloads = TempDir::new().unwrap();
        let uploads = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        let dirs = DirectoriesConfig {
            downloads: downloads.path().to_path_buf(),
            uploads: uploads.path().to_path_buf(),
            temp: temp.path().to_path_buf(),
        };
        let client = Arc::new(MemoryWorkItemClient::new());
        let registry = ToolRegistry::new(AttachmentTools::new(client.clone(), dirs.clone()));
        Fixture {
            client,
            registry,
            dirs,
            _guards: vec![downloads, uploads, temp],
        }
    }

    #[test]
    fn test_definitions_advertise_both_tools() {
        let f = fixture();
        let definitions = f.registry.definitions();
        let names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec![DOWNLOAD_TOOL, UPLOAD_TOOL]);

        let upload = &definitions[1];
        assert_eq!(
            upload.parameters_schema["required"],
            json!(["work_item_id", "file_path"])
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_renders_error_text() {
        let f = fixture();
        let text = f.registry.call("delete_everything", json!({})).await;
        assert_eq!(text, "Error: Unknown tool: delete_everything");
    }

    #[tokio::test]
    async fn test_invalid_arguments_render_error_text() {
        let f = fixture();
        let text = f
            .registry
            .call(DOWNLOAD_TOOL, json!({"work_item_id": "not-a-number"}))
            .await;
        assert!(text.starts_with("Error: Invalid arguments:"));
    }

    #[tokio::test]
    async fn test_download_failure_is_result_text() {
        let f = fixture();
        f.client.seed_work_item(WorkItem::new(7, 1)).await;

        let text = f
            .registry
            .call(
                DOWNLOAD_TOOL,
                json!({
                    "work_item_id": 7,
                    "attachment_id": "att-1",
                    "output_path": "out.txt",
                }),
            )
            .await;
        assert_eq!(text, "Error: No attachments found in work item 7");
    }

    #[tokio::test]
    async fn test_upload_success_renders_summary() {
        let f = fixture();
        f.client.seed_work_item(WorkItem::new(10, 1)).await;
        std::fs::write(f.dirs.uploads.join("notes.txt"), b"notes").unwrap();

        let text = f
            .registry
            .call(
                UPLOAD_TOOL,
                json!({
                    "work_item_id": 10,
                    "file_path": "notes.txt",
                    "comment": "meeting notes",
                }),
            )
            .await;

        assert!(text.starts_with("# File Attached Successfully to Work Item 10"));
        assert!(text.contains("Filename: notes.txt"));
        assert!(text.contains("Comment: meeting notes"));
    }
}
