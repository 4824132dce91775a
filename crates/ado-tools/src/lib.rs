//! # ado-tools
//!
//! Work item attachment tools for agent frameworks.
//!
//! Exposes Azure DevOps attachment operations (download, upload,
//! attach-to-work-item) as callable tools. The substantive work happens on
//! the tracking service side of [`ado_client::WorkItemClient`]; this crate
//! owns the file locator for the well-known exchange directories, the
//! operation orchestration, and the text rendering of results.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ado_tools::{AttachmentTools, ToolRegistry};
//! use std::sync::Arc;
//!
//! let tools = AttachmentTools::new(Arc::new(client), dirs);
//! let registry = ToolRegistry::new(tools);
//!
//! let text = registry
//!     .call("download_work_item_attachment", serde_json::json!({
//!         "work_item_id": 42,
//!         "attachment_id": "abc-123",
//!         "output_path": "report.pdf",
//!     }))
//!     .await;
//! ```

pub mod attachments;
pub mod error;
pub mod locator;
pub mod registry;

pub use attachments::{
    AttachOutcome, AttachmentTools, DownloadedAttachment, UploadReport, UploadedAttachment,
};
pub use error::{ToolError, ToolResult};
pub use locator::{normalize_filename, FileLocator};
pub use registry::{ToolDefinition, ToolRegistry, DOWNLOAD_TOOL, UPLOAD_TOOL};
