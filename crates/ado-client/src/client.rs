//! Client boundary for the work item tracking service
//!
//! All substantive work (relation bookkeeping, attachment storage, revision
//! assignment) happens on the other side of this trait.

use ado_core::WorkItemId;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::model::{
    AttachmentReference, JsonPatchOperation, UploadType, WorkItem, WorkItemExpand,
};

/// Attachment content as the sequence of byte chunks the service returned it in.
pub type ByteChunks = Vec<Bytes>;

/// Client-side failures
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Work item {0} not found")]
    WorkItemNotFound(WorkItemId),
    #[error("Attachment {0} not found")]
    AttachmentNotFound(String),
    #[error("Invalid organization URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Azure DevOps API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Work item tracking client
///
/// Mirrors the collaborator contract of the tracking SDK: fetch a work item
/// (optionally with relations), stream attachment content, create attachment
/// content, and patch a work item.
#[async_trait]
pub trait WorkItemClient: Send + Sync {
    /// Fetch a work item by id with the requested expansion.
    async fn get_work_item(
        &self,
        id: WorkItemId,
        expand: WorkItemExpand,
    ) -> ClientResult<WorkItem>;

    /// Fetch attachment content as a chunk sequence.
    async fn get_attachment_content(&self, attachment_id: &str) -> ClientResult<ByteChunks>;

    /// Upload attachment content, returning its id and URL.
    async fn create_attachment(
        &self,
        data: Bytes,
        file_name: &str,
        upload_type: UploadType,
    ) -> ClientResult<AttachmentReference>;

    /// Apply a JSON Patch document to a work item, returning the updated item.
    async fn update_work_item(
        &self,
        patch: &[JsonPatchOperation],
        id: WorkItemId,
        bypass_rules: bool,
    ) -> ClientResult<WorkItem>;
}
