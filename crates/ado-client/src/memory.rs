//! In-memory work item client for testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use ado_core::WorkItemId;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::client::{ByteChunks, ClientError, ClientResult, WorkItemClient};
use crate::model::{
    AttachmentReference, JsonPatchOperation, PatchOp, UploadType, WorkItem, WorkItemExpand,
    WorkItemRelation,
};

/// In-memory fake of the tracking service.
///
/// Seedable with work items and attachment content; applies add-relation
/// patches and bumps revisions the way the real service does.
pub struct MemoryWorkItemClient {
    work_items: RwLock<HashMap<WorkItemId, WorkItem>>,
    attachment_content: RwLock<HashMap<String, ByteChunks>>,
    uploads: RwLock<Vec<UploadRecord>>,
    next_attachment: AtomicU64,
}

/// What was handed to `create_attachment`.
#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub file_name: String,
    pub data: Bytes,
    pub upload_type: UploadType,
}

impl Default for MemoryWorkItemClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWorkItemClient {
    pub fn new() -> Self {
        Self {
            work_items: RwLock::new(HashMap::new()),
            attachment_content: RwLock::new(HashMap::new()),
            uploads: RwLock::new(Vec::new()),
            next_attachment: AtomicU64::new(1),
        }
    }

    pub async fn seed_work_item(&self, work_item: WorkItem) {
        let mut items = self.work_items.write().await;
        items.insert(work_item.id, work_item);
    }

    pub async fn seed_attachment_content(&self, attachment_id: impl Into<String>, chunks: ByteChunks) {
        let mut content = self.attachment_content.write().await;
        content.insert(attachment_id.into(), chunks);
    }

    /// Uploads recorded so far, in call order.
    pub async fn uploads(&self) -> Vec<UploadRecord> {
        self.uploads.read().await.clone()
    }
}

#[async_trait]
impl WorkItemClient for MemoryWorkItemClient {
    async fn get_work_item(
        &self,
        id: WorkItemId,
        expand: WorkItemExpand,
    ) -> ClientResult<WorkItem> {
        let items = self.work_items.read().await;
        let mut item = items
            .get(&id)
            .cloned()
            .ok_or(ClientError::WorkItemNotFound(id))?;
        if !expand.includes_relations() {
            item.relations = None;
        }
        Ok(item)
    }

    async fn get_attachment_content(&self, attachment_id: &str) -> ClientResult<ByteChunks> {
        let content = self.attachment_content.read().await;
        content
            .get(attachment_id)
            .cloned()
            .ok_or_else(|| ClientError::AttachmentNotFound(attachment_id.to_string()))
    }

    async fn create_attachment(
        &self,
        data: Bytes,
        file_name: &str,
        upload_type: UploadType,
    ) -> ClientResult<AttachmentReference> {
        let n = self.next_attachment.fetch_add(1, Ordering::SeqCst);
        let id = format!("mem-attachment-{n}");
        let url = format!("https://dev.azure.com/example/_apis/wit/attachments/{id}");

        let mut content = self.attachment_content.write().await;
        content.insert(id.clone(), vec![data.clone()]);

        let mut uploads = self.uploads.write().await;
        uploads.push(UploadRecord {
            file_name: file_name.to_string(),
            data,
            upload_type,
        });

        Ok(AttachmentReference { id, url })
    }

    async fn update_work_item(
        &self,
        patch: &[JsonPatchOperation],
        id: WorkItemId,
        _bypass_rules: bool,
    ) -> ClientResult<WorkItem> {
        let mut items = self.work_items.write().await;
        let item = items
            .get_mut(&id)
            .ok_or(ClientError::WorkItemNotFound(id))?;

        for op in patch {
            if op.op == PatchOp::Add && op.path == "/relations/-" {
                let relation: WorkItemRelation = serde_json::from_value(op.value.clone())?;
                item.relations.get_or_insert_with(Vec::new).push(relation);
            }
        }
        item.rev += 1;
        Ok(item.clone())
    }
}
