//! Attachment operations
//!
//! Orchestrates the three operations over the tracking client: download an
//! attachment from a work item, upload a local file as attachment content,
//! and attach uploaded content to a work item.

use std::path::PathBuf;
use std::sync::Arc;

use ado_client::{
    add_attachment_patch, ClientError, UploadType, WorkItemClient, WorkItemExpand,
};
use ado_core::{config::DirectoriesConfig, WorkItemId};
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};

use crate::error::{ToolError, ToolResult};
use crate::locator::{normalize_filename, FileLocator};

/// Outcome of a download: what was written and where.
#[derive(Debug, Clone)]
pub struct DownloadedAttachment {
    pub filename: String,
    pub size: u64,
    pub content_type: String,
    pub saved_to: PathBuf,
}

impl DownloadedAttachment {
    /// Result text handed back to the calling agent.
    pub fn summary(&self) -> String {
        format!(
            "# Attachment Downloaded Successfully\n\
             Filename: {}\n\
             Size: {} bytes\n\
             Content Type: {}\n\
             Saved to: {}\n\
             \n\
             The file is now available for viewing or processing.",
            self.filename,
            self.size,
            self.content_type,
            self.saved_to.display()
        )
    }
}

/// Outcome of uploading attachment content.
#[derive(Debug, Clone)]
pub struct UploadedAttachment {
    pub id: String,
    pub url: String,
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub resolved_path: PathBuf,
}

/// Outcome of attaching uploaded content to a work item.
#[derive(Debug, Clone)]
pub struct AttachOutcome {
    pub work_item_id: WorkItemId,
    pub attachment_url: String,
    pub attachment_name: String,
    pub comment: String,
    pub revision: i32,
}

/// Combined outcome of the upload tool (upload + attach).
#[derive(Debug, Clone)]
pub struct UploadReport {
    pub attachment: UploadedAttachment,
    pub attach: AttachOutcome,
}

impl UploadReport {
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!(
                "# File Attached Successfully to Work Item {}",
                self.attach.work_item_id
            ),
            format!("Filename: {}", self.attachment.name),
            format!("Size: {} bytes", self.attachment.size),
            format!("Content Type: {}", self.attachment.content_type),
            format!(
                "File location: {}",
                self.attachment.resolved_path.display()
            ),
            format!("Work item revision: {}", self.attach.revision),
        ];
        if !self.attach.comment.is_empty() {
            lines.push(format!("Comment: {}", self.attach.comment));
        }
        lines.push(String::new());
        lines.push("The file has been uploaded and attached to the work item.".to_string());
        lines.join("\n")
    }
}

/// Attachment tool operations over a work item tracking client.
pub struct AttachmentTools<C: WorkItemClient> {
    client: Arc<C>,
    dirs: DirectoriesConfig,
    locator: FileLocator,
}

impl<C: WorkItemClient> AttachmentTools<C> {
    pub fn new(client: Arc<C>, dirs: DirectoriesConfig) -> Self {
        let locator = FileLocator::new(dirs.clone());
        Self {
            client,
            dirs,
            locator,
        }
    }

    /// Download an attachment from a work item into the downloads directory.
    #[instrument(skip(self))]
    pub async fn download(
        &self,
        work_item_id: WorkItemId,
        attachment_id: &str,
        output_path: &str,
    ) -> ToolResult<DownloadedAttachment> {
        let work_item = self
            .client
            .get_work_item(work_item_id, WorkItemExpand::Relations)
            .await
            .map_err(|e| Self::map_missing(e, work_item_id))?;

        if work_item.relations.as_deref().map_or(true, <[_]>::is_empty) {
            return Err(ToolError::NoAttachments { work_item_id });
        }

        let relation = work_item.find_attachment(attachment_id).ok_or_else(|| {
            ToolError::AttachmentNotFound {
                attachment_id: attachment_id.to_string(),
                work_item_id,
            }
        })?;

        let save_name = normalize_filename(output_path);
        let filename = relation
            .name()
            .map(normalize_filename)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| save_name.clone());
        let content_type = relation
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let chunks = self.client.get_attachment_content(attachment_id).await?;

        let final_path = self.dirs.downloads.join(&save_name);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&final_path).await?;
        let mut total: u64 = 0;
        for chunk in &chunks {
            file.write_all(chunk).await?;
            total += chunk.len() as u64;
        }
        file.sync_all().await?;

        info!(
            work_item_id,
            attachment_id,
            size = total,
            path = %final_path.display(),
            "Attachment downloaded"
        );

        Ok(DownloadedAttachment {
            filename,
            size: total,
            content_type,
            saved_to: final_path,
        })
    }

    /// Upload a local file and attach it to a work item.
    #[instrument(skip(self))]
    pub async fn upload(
        &self,
        work_item_id: WorkItemId,
        file_path: &str,
        file_name: Option<&str>,
        comment: Option<&str>,
    ) -> ToolResult<UploadReport> {
        let resolved = self.locator.locate(file_path).await?;
        let data = fs::read(&resolved).await?;
        let size = data.len() as u64;

        let name = match file_name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => normalize_filename(file_path),
        };
        let content_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .to_string();

        let reference = self
            .client
            .create_attachment(Bytes::from(data), &name, UploadType::Simple)
            .await?;

        info!(
            work_item_id,
            attachment_id = %reference.id,
            name = %name,
            size,
            "Attachment content uploaded"
        );

        let attach = self
            .attach(work_item_id, &reference.url, &name, comment)
            .await?;

        Ok(UploadReport {
            attachment: UploadedAttachment {
                id: reference.id,
                url: reference.url,
                name,
                size,
                content_type,
                resolved_path: resolved,
            },
            attach,
        })
    }

    /// Attach already-uploaded content to a work item via a relation patch.
    #[instrument(skip(self))]
    pub async fn attach(
        &self,
        work_item_id: WorkItemId,
        attachment_url: &str,
        attachment_name: &str,
        comment: Option<&str>,
    ) -> ToolResult<AttachOutcome> {
        // Verify the work item exists before patching it.
        self.client
            .get_work_item(work_item_id, WorkItemExpand::None)
            .await
            .map_err(|e| Self::map_missing(e, work_item_id))?;

        let patch = add_attachment_patch(attachment_url, attachment_name, comment);
        let updated = self
            .client
            .update_work_item(&patch, work_item_id, false)
            .await
            .map_err(|e| Self::map_missing(e, work_item_id))?;

        info!(
            work_item_id,
            attachment_url,
            revision = updated.rev,
            "Attachment relation added"
        );

        Ok(AttachOutcome {
            work_item_id,
            attachment_url: attachment_url.to_string(),
            attachment_name: attachment_name.to_string(),
            comment: comment.unwrap_or_default().to_string(),
            revision: updated.rev,
        })
    }

    fn map_missing(error: ClientError, work_item_id: WorkItemId) -> ToolError {
        match error {
            ClientError::WorkItemNotFound(_) => ToolError::WorkItemNotFound { work_item_id },
            other => ToolError::Client(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ado_client::{MemoryWorkItemClient, WorkItem, WorkItemRelation};
    use tempfile::TempDir;

    struct Fixture {
        client: Arc<MemoryWorkItemClient>,
        tools: AttachmentTools<MemoryWorkItemClient>,
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
        let tools = AttachmentTools::new(client.clone(), dirs.clone());
        Fixture {
            client,
            tools,
            dirs,
            _guards: vec![downloads, uploads, temp],
        }
    }

    #[tokio::test]
    async fn test_download_writes_exact_bytes() {
        let f = fixture();
        f.client
            .seed_work_item(WorkItem::new(42, 5).with_relation(
                WorkItemRelation::attached_file(
                    "https://dev.azure.com/org/_apis/wit/attachments/att-1",
                    "report.pdf",
                    None,
                ),
            ))
            .await;
        f.client
            .seed_attachment_content(
                "att-1",
                vec![Bytes::from("first chunk "), Bytes::from("second chunk")],
            )
            .await;

        let result = f.tools.download(42, "att-1", "report.pdf").await.unwrap();

        assert_eq!(result.filename, "report.pdf");
        assert_eq!(result.size, 24);
        assert_eq!(result.saved_to, f.dirs.downloads.join("report.pdf"));

        let written = std::fs::read(&result.saved_to).unwrap();
        assert_eq!(written, b"first chunk second chunk");
    }

    #[tokio::test]
    async fn test_download_normalizes_windows_output_path() {
        let f = fixture();
        f.client
            .seed_work_item(WorkItem::new(1, 1).with_relation(
                WorkItemRelation::attached_file(
                    "https://example/_apis/wit/attachments/att-9",
                    "log.txt",
                    None,
                ),
            ))
            .await;
        f.client
            .seed_attachment_content("att-9", vec![Bytes::from("log line")])
            .await;

        let result = f
            .tools
            .download(1, "att-9", "C:\\Users\\bob\\Desktop\\log.txt")
            .await
            .unwrap();

        assert_eq!(result.saved_to, f.dirs.downloads.join("log.txt"));
    }

    #[tokio::test]
    async fn test_download_without_relations_fails() {
        let f = fixture();
        f.client.seed_work_item(WorkItem::new(7, 1)).await;

        let err = f.tools.download(7, "att-1", "out.txt").await.unwrap_err();
        assert!(matches!(err, ToolError::NoAttachments { work_item_id: 7 }));
    }

    #[tokio::test]
    async fn test_download_unknown_attachment_fails() {
        let f = fixture();
        f.client
            .seed_work_item(WorkItem::new(7, 1).with_relation(
                WorkItemRelation::attached_file("https://example/att/other", "o.txt", None),
            ))
            .await;

        let err = f.tools.download(7, "att-1", "out.txt").await.unwrap_err();
        assert!(matches!(err, ToolError::AttachmentNotFound { .. }));
    }

    #[tokio::test]
    async fn test_download_missing_work_item() {
        let f = fixture();
        let err = f.tools.download(99, "att-1", "out.txt").await.unwrap_err();
        assert!(matches!(err, ToolError::WorkItemNotFound { work_item_id: 99 }));
    }

    #[tokio::test]
    async fn test_upload_attaches_and_reports_revision() {
        let f = fixture();
        f.client.seed_work_item(WorkItem::new(10, 4)).await;
        std::fs::write(f.dirs.uploads.join("evidence.png"), b"fake png").unwrap();

        let report = f
            .tools
            .upload(10, "evidence.png", None, Some("screenshot"))
            .await
            .unwrap();

        assert_eq!(report.attachment.name, "evidence.png");
        assert_eq!(report.attachment.size, 8);
        assert_eq!(report.attachment.content_type, "image/png");
        assert_eq!(report.attach.revision, 5);

        // The relation landed on the work item.
        let item = f
            .client
            .get_work_item(10, WorkItemExpand::Relations)
            .await
            .unwrap();
        let relations = item.relations.unwrap();
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].rel, "AttachedFile");
        assert_eq!(relations[0].name(), Some("evidence.png"));
        assert_eq!(relations[0].comment(), Some("screenshot"));

        // And the bytes were handed to the client as-is.
        let uploads = f.client.uploads().await;
        assert_eq!(uploads[0].data, Bytes::from("fake png"));
    }

    #[tokio::test]
    async fn test_upload_honors_explicit_file_name() {
        let f = fixture();
        f.client.seed_work_item(WorkItem::new(10, 1)).await;
        std::fs::write(f.dirs.temp.join("raw.bin"), b"bits").unwrap();

        let report = f
            .tools
            .upload(10, "raw.bin", Some("renamed.dat"), None)
            .await
            .unwrap();

        assert_eq!(report.attachment.name, "renamed.dat");
        let uploads = f.client.uploads().await;
        assert_eq!(uploads[0].file_name, "renamed.dat");
    }

    #[tokio::test]
    async fn test_upload_missing_file_lists_locations() {
        let f = fixture();
        f.client.seed_work_item(WorkItem::new(10, 1)).await;

        let err = f.tools.upload(10, "ghost.bin", None, None).await.unwrap_err();
        assert!(matches!(err, ToolError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_upload_to_missing_work_item() {
        let f = fixture();
        std::fs::write(f.dirs.uploads.join("a.txt"), b"a").unwrap();

        let err = f.tools.upload(55, "a.txt", None, None).await.unwrap_err();
        assert!(matches!(err, ToolError::WorkItemNotFound { work_item_id: 55 }));
    }

    #[test]
    fn test_summaries_render() {
        let download = DownloadedAttachment {
            filename: "report.pdf".to_string(),
            size: 1024,
            content_type: "application/pdf".to_string(),
            saved_to: PathBuf::from("/downloads/report.pdf"),
        };
        let text = download.summary();
        assert!(text.starts_with("# Attachment Downloaded Successfully"));
        assert!(text.contains("Size: 1024 bytes"));
        assert!(text.contains("Saved to: /downloads/report.pdf"));

        let report = UploadReport {
            attachment: UploadedAttachment {
                id: "att-1".to_string(),
                url: "https://example/att/1".to_string(),
                name: "evidence.png".to_string(),
                size: 8,
                content_type: "image/png".to_string(),
                resolved_path: PathBuf::from("/uploads/evidence.png"),
            },
            attach: AttachOutcome {
                work_item_id: 10,
                attachment_url: "https://example/att/1".to_string(),
                attachment_name: "evidence.png".to_string(),
                comment: "screenshot".to_string(),
                revision: 5,
            },
        };
        let text = report.summary();
        assert!(text.starts_with("# File Attached Successfully to Work Item 10"));
        assert!(text.contains("Comment: screenshot"));
        assert!(text.contains("Work item revision: 5"));
    }
}
