//! REST binding for the work item tracking client
//!
//! A minimal mapping of the four collaborator calls onto the Azure DevOps
//! REST endpoints. Authentication is a personal access token sent as basic
//! auth; there is no retry or caching layer here.

use ado_core::{config::ConnectionConfig, WorkItemId};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Response, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use crate::client::{ByteChunks, ClientError, ClientResult, WorkItemClient};
use crate::model::{
    AttachmentReference, JsonPatchOperation, UploadType, WorkItem, WorkItemExpand,
};

const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// HTTP client for the Azure DevOps work item tracking REST API.
pub struct RestWorkItemClient {
    http: reqwest::Client,
    organization_url: String,
    project: String,
    personal_access_token: String,
    api_version: String,
}

impl RestWorkItemClient {
    pub fn new(connection: &ConnectionConfig) -> ClientResult<Self> {
        // Validate the base URL up front so every later call can assume it.
        Url::parse(&connection.organization_url)?;

        Ok(Self {
            http: reqwest::Client::new(),
            organization_url: connection.organization_url.trim_end_matches('/').to_string(),
            project: connection.project.clone(),
            personal_access_token: connection.personal_access_token.clone(),
            api_version: connection.api_version.clone(),
        })
    }

    /// Build a work item tracking API URL with the api-version applied.
    fn api_url(&self, path: &str) -> ClientResult<Url> {
        let mut url = Url::parse(&format!(
            "{}/{}/_apis/wit/{}",
            self.organization_url, self.project, path
        ))?;
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth("", Some(&self.personal_access_token))
    }

    /// Turn a non-success response into an API error.
    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl WorkItemClient for RestWorkItemClient {
    #[instrument(skip(self))]
    async fn get_work_item(
        &self,
        id: WorkItemId,
        expand: WorkItemExpand,
    ) -> ClientResult<WorkItem> {
        let mut url = self.api_url(&format!("workitems/{id}"))?;
        if expand != WorkItemExpand::None {
            url.query_pairs_mut().append_pair("$expand", expand.as_str());
        }

        let response = self.authorized(self.http.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::WorkItemNotFound(id));
        }
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self))]
    async fn get_attachment_content(&self, attachment_id: &str) -> ClientResult<ByteChunks> {
        let url = self.api_url(&format!("attachments/{attachment_id}"))?;

        let response = self.authorized(self.http.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::AttachmentNotFound(attachment_id.to_string()));
        }
        let mut response = Self::check(response).await?;

        let mut chunks = ByteChunks::new();
        while let Some(chunk) = response.chunk().await? {
            chunks.push(chunk);
        }
        debug!(attachment_id, chunks = chunks.len(), "Attachment content fetched");
        Ok(chunks)
    }

    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn create_attachment(
        &self,
        data: Bytes,
        file_name: &str,
        upload_type: UploadType,
    ) -> ClientResult<AttachmentReference> {
        let mut url = self.api_url("attachments")?;
        url.query_pairs_mut()
            .append_pair("fileName", file_name)
            .append_pair("uploadType", upload_type.as_str());

        let response = self
            .authorized(self.http.post(url))
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self, patch))]
    async fn update_work_item(
        &self,
        patch: &[JsonPatchOperation],
        id: WorkItemId,
        bypass_rules: bool,
    ) -> ClientResult<WorkItem> {
        let mut url = self.api_url(&format!("workitems/{id}"))?;
        url.query_pairs_mut()
            .append_pair("bypassRules", if bypass_rules { "true" } else { "false" });

        let body = serde_json::to_vec(patch)?;
        let response = self
            .authorized(self.http.patch(url))
            .header(header::CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::WorkItemNotFound(id));
        }
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }
}
