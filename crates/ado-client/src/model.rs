//! Wire models for the work item tracking service
//!
//! Field names follow the Azure DevOps REST representation (camelCase).

use ado_core::WorkItemId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Relation kind used for binary attachments.
pub const ATTACHED_FILE_REL: &str = "AttachedFile";

/// Expansion level requested when fetching a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkItemExpand {
    None,
    Relations,
    Fields,
    Links,
    All,
}

impl WorkItemExpand {
    /// Value of the `$expand` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Relations => "relations",
            Self::Fields => "fields",
            Self::Links => "links",
            Self::All => "all",
        }
    }

    /// Whether this expansion includes the relation list.
    pub fn includes_relations(&self) -> bool {
        matches!(self, Self::Relations | Self::Links | Self::All)
    }
}

/// A work item's link record pointing to another resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItemRelation {
    pub rel: String,
    pub url: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl WorkItemRelation {
    /// Build an `AttachedFile` relation for the given attachment URL.
    pub fn attached_file(
        url: impl Into<String>,
        name: impl Into<String>,
        comment: Option<&str>,
    ) -> Self {
        let mut attributes = Map::new();
        attributes.insert("name".to_string(), Value::String(name.into()));
        attributes.insert(
            "comment".to_string(),
            Value::String(comment.unwrap_or_default().to_string()),
        );
        Self {
            rel: ATTACHED_FILE_REL.to_string(),
            url: url.into(),
            attributes,
        }
    }

    pub fn is_attached_file(&self) -> bool {
        self.rel == ATTACHED_FILE_REL
    }

    /// Whether this relation's URL points at the given attachment id.
    pub fn references(&self, attachment_id: &str) -> bool {
        self.url.contains(attachment_id)
    }

    fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// File name recorded on the relation.
    pub fn name(&self) -> Option<&str> {
        self.attribute_str("name")
    }

    pub fn comment(&self) -> Option<&str> {
        self.attribute_str("comment")
    }

    /// Content type recorded on the relation, if the server provided one.
    pub fn content_type(&self) -> Option<&str> {
        self.attribute_str("contentType")
    }
}

/// A work item as returned by the tracking service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: WorkItemId,
    /// Monotonic revision counter, bumped by the service on each update.
    pub rev: i32,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<Vec<WorkItemRelation>>,
}

impl WorkItem {
    pub fn new(id: WorkItemId, rev: i32) -> Self {
        Self {
            id,
            rev,
            fields: Map::new(),
            relations: None,
        }
    }

    pub fn with_relation(mut self, relation: WorkItemRelation) -> Self {
        self.relations.get_or_insert_with(Vec::new).push(relation);
        self
    }

    /// Find the attachment relation referencing the given attachment id.
    pub fn find_attachment(&self, attachment_id: &str) -> Option<&WorkItemRelation> {
        self.relations
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|r| r.is_attached_file() && r.references(attachment_id))
    }
}

/// Reference to uploaded attachment content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentReference {
    pub id: String,
    pub url: String,
}

/// Upload mode passed to the attachment store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadType {
    Simple,
    Chunked,
}

impl UploadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Chunked => "chunked",
        }
    }
}

/// JSON Patch operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
    Test,
}

/// A single JSON Patch operation as sent to the work item update endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonPatchOperation {
    pub op: PatchOp,
    pub path: String,
    pub value: Value,
}

/// Patch document appending an `AttachedFile` relation to a work item.
pub fn add_attachment_patch(
    attachment_url: &str,
    attachment_name: &str,
    comment: Option<&str>,
) -> Vec<JsonPatchOperation> {
    let relation = WorkItemRelation::attached_file(attachment_url, attachment_name, comment);
    vec![JsonPatchOperation {
        op: PatchOp::Add,
        path: "/relations/-".to_string(),
        value: serde_json::to_value(relation).unwrap_or(Value::Null),
    }]
}
