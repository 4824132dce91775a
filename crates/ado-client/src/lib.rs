//! # ado-client
//!
//! Work item tracking client boundary for the Azure DevOps attachment tools.
//!
//! The tracking service is an external collaborator. This crate pins down the
//! stable interface the tool layer talks to ([`WorkItemClient`]) together with
//! the wire models that cross it, and ships two implementations:
//!
//! - [`RestWorkItemClient`]: a deliberately minimal binding of the four
//!   collaborator calls to the Azure DevOps REST endpoints. Nothing beyond
//!   those mappings lives here.
//! - [`MemoryWorkItemClient`]: an in-memory fake for tests.

pub mod client;
pub mod memory;
pub mod model;
pub mod rest;

pub use client::{ByteChunks, ClientError, ClientResult, WorkItemClient};
pub use memory::{MemoryWorkItemClient, UploadRecord};
pub use model::{
    add_attachment_patch, AttachmentReference, JsonPatchOperation, PatchOp, UploadType, WorkItem,
    WorkItemExpand, WorkItemRelation, ATTACHED_FILE_REL,
};
pub use rest::RestWorkItemClient;
