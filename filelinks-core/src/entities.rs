//! File link data structures
//!
//! Parameter sets move through the batch pipeline in three stages:
//! `FileLinkParams` (decoded from the client), `ContextualizedItem` (server context
//! applied) and finally `FileLink` (the persisted resource).

use serde::{Deserialize, Serialize};

use crate::identity::{ActorId, ContainerRef, EntityId, Timestamp};

/// Metadata describing the file on the external storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginData {
    /// File id on the storage. Kept as a string since storages differ in id formats.
    pub id: String,
    /// Display name of the file.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by_name: Option<String>,
}

/// Typed parameters decoded from one raw batch element.
///
/// `creator` and `container` hold whatever the client sent. They are reserved for
/// server context and never reach the item creator unmodified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLinkParams {
    /// Storage the file lives on.
    pub storage_id: Option<EntityId>,
    pub origin: OriginData,
    pub creator: Option<ActorId>,
    pub container: Option<ContainerRef>,
}

/// Ambient request values the context injector applies to every item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Authenticated actor performing the request.
    pub actor: ActorId,
    /// Container addressed by the route the batch was posted to.
    pub container: ContainerRef,
}

impl RequestContext {
    pub fn new(actor: ActorId, container: ContainerRef) -> Self {
        Self { actor, container }
    }
}

/// Parameters with server-controlled context applied, ready for creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextualizedItem {
    pub storage_id: Option<EntityId>,
    pub origin: OriginData,
    pub creator: ActorId,
    pub container: ContainerRef,
}

/// A persisted link between a container and a file on an external storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLink {
    pub file_link_id: EntityId,
    pub storage_id: EntityId,
    pub origin: OriginData,
    pub creator: ActorId,
    pub container: ContainerRef,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
