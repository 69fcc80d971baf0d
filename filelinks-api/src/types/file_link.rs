//! File link representations

use filelinks_core::{EntityId, FileLink, OriginData, Timestamp};
use serde::{Deserialize, Serialize};

use super::links::{Link, Links, LinksBuilder};
use crate::paths;

pub const FILE_LINK_TYPE: &str = "FileLink";
pub const COLLECTION_TYPE: &str = "Collection";

/// HAL representation of one file link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileLinkResponse {
    #[serde(rename = "_type")]
    pub resource_type: String,
    #[schema(value_type = String, format = Uuid)]
    pub id: EntityId,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
    /// Metadata of the file on the external storage
    #[schema(value_type = Object)]
    pub origin_data: OriginData,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl From<&FileLink> for FileLinkResponse {
    fn from(link: &FileLink) -> Self {
        let links = LinksBuilder::new()
            .self_link(paths::file_link(link.file_link_id))
            .add("storage", Link::get(paths::storage(link.storage_id)))
            .add("container", Link::get(paths::container(&link.container)))
            .add("creator", Link::get(paths::user(&link.creator)))
            .build();

        Self {
            resource_type: FILE_LINK_TYPE.to_string(),
            id: link.file_link_id,
            created_at: link.created_at,
            updated_at: link.updated_at,
            origin_data: link.origin.clone(),
            links,
        }
    }
}

/// Embedded section of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FileLinkElements {
    pub elements: Vec<FileLinkResponse>,
}

/// HAL collection of file links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FileLinkCollectionResponse {
    #[serde(rename = "_type")]
    pub resource_type: String,
    pub total: usize,
    pub count: usize,
    #[serde(rename = "_embedded")]
    pub embedded: FileLinkElements,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl FileLinkCollectionResponse {
    /// Collection of `links` in the given order, linking back to `self_href`.
    pub fn new<'a>(links: impl IntoIterator<Item = &'a FileLink>, self_href: String) -> Self {
        let elements: Vec<FileLinkResponse> = links.into_iter().map(FileLinkResponse::from).collect();
        Self {
            resource_type: COLLECTION_TYPE.to_string(),
            total: elements.len(),
            count: elements.len(),
            embedded: FileLinkElements { elements },
            links: LinksBuilder::new().self_link(self_href).build(),
        }
    }

    pub fn elements(&self) -> &[FileLinkResponse] {
        &self.embedded.elements
    }
}

// ============================================================================
// REQUEST SCHEMA (documentation only; bodies are parsed leniently)
// ============================================================================

/// One file link to create.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileLinkElement {
    /// `id` and `name` are required; `mimeType`, `size`, `createdAt`,
    /// `lastModifiedAt`, `createdByName` and `lastModifiedByName` are optional.
    #[schema(value_type = Object)]
    pub origin_data: serde_json::Value,
    /// Must contain `storage.href`. `creator` and `container` are ignored.
    #[serde(rename = "_links")]
    pub links: Links,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FileLinkElementList {
    pub elements: Vec<FileLinkElement>,
}

/// Body of a batch create request.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateFileLinksRequest {
    #[serde(rename = "_embedded")]
    pub embedded: FileLinkElementList,
}
