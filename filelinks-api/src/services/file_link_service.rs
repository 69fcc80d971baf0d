//! File Link Service
//!
//! Creation contract for a single file link. Batch requests call it once per
//! element through the [`ItemCreator`] trait.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use filelinks_core::{
    new_entity_id, ContextualizedItem, EntityId, FileLink, InfrastructureError, ItemCreator,
    ItemErrors, ItemOutcome,
};

use crate::store::FileLinkStore;

pub const STORAGE_ATTRIBUTE: &str = "storage";
pub const ORIGIN_ID_ATTRIBUTE: &str = "originData/id";
pub const ORIGIN_NAME_ATTRIBUTE: &str = "originData/name";

const BLANK: &str = "can't be blank.";
const DOES_NOT_EXIST: &str = "does not exist.";

/// Validates and persists file links.
#[derive(Clone)]
pub struct FileLinkService {
    store: Arc<dyn FileLinkStore>,
    storages: Arc<HashSet<EntityId>>,
}

impl FileLinkService {
    pub fn new(store: Arc<dyn FileLinkStore>, storages: impl IntoIterator<Item = EntityId>) -> Self {
        Self {
            store,
            storages: Arc::new(storages.into_iter().collect()),
        }
    }

    pub fn store(&self) -> &Arc<dyn FileLinkStore> {
        &self.store
    }

    /// Check every attribute and report all violations together.
    fn validate(&self, item: &ContextualizedItem) -> ItemErrors {
        let mut errors = ItemErrors::new();

        match item.storage_id {
            None => errors.add(STORAGE_ATTRIBUTE, BLANK),
            Some(id) if !self.storages.contains(&id) => errors.add(STORAGE_ATTRIBUTE, DOES_NOT_EXIST),
            Some(_) => {}
        }
        if item.origin.id.trim().is_empty() {
            errors.add(ORIGIN_ID_ATTRIBUTE, BLANK);
        }
        if item.origin.name.trim().is_empty() {
            errors.add(ORIGIN_NAME_ATTRIBUTE, BLANK);
        }

        errors
    }
}

impl std::fmt::Debug for FileLinkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLinkService")
            .field("storages", &self.storages.len())
            .finish()
    }
}

#[async_trait]
impl ItemCreator for FileLinkService {
    async fn create(&self, item: ContextualizedItem) -> Result<ItemOutcome, InfrastructureError> {
        let errors = self.validate(&item);
        let storage_id = match item.storage_id {
            Some(storage_id) if errors.is_empty() => storage_id,
            _ => return Ok(ItemOutcome::Rejected(errors)),
        };

        let now = Utc::now();
        let link = FileLink {
            file_link_id: new_entity_id(),
            storage_id,
            origin: item.origin,
            creator: item.creator,
            container: item.container,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(link.clone()).await?;
        Ok(ItemOutcome::Created(link))
    }
}
