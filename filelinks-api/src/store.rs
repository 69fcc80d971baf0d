//! File link persistence
//!
//! [`FileLinkStore`] is the seam between the creation service and storage.
//! [`InMemoryFileLinkStore`] keeps everything in concurrent maps and is what
//! the server runs with.

use async_trait::async_trait;
use dashmap::DashMap;
use filelinks_core::{ContainerRef, EntityId, FileLink, InfrastructureError};

#[async_trait]
pub trait FileLinkStore: Send + Sync {
    async fn insert(&self, link: FileLink) -> Result<(), InfrastructureError>;

    async fn get(&self, file_link_id: EntityId) -> Result<Option<FileLink>, InfrastructureError>;

    /// Links of one container in creation order.
    async fn list_by_container(
        &self,
        container: ContainerRef,
    ) -> Result<Vec<FileLink>, InfrastructureError>;

    async fn health_check(&self) -> Result<(), InfrastructureError>;
}

/// Concurrent in-memory store backed by `dashmap`.
#[derive(Debug, Default)]
pub struct InMemoryFileLinkStore {
    links: DashMap<EntityId, FileLink>,
    by_container: DashMap<ContainerRef, Vec<EntityId>>,
}

impl InMemoryFileLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl FileLinkStore for InMemoryFileLinkStore {
    async fn insert(&self, link: FileLink) -> Result<(), InfrastructureError> {
        // Stored before indexed, so every listed id resolves.
        self.links.insert(link.file_link_id, link.clone());
        self.by_container
            .entry(link.container)
            .or_default()
            .push(link.file_link_id);
        Ok(())
    }

    async fn get(&self, file_link_id: EntityId) -> Result<Option<FileLink>, InfrastructureError> {
        Ok(self.links.get(&file_link_id).map(|entry| entry.value().clone()))
    }

    async fn list_by_container(
        &self,
        container: ContainerRef,
    ) -> Result<Vec<FileLink>, InfrastructureError> {
        let ids = self
            .by_container
            .get(&container)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        Ok(ids
            .iter()
            .filter_map(|id| self.links.get(id).map(|entry| entry.value().clone()))
            .collect())
    }

    async fn health_check(&self) -> Result<(), InfrastructureError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use filelinks_core::{new_entity_id, ActorId, OriginData};

    fn link(container: ContainerRef, storage_id: EntityId, origin_id: &str) -> FileLink {
        let now = Utc::now();
        FileLink {
            file_link_id: new_entity_id(),
            storage_id,
            origin: OriginData {
                id: origin_id.to_string(),
                name: format!("{}.txt", origin_id),
                ..OriginData::default()
            },
            creator: ActorId::new("alice"),
            container,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() -> Result<(), InfrastructureError> {
        let store = InMemoryFileLinkStore::new();
        let container = ContainerRef::work_package(new_entity_id());
        let created = link(container, new_entity_id(), "1");

        store.insert(created.clone()).await?;

        assert_eq!(store.get(created.file_link_id).await?, Some(created));
        assert_eq!(store.get(new_entity_id()).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_same_origin_stored_twice() -> Result<(), InfrastructureError> {
        let store = InMemoryFileLinkStore::new();
        let container = ContainerRef::work_package(new_entity_id());
        let storage = new_entity_id();

        store.insert(link(container, storage, "1")).await?;
        store.insert(link(container, storage, "1")).await?;

        assert_eq!(store.len(), 2);
        assert_eq!(store.list_by_container(container).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_by_container_keeps_creation_order() -> Result<(), InfrastructureError> {
        let store = InMemoryFileLinkStore::new();
        let container = ContainerRef::work_package(new_entity_id());
        let other = ContainerRef::work_package(new_entity_id());
        let storage = new_entity_id();

        for origin in ["c", "a", "b"] {
            store.insert(link(container, storage, origin)).await?;
        }
        store.insert(link(other, storage, "z")).await?;

        let listed: Vec<String> = store
            .list_by_container(container)
            .await?
            .into_iter()
            .map(|l| l.origin.id)
            .collect();
        assert_eq!(listed, vec!["c", "a", "b"]);
        assert!(store
            .list_by_container(ContainerRef::work_package(new_entity_id()))
            .await?
            .is_empty());
        Ok(())
    }
}
