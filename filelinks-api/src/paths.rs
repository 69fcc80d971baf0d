//! API v3 resource paths

use filelinks_core::{
    ActorId, ContainerKind, ContainerRef, EntityId, STORAGES_PATH, USERS_PATH, WORK_PACKAGES_PATH,
};

pub fn file_link(file_link_id: EntityId) -> String {
    format!("/api/v3/file_links/{}", file_link_id)
}

pub fn storage(storage_id: EntityId) -> String {
    format!("{}{}", STORAGES_PATH, storage_id)
}

pub fn user(actor: &ActorId) -> String {
    format!("{}{}", USERS_PATH, actor)
}

pub fn work_package(work_package_id: EntityId) -> String {
    format!("{}{}", WORK_PACKAGES_PATH, work_package_id)
}

pub fn work_package_file_links(work_package_id: EntityId) -> String {
    format!("{}/file_links", work_package(work_package_id))
}

pub fn container(container: &ContainerRef) -> String {
    match container.kind {
        ContainerKind::WorkPackage => work_package(container.id),
    }
}

/// Collection of file links attached to `container`.
pub fn container_file_links(container: &ContainerRef) -> String {
    match container.kind {
        ContainerKind::WorkPackage => work_package_file_links(container.id),
    }
}
