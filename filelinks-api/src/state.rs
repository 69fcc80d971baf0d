//! Shared application state for Axum routers.

use std::sync::Arc;

use filelinks_core::{BatchOrchestrator, HalElementDecoder};

use crate::config::ApiConfig;
use crate::services::FileLinkService;
use crate::store::FileLinkStore;

/// Batch pipeline wired to the HAL decoder and the file link service.
pub type FileLinkOrchestrator = BatchOrchestrator<HalElementDecoder, FileLinkService>;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<FileLinkOrchestrator>,
    pub store: Arc<dyn FileLinkStore>,
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Build the state around `store`, accepting links to the storages
    /// registered in `config`.
    pub fn new(store: Arc<dyn FileLinkStore>, config: &ApiConfig) -> Self {
        let service = FileLinkService::new(store.clone(), config.storage_ids.iter().copied());
        Self {
            orchestrator: Arc::new(BatchOrchestrator::new(HalElementDecoder::new(), service)),
            store,
            start_time: std::time::Instant::now(),
        }
    }
}

crate::impl_from_ref!(Arc<FileLinkOrchestrator>, orchestrator);
crate::impl_from_ref!(Arc<dyn FileLinkStore>, store);
crate::impl_from_ref!(std::time::Instant, start_time);
