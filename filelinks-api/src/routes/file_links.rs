//! File Link REST API Routes
//!
//! Batch creation of file links on a work package, plus the read endpoints the
//! created representations link to.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use filelinks_core::{
    ActorId, AggregateOutcome, ContainerRef, FileLinksError, FileLinksResult, RequestContext,
};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    extractors::PathId,
    middleware::AuthExtractor,
    paths, presenter,
    state::{AppState, FileLinkOrchestrator},
    store::FileLinkStore,
    telemetry::{metrics::with_metrics, BatchResult},
    types::{CreateFileLinksRequest, FileLinkCollectionResponse, FileLinkResponse},
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/v3/work_packages/:work_package_id/file_links - Create file links in batch
///
/// Every element is attempted. The response is either the full collection of
/// created links or the error of the first rejected element.
#[utoipa::path(
    post,
    path = "/api/v3/work_packages/{work_package_id}/file_links",
    tag = "File Links",
    params(
        ("work_package_id" = Uuid, Path, description = "Work package receiving the links"),
    ),
    request_body = CreateFileLinksRequest,
    responses(
        (status = 201, description = "All file links created", body = FileLinkCollectionResponse),
        (status = 400, description = "Malformed id or element collection", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 422, description = "An element was rejected", body = ApiError),
        (status = 500, description = "Creation aborted", body = ApiError),
    ),
    security(
        ("api_key" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn create_file_links(
    State(orchestrator): State<Arc<FileLinkOrchestrator>>,
    AuthExtractor(auth): AuthExtractor,
    PathId(work_package_id): PathId,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let body: Value = serde_json::from_slice(&body)?;

    let container = ContainerRef::work_package(work_package_id);
    let context = RequestContext::new(ActorId::new(auth.user_id), container);

    let outcome = record_batch(orchestrator.process(&body, &context).await)?;
    let view = presenter::present(&outcome, &container)?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v3/work_packages/:work_package_id/file_links - List file links
#[utoipa::path(
    get,
    path = "/api/v3/work_packages/{work_package_id}/file_links",
    tag = "File Links",
    params(
        ("work_package_id" = Uuid, Path, description = "Work package ID"),
    ),
    responses(
        (status = 200, description = "File links in creation order", body = FileLinkCollectionResponse),
        (status = 400, description = "Malformed work package id", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(
        ("api_key" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn list_file_links(
    State(store): State<Arc<dyn FileLinkStore>>,
    PathId(work_package_id): PathId,
) -> ApiResult<Json<FileLinkCollectionResponse>> {
    let container = ContainerRef::work_package(work_package_id);
    let links = store.list_by_container(container).await?;

    Ok(Json(FileLinkCollectionResponse::new(
        &links,
        paths::container_file_links(&container),
    )))
}

/// GET /api/v3/file_links/:file_link_id - Get a file link
#[utoipa::path(
    get,
    path = "/api/v3/file_links/{file_link_id}",
    tag = "File Links",
    params(
        ("file_link_id" = Uuid, Path, description = "File link ID"),
    ),
    responses(
        (status = 200, description = "File link details", body = FileLinkResponse),
        (status = 400, description = "Malformed file link id", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "File link not found", body = ApiError),
    ),
    security(
        ("api_key" = []),
        ("bearer_auth" = [])
    )
)]
pub async fn get_file_link(
    State(store): State<Arc<dyn FileLinkStore>>,
    PathId(file_link_id): PathId,
) -> ApiResult<Json<FileLinkResponse>> {
    let link = store
        .get(file_link_id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("FileLink", file_link_id))?;

    Ok(Json(FileLinkResponse::from(&link)))
}

/// Count the batch in the metrics and pass the result through.
fn record_batch(result: FileLinksResult<AggregateOutcome>) -> FileLinksResult<AggregateOutcome> {
    match &result {
        Ok(outcome) => {
            let batch_result = if outcome.success() {
                BatchResult::Success
            } else {
                BatchResult::Rejected
            };
            with_metrics(|m| {
                m.observe_batch_size(outcome.len());
                m.record_batch(batch_result, outcome.created_count(), outcome.rejected_count());
            });
        }
        Err(FileLinksError::Parse(_)) => {
            with_metrics(|m| m.record_batch(BatchResult::StructuralError, 0, 0));
        }
        Err(FileLinksError::Infrastructure(_)) => {
            with_metrics(|m| m.record_batch(BatchResult::Aborted, 0, 0));
        }
    }
    result
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the file link routes. Paths are relative to `/api/v3`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/work_packages/:work_package_id/file_links",
            get(list_file_links).post(create_file_links),
        )
        .route("/file_links/:file_link_id", get(get_file_link))
        .with_state(state)
}
