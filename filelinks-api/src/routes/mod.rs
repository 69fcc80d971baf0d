//! REST API Routes Module
//!
//! Includes:
//! - File link batch creation and lookup under /api/v3 (authenticated)
//! - Health check endpoints (Kubernetes-compatible)
//! - Prometheus metrics and the OpenAPI document
//! - CORS support for browser-based clients

pub mod file_links;
pub mod health;

use std::time::Duration;

use axum::{
    http::{header, header::HeaderName, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;

use crate::auth::AuthConfig;
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{auth_middleware, AuthMiddlewareState};
use crate::openapi::ApiDoc;
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

pub use file_links::create_router as file_links_router;
pub use health::create_router as health_router;

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// ============================================================================
// PRODUCTION VALIDATION
// ============================================================================

/// Check if running in a production environment.
fn is_production_environment() -> bool {
    std::env::var("FILELINKS_ENVIRONMENT")
        .map(|e| matches!(e.to_lowercase().as_str(), "production" | "prod"))
        .unwrap_or(false)
}

/// Validate API configuration for production use.
fn validate_api_config_for_production(config: &ApiConfig) -> ApiResult<()> {
    if config.cors_origins.is_empty() {
        return Err(ApiError::invalid_input(
            "CORS origins not configured for production. Set FILELINKS_CORS_ORIGINS.",
        ));
    }
    if config.storage_ids.is_empty() {
        tracing::warn!(
            "No storages registered; every file link will be rejected. \
             Set FILELINKS_STORAGE_IDS."
        );
    }
    Ok(())
}

// ============================================================================
// SECURE ROUTER BUILDER
// ============================================================================

/// Builder for the API router with authentication on every /api/v3 route.
///
/// Public routes (health, metrics, OpenAPI) are exempt from authentication.
pub struct SecureRouterBuilder {
    state: AppState,
    api_config: ApiConfig,
    auth_state: AuthMiddlewareState,
}

impl SecureRouterBuilder {
    /// In production environments, this validates that security configurations
    /// are properly set up and returns an error if critical settings are missing.
    pub fn new(state: AppState, api_config: ApiConfig, auth_config: AuthConfig) -> ApiResult<Self> {
        if is_production_environment() {
            auth_config.validate_for_production()?;
            validate_api_config_for_production(&api_config)?;
        } else if auth_config.jwt_secret.is_insecure_default() {
            tracing::warn!("Using the default JWT secret; set FILELINKS_JWT_SECRET before deploying");
        }

        Ok(Self {
            state,
            api_config,
            auth_state: AuthMiddlewareState::new(auth_config),
        })
    }

    /// Build the router.
    ///
    /// Middleware execution order:
    /// 1. CORS (outermost) - handles preflight requests
    /// 2. Observability - tracing and metrics
    /// 3. Auth (innermost, only on /api/v3/*) - validates credentials
    pub fn build(self) -> Router {
        let api_routes = file_links::create_router(self.state.clone())
            .layer(from_fn_with_state(self.auth_state.clone(), auth_middleware));

        let mut router = Router::new()
            .nest("/api/v3", api_routes)
            .nest("/health", health::create_router(&self.state))
            .route("/openapi.json", get(openapi_json));

        if self.api_config.metrics_enabled {
            router = router.route("/metrics", get(metrics_handler));
        }

        let cors = build_cors_layer(&self.api_config);

        router
            .layer(from_fn(observability_middleware))
            .layer(cors)
    }
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-api-key"),
        ])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        // Entries may be exact origins or "*.domain" wildcards.
        let matcher = config.clone();
        let origins = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|o| matcher.is_origin_allowed(o))
                .unwrap_or(false)
        });

        if config.cors_allow_credentials {
            cors.allow_origin(origins).allow_credentials(true)
        } else {
            cors.allow_origin(origins)
        }
    }
}

/// Create the complete API router.
///
/// - File link routes under /api/v3/* (API key or JWT required)
/// - Health checks at /health/* (public)
/// - Metrics at /metrics (public, unless disabled)
/// - OpenAPI spec at /openapi.json
pub fn create_api_router(
    state: AppState,
    api_config: &ApiConfig,
    auth_config: AuthConfig,
) -> ApiResult<Router> {
    SecureRouterBuilder::new(state, api_config.clone(), auth_config).map(SecureRouterBuilder::build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryFileLinkStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router() -> ApiResult<Router> {
        let api_config = ApiConfig::default();
        let state = AppState::new(Arc::new(InMemoryFileLinkStore::new()), &api_config);
        let mut auth_config = AuthConfig::default();
        auth_config.add_api_key("test-key".to_string());
        create_api_router(state, &api_config, auth_config)
    }

    #[tokio::test]
    async fn test_health_is_public() -> Result<(), Box<dyn std::error::Error>> {
        let response = router()?
            .oneshot(Request::builder().uri("/health/live").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn test_api_requires_auth() -> Result<(), Box<dyn std::error::Error>> {
        let uri = format!("/api/v3/file_links/{}", uuid::Uuid::nil());
        let response = router()?
            .oneshot(Request::builder().uri(uri).body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn test_openapi_is_served() -> Result<(), Box<dyn std::error::Error>> {
        let response = router()?
            .oneshot(Request::builder().uri("/openapi.json").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn test_metrics_route_can_be_disabled() -> Result<(), Box<dyn std::error::Error>> {
        let api_config = ApiConfig {
            metrics_enabled: false,
            ..ApiConfig::default()
        };
        let state = AppState::new(Arc::new(InMemoryFileLinkStore::new()), &api_config);
        let router = create_api_router(state, &api_config, AuthConfig::default())?;

        let response = router
            .oneshot(Request::builder().uri("/metrics").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[test]
    fn test_production_requires_cors_origins() {
        let config = ApiConfig::default();
        assert!(validate_api_config_for_production(&config).is_err());

        let config = ApiConfig {
            cors_origins: vec!["https://pm.example.org".to_string()],
            ..ApiConfig::default()
        };
        assert!(validate_api_config_for_production(&config).is_ok());
    }
}
