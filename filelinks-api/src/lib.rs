//! FILELINKS API - REST Layer for Batch File Link Creation
//!
//! Exposes the batch pipeline from `filelinks-core` over HTTP: authenticated
//! Axum routes, the file link creation service and store, HAL response
//! types, and tracing/Prometheus telemetry.

#[macro_use]
pub mod macros;

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod paths;
pub mod presenter;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use auth::{
    api_key_principal, authenticate, authenticate_api_key, authenticate_jwt, validate_jwt_token,
    AuthConfig, AuthContext, AuthMethod, Claims, JwtSecret,
};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use extractors::PathId;
pub use middleware::{auth_middleware, AuthExtractor, AuthMiddlewareState};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use services::FileLinkService;
pub use state::{AppState, FileLinkOrchestrator};
pub use store::{FileLinkStore, InMemoryFileLinkStore};
pub use types::*;
