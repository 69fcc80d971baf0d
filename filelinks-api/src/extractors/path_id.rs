//! Path extractor for entity ids.
//!
//! `Path<EntityId>` rejects a malformed id with axum's plain-text body.
//! [`PathId`] rejects it with an [`ApiError`] like every other failure.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use filelinks_core::EntityId;
use serde_json::json;

use crate::error::ApiError;

/// A single UUID path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub EntityId);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_input(format!("Unreadable path parameter: {}", e)))?;

        EntityId::parse_str(&raw)
            .map(PathId)
            .map_err(|e| ApiError::from(e).with_details(json!({ "path_param": raw })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn echo(PathId(id): PathId) -> String {
        id.to_string()
    }

    fn app() -> Router {
        Router::new().route("/items/:id", get(echo))
    }

    #[tokio::test]
    async fn test_valid_uuid_is_extracted() -> Result<(), Box<dyn std::error::Error>> {
        let id = filelinks_core::new_entity_id();
        let response = app()
            .oneshot(Request::builder().uri(format!("/items/{}", id)).body(Body::empty())?)
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(body, id.to_string());
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_uuid_is_json_error() -> Result<(), Box<dyn std::error::Error>> {
        let response = app()
            .oneshot(Request::builder().uri("/items/42").body(Body::empty())?)
            .await?;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(json["code"], "INVALID_FORMAT");
        assert_eq!(json["details"]["path_param"], "42");
        Ok(())
    }
}
