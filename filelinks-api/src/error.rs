//! API errors
//!
//! Every failure the HTTP surface reports is an [`ApiError`]: a stable
//! [`ErrorCode`], a human-readable message and optional JSON details,
//! rendered as a JSON body with the code's status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use filelinks_core::{FileLinksError, InfrastructureError, ParseError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

// ============================================================================
// ERROR CODE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // 401
    Unauthorized,
    InvalidToken,
    TokenExpired,

    // 400
    /// Body or path could not be read at all
    InvalidInput,
    MissingField,
    /// Field present with the wrong shape
    InvalidFormat,

    // 422
    /// An item of the batch was rejected
    ValidationFailed,

    // 404
    EntityNotFound,

    // 500
    InternalError,
}

impl ErrorCode {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized | ErrorCode::InvalidToken | ErrorCode::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            ErrorCode::InvalidInput | ErrorCode::MissingField | ErrorCode::InvalidFormat => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::EntityNotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR
// ============================================================================

/// The single error body of a failed request, however many batch items failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    /// Offending path, failing item index, field errors
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidToken, message)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired, "Authentication token has expired")
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
    }

    pub fn invalid_format(field: &str, expected: &str) -> Self {
        Self::new(
            ErrorCode::InvalidFormat,
            format!("Field '{}' has invalid format, expected {}", field, expected),
        )
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn entity_not_found(entity_type: &str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::EntityNotFound,
            format!("{} with id {} not found", entity_type, id),
        )
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::MissingCollection { path } => {
                ApiError::missing_field(&path).with_details(json!({ "path": path }))
            }
            ParseError::InvalidCollectionType {
                path,
                expected,
                actual,
            } => ApiError::invalid_format(&path, &expected).with_details(json!({
                "path": path,
                "expected": expected,
                "actual": actual,
            })),
            ParseError::Undecodable { index, reason } => {
                ApiError::invalid_input(format!("Element {} could not be read: {}", index, reason))
                    .with_details(json!({ "index": index }))
            }
        }
    }
}

/// Logged in full, answered generically.
impl From<InfrastructureError> for ApiError {
    fn from(err: InfrastructureError) -> Self {
        tracing::error!(error = %err, "Batch aborted by infrastructure failure");
        ApiError::internal_error("File link creation failed")
    }
}

impl From<FileLinksError> for ApiError {
    fn from(err: FileLinksError) -> Self {
        match err {
            FileLinksError::Parse(e) => e.into(),
            FileLinksError::Infrastructure(e) => e.into(),
        }
    }
}

/// Unparseable request body.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::debug!(error = %err, "Request body is not JSON");
        ApiError::invalid_input(format!("Invalid JSON: {}", err))
    }
}

/// Malformed id in the request path.
impl From<uuid::Error> for ApiError {
    fn from(err: uuid::Error) -> Self {
        ApiError::invalid_format("id", &format!("a UUID ({})", err))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::MissingField.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidFormat.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::ValidationFailed.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ErrorCode::EntityNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_collection_maps_to_missing_field() {
        let err: ApiError = ParseError::MissingCollection {
            path: "_embedded/elements".to_string(),
        }
        .into();

        assert_eq!(err.code, ErrorCode::MissingField);
        assert!(err.message.contains("_embedded/elements"));
        assert_eq!(err.details, Some(json!({ "path": "_embedded/elements" })));
    }

    #[test]
    fn test_invalid_collection_type_maps_to_invalid_format() {
        let err: ApiError = ParseError::InvalidCollectionType {
            path: "_embedded/elements".to_string(),
            expected: "array".to_string(),
            actual: "object".to_string(),
        }
        .into();

        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert!(err.message.contains("expected array"));
    }

    #[test]
    fn test_infrastructure_error_hides_reason() {
        let err: ApiError = FileLinksError::Infrastructure(InfrastructureError::StoreUnavailable {
            reason: "db host 10.0.0.7 unreachable".to_string(),
        })
        .into();

        assert_eq!(err.code, ErrorCode::InternalError);
        assert!(!err.message.contains("10.0.0.7"));
    }

    #[test]
    fn test_malformed_uuid_maps_to_invalid_format() {
        let err = uuid::Uuid::parse_str("42").map_err(ApiError::from).err();
        assert_eq!(err.map(|e| e.code), Some(ErrorCode::InvalidFormat));
    }

    #[test]
    fn test_error_body_omits_empty_details() -> Result<(), serde_json::Error> {
        let err = ApiError::validation_failed("originData/name can't be blank.");
        let json = serde_json::to_value(&err)?;

        assert_eq!(json["code"], "VALIDATION_FAILED");
        assert!(json.get("details").is_none());
        assert_eq!(serde_json::from_value::<ApiError>(json)?, err);
        Ok(())
    }
}
