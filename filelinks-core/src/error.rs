//! Error types for file link batch operations

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Attribute-level validation message reported for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Attribute path the message refers to (`base` for the item as a whole).
    pub attribute: String,
    pub message: String,
}

impl FieldError {
    pub fn new(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Human-readable `attribute message` form.
    pub fn full_message(&self) -> String {
        format!("{} {}", self.attribute, self.message)
    }
}

/// All violations reported for a single item, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemErrors(Vec<FieldError>);

impl ItemErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors consisting of exactly one violation.
    pub fn single(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(attribute, message)])
    }

    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(attribute, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.0.iter().map(FieldError::full_message).collect()
    }

    /// Ok when nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), ItemErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Vec<FieldError>> for ItemErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl fmt::Display for ItemErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_messages().join("; "))
    }
}

/// Structural errors in the batch body. These abort before any item is attempted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Required property missing: {path}")]
    MissingCollection { path: String },

    #[error("Invalid format for {path}: expected {expected}, got {actual}")]
    InvalidCollectionType {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Element {index} could not be decoded: {reason}")]
    Undecodable { index: usize, reason: String },
}

/// Decoder failures for one raw element.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The element was readable but its attributes are invalid. Rejects that item only.
    #[error("Element rejected: {0}")]
    Invalid(ItemErrors),

    /// The decoder could not interpret the element at all. Aborts the request.
    #[error("Element unreadable: {reason}")]
    Unreadable { reason: String },
}

/// Failures of a collaborator that are not validation outcomes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InfrastructureError {
    #[error("File link store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    #[error("{collaborator} failed: {reason}")]
    CollaboratorFailed { collaborator: String, reason: String },
}

/// Master error type for the batch pipeline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FileLinksError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Infrastructure error: {0}")]
    Infrastructure(#[from] InfrastructureError),
}

/// Result type alias for pipeline operations.
pub type FileLinksResult<T> = Result<T, FileLinksError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_errors_full_messages() {
        let mut errors = ItemErrors::single("storage", "does not exist");
        errors.add("originData/name", "can't be blank");

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.full_messages(),
            vec![
                "storage does not exist".to_string(),
                "originData/name can't be blank".to_string()
            ]
        );
        assert_eq!(
            errors.to_string(),
            "storage does not exist; originData/name can't be blank"
        );
    }

    #[test]
    fn test_item_errors_into_result() {
        assert!(ItemErrors::new().into_result().is_ok());
        assert!(ItemErrors::single("base", "broken").into_result().is_err());
    }

    #[test]
    fn test_parse_error_display_invalid_collection_type() {
        let err = ParseError::InvalidCollectionType {
            path: "_embedded/elements".to_string(),
            expected: "array".to_string(),
            actual: "object".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("_embedded/elements"));
        assert!(msg.contains("array"));
        assert!(msg.contains("object"));
    }

    #[test]
    fn test_item_errors_serialize_as_list() -> Result<(), serde_json::Error> {
        let errors = ItemErrors::single("storage", "does not exist");
        let json = serde_json::to_value(&errors)?;
        assert_eq!(
            json,
            serde_json::json!([{ "attribute": "storage", "message": "does not exist" }])
        );
        Ok(())
    }

    #[test]
    fn test_master_error_from_variants() {
        let parse = FileLinksError::from(ParseError::MissingCollection {
            path: "_embedded/elements".to_string(),
        });
        assert!(matches!(parse, FileLinksError::Parse(_)));

        let infra = FileLinksError::from(InfrastructureError::StoreUnavailable {
            reason: "closed".to_string(),
        });
        assert!(matches!(infra, FileLinksError::Infrastructure(_)));
    }
}
