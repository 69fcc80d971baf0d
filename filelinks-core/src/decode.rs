//! Wire-format decoding of single batch elements
//!
//! Elements arrive as HAL+JSON maps. Attributes that are the wrong type are
//! reported per element so the rest of the batch still runs; an element that is
//! not a map at all cannot be interpreted and aborts the request.

use serde::Deserialize;
use serde_json::Value;

use crate::entities::{FileLinkParams, OriginData};
use crate::error::{DecodeError, ItemErrors};
use crate::identity::{ActorId, ContainerRef, EntityId, Timestamp};

/// Path prefix of storage resources.
pub const STORAGES_PATH: &str = "/api/v3/storages/";
/// Path prefix of user resources.
pub const USERS_PATH: &str = "/api/v3/users/";
/// Path prefix of work package resources.
pub const WORK_PACKAGES_PATH: &str = "/api/v3/work_packages/";

/// Decodes one raw element into typed file link parameters.
pub trait ElementDecoder: Send + Sync {
    fn decode(&self, element: &Value) -> Result<FileLinkParams, DecodeError>;
}

impl<F> ElementDecoder for F
where
    F: Fn(&Value) -> Result<FileLinkParams, DecodeError> + Send + Sync,
{
    fn decode(&self, element: &Value) -> Result<FileLinkParams, DecodeError> {
        self(element)
    }
}

/// Decoder for the HAL+JSON file link representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalElementDecoder;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOriginData {
    id: Option<RawOriginId>,
    name: Option<String>,
    mime_type: Option<String>,
    size: Option<u64>,
    created_at: Option<Timestamp>,
    last_modified_at: Option<Timestamp>,
    created_by_name: Option<String>,
    last_modified_by_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOriginId {
    Text(String),
    Number(u64),
}

#[derive(Debug, Default, Deserialize)]
struct RawLinks {
    storage: Option<RawLink>,
    creator: Option<RawLink>,
    container: Option<RawLink>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLink {
    href: Option<String>,
}

impl HalElementDecoder {
    pub fn new() -> Self {
        Self
    }

    fn decode_section<'a, T>(
        element: &'a serde_json::Map<String, Value>,
        key: &str,
        errors: &mut ItemErrors,
    ) -> T
    where
        T: Default + Deserialize<'a>,
    {
        match element.get(key) {
            None | Some(Value::Null) => T::default(),
            Some(value) => T::deserialize(value).unwrap_or_else(|e| {
                errors.add(key, format!("is invalid: {}", e));
                T::default()
            }),
        }
    }
}

impl ElementDecoder for HalElementDecoder {
    fn decode(&self, element: &Value) -> Result<FileLinkParams, DecodeError> {
        let Value::Object(map) = element else {
            return Err(DecodeError::Unreadable {
                reason: format!("expected an object, got {}", json_kind(element)),
            });
        };

        let mut errors = ItemErrors::new();
        let raw_origin: RawOriginData = Self::decode_section(map, "originData", &mut errors);
        let raw_links: RawLinks = Self::decode_section(map, "_links", &mut errors);

        let storage_id = match raw_links.storage.and_then(|link| link.href) {
            None => None,
            Some(href) => {
                let id = parse_resource_href(&href, STORAGES_PATH);
                if id.is_none() {
                    errors.add("storage", format!("'{}' is not a storage link", href));
                }
                id
            }
        };

        errors.into_result().map_err(DecodeError::Invalid)?;

        // Reserved attributes are decoded only when well-formed. The context
        // injector replaces them either way.
        let creator = raw_links
            .creator
            .and_then(|link| link.href)
            .and_then(|href| href.strip_prefix(USERS_PATH).map(str::to_string))
            .filter(|id| !id.is_empty())
            .map(ActorId::new);
        let container = raw_links
            .container
            .and_then(|link| link.href)
            .and_then(|href| parse_resource_href(&href, WORK_PACKAGES_PATH))
            .map(ContainerRef::work_package);

        Ok(FileLinkParams {
            storage_id,
            origin: OriginData {
                id: match raw_origin.id {
                    Some(RawOriginId::Text(id)) => id,
                    Some(RawOriginId::Number(id)) => id.to_string(),
                    None => String::new(),
                },
                name: raw_origin.name.unwrap_or_default(),
                mime_type: raw_origin.mime_type,
                size: raw_origin.size,
                created_at: raw_origin.created_at,
                last_modified_at: raw_origin.last_modified_at,
                created_by_name: raw_origin.created_by_name,
                last_modified_by_name: raw_origin.last_modified_by_name,
            },
            creator,
            container,
        })
    }
}

/// Extract the trailing UUID of a resource href under `prefix`.
pub fn parse_resource_href(href: &str, prefix: &str) -> Option<EntityId> {
    href.strip_prefix(prefix)
        .map(|rest| rest.trim_end_matches('/'))
        .and_then(|id| EntityId::parse_str(id).ok())
}

/// Shape name of a JSON value, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
