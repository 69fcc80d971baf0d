//! HAL Link Types
//!
//! Hypermedia links carried in the `_links` section of every resource.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A hypermedia link to a related resource or available action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Link {
    /// The URL for this link (absolute or relative path).
    pub href: String,

    /// HTTP method to use. Defaults to GET if not specified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Human-readable title for this link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    /// Create a GET link.
    pub fn get(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            method: None,
            title: None,
        }
    }
}

/// A collection of named links.
pub type Links = HashMap<String, Link>;

/// Builder for constructing link collections.
#[derive(Debug, Default)]
pub struct LinksBuilder {
    links: Links,
}

impl LinksBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a link with the given relation name.
    pub fn add(mut self, rel: impl Into<String>, link: Link) -> Self {
        self.links.insert(rel.into(), link);
        self
    }

    /// Add a "self" link.
    pub fn self_link(self, href: impl Into<String>) -> Self {
        self.add("self", Link::get(href))
    }

    pub fn build(self) -> Links {
        self.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_builder() {
        let links = LinksBuilder::new()
            .self_link("/api/v3/file_links/1")
            .add("storage", Link::get("/api/v3/storages/2"))
            .build();

        assert_eq!(links.len(), 2);
        assert_eq!(links.get("self").map(|l| l.href.as_str()), Some("/api/v3/file_links/1"));
        assert!(links.contains_key("storage"));
    }

    #[test]
    fn test_method_omitted_for_get() -> Result<(), serde_json::Error> {
        let json = serde_json::to_value(Link::get("/a"))?;
        assert_eq!(json, serde_json::json!({ "href": "/a" }));
        Ok(())
    }
}
