//! Service Layer
//!
//! Business rules for creating file links, kept out of the route handlers.

mod file_link_service;

pub use file_link_service::*;
