//! FILELINKS Core - Batch File Link Creation
//!
//! Types and the batch pipeline for attaching files on external storages to
//! work packages. One request carries many file links; each is decoded,
//! stamped with server-side context and created independently, and the
//! per-item outcomes fold into a single aggregate verdict.
//!
//! Persistence and the single-item validation contract sit behind the
//! [`ItemCreator`] trait; this crate never touches storage directly.

pub mod decode;
pub mod entities;
pub mod error;
pub mod identity;
pub mod inject;
pub mod orchestrator;
pub mod outcome;
pub mod parser;

pub use decode::{
    json_kind, parse_resource_href, ElementDecoder, HalElementDecoder, STORAGES_PATH,
    USERS_PATH, WORK_PACKAGES_PATH,
};
pub use entities::{ContextualizedItem, FileLink, FileLinkParams, OriginData, RequestContext};
pub use error::{
    DecodeError, FieldError, FileLinksError, FileLinksResult, InfrastructureError, ItemErrors,
    ParseError,
};
pub use identity::{new_entity_id, ActorId, ContainerKind, ContainerRef, EntityId, Timestamp};
pub use inject::inject_context;
pub use orchestrator::{BatchOrchestrator, ItemCreator};
pub use outcome::{AggregateOutcome, FirstFailure, ItemOutcome};
pub use parser::{parse_elements, ParsedElement, ELEMENTS_PATH};
