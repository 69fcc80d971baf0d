//! FILELINKS Test Utilities
//!
//! Shared test infrastructure for the FILELINKS workspace:
//! - Proptest generators for raw batch elements and creator scripts
//! - A scripted mock item creator that records every invocation
//! - Fixtures for request contexts and batch bodies
//! - Assertions for aggregate outcomes

// Re-export core types for convenience
pub use filelinks_core::{
    new_entity_id, ActorId, AggregateOutcome, ContainerRef, ContextualizedItem, EntityId,
    FileLink, FileLinksError, FileLinksResult, InfrastructureError, ItemCreator, ItemErrors,
    ItemOutcome, OriginData, ParseError, RequestContext, Timestamp,
};

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, PoisonError};

// ============================================================================
// MOCK ITEM CREATOR
// ============================================================================

/// What the mock creator does for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    /// Persist nothing, return a fresh `FileLink` built from the item.
    Create,
    /// Reject the item with these errors.
    Reject(ItemErrors),
    /// Fail as if the store went away.
    Fail(InfrastructureError),
}

impl Scripted {
    /// Rejection with a single attribute error.
    pub fn reject(attribute: &str, message: &str) -> Self {
        Scripted::Reject(ItemErrors::single(attribute, message))
    }

    pub fn store_down() -> Self {
        Scripted::Fail(InfrastructureError::StoreUnavailable {
            reason: "mock store offline".to_string(),
        })
    }
}

/// Item creator that follows a per-call script and records what it received.
///
/// Calls past the end of the script are created.
#[derive(Debug, Default)]
pub struct MockItemCreator {
    script: Vec<Scripted>,
    calls: Mutex<Vec<ContextualizedItem>>,
}

impl MockItemCreator {
    /// Creator that accepts every item.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(script: Vec<Scripted>) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Items received so far, in call order.
    pub fn calls(&self) -> Vec<ContextualizedItem> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl ItemCreator for MockItemCreator {
    async fn create(&self, item: ContextualizedItem) -> Result<ItemOutcome, InfrastructureError> {
        let index = {
            let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
            calls.push(item.clone());
            calls.len() - 1
        };

        match self.script.get(index).cloned().unwrap_or(Scripted::Create) {
            Scripted::Create => Ok(ItemOutcome::Created(fixtures::file_link_from(item))),
            Scripted::Reject(errors) => Ok(ItemOutcome::Rejected(errors)),
            Scripted::Fail(error) => Err(error),
        }
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for batch elements, contexts and outcomes.

    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    /// Generate a random UUID.
    pub fn arb_uuid() -> impl Strategy<Value = EntityId> {
        any::<[u8; 16]>().prop_map(EntityId::from_bytes)
    }

    /// Non-blank origin id as a storage would assign it.
    pub fn arb_origin_id() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9]{1,12}"
    }

    /// Non-blank file name.
    pub fn arb_file_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,15}\\.(txt|png|pdf|md)"
    }

    pub fn arb_actor() -> impl Strategy<Value = ActorId> {
        "[a-z0-9_]{1,10}".prop_map(ActorId::new)
    }

    pub fn arb_container() -> impl Strategy<Value = ContainerRef> {
        arb_uuid().prop_map(ContainerRef::work_package)
    }

    pub fn arb_request_context() -> impl Strategy<Value = RequestContext> {
        (arb_actor(), arb_container()).prop_map(|(actor, container)| RequestContext::new(actor, container))
    }

    /// Well-formed element on `storage_id` without reserved links.
    pub fn arb_element(storage_id: EntityId) -> impl Strategy<Value = Value> {
        (arb_origin_id(), arb_file_name())
            .prop_map(move |(id, name)| fixtures::element(storage_id, &id, &name))
    }

    /// Well-formed element that also claims a creator and container of its own.
    pub fn arb_element_with_forged_context(storage_id: EntityId) -> impl Strategy<Value = Value> {
        (arb_element(storage_id), arb_actor(), arb_uuid()).prop_map(|(mut element, actor, wp)| {
            element["_links"]["creator"] = json!({ "href": format!("/api/v3/users/{}", actor) });
            element["_links"]["container"] =
                json!({ "href": format!("/api/v3/work_packages/{}", wp) });
            element
        })
    }

    /// Between `min` and `max` well-formed elements on `storage_id`.
    pub fn arb_elements(
        storage_id: EntityId,
        min: usize,
        max: usize,
    ) -> impl Strategy<Value = Vec<Value>> {
        prop::collection::vec(arb_element(storage_id), min..=max)
    }

    /// Script entry that never fails infrastructurally.
    pub fn arb_scripted() -> impl Strategy<Value = Scripted> {
        prop_oneof![
            3 => Just(Scripted::Create),
            1 => (arb_origin_id(), "[a-z ]{1,20}")
                .prop_map(|(attribute, message)| Scripted::reject(&attribute, &message)),
        ]
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built values for common scenarios.

    use super::*;
    use serde_json::{json, Value};

    /// Context of "alice" posting to a fresh work package.
    pub fn request_context() -> RequestContext {
        RequestContext::new(
            ActorId::new("alice"),
            ContainerRef::work_package(new_entity_id()),
        )
    }

    /// HAL element for one file on `storage_id`.
    pub fn element(storage_id: EntityId, origin_id: &str, name: &str) -> Value {
        json!({
            "originData": {
                "id": origin_id,
                "name": name,
                "mimeType": "text/plain",
                "size": 1024,
            },
            "_links": {
                "storage": { "href": format!("/api/v3/storages/{}", storage_id) }
            }
        })
    }

    /// Batch request body wrapping `elements`.
    pub fn batch_body(elements: Vec<Value>) -> Value {
        json!({ "_embedded": { "elements": elements } })
    }

    /// The `FileLink` a creator would return for `item`.
    pub fn file_link_from(item: ContextualizedItem) -> FileLink {
        let now = Utc::now();
        FileLink {
            file_link_id: new_entity_id(),
            storage_id: item.storage_id.unwrap_or_else(new_entity_id),
            origin: item.origin,
            creator: item.creator,
            container: item.container,
            created_at: now,
            updated_at: now,
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for aggregate batch outcomes.

    use super::*;

    /// Assert that the first rejected item sits at `index` with `errors`.
    #[track_caller]
    pub fn assert_first_failure(outcome: &AggregateOutcome, index: usize, errors: &ItemErrors) {
        match outcome.first_failure() {
            Some(failure) => {
                assert_eq!(failure.index, index, "Wrong first failing index");
                assert_eq!(failure.errors, errors, "Wrong first failure errors");
            }
            None => panic!("Expected a failure at index {}, got success", index),
        }
    }

    /// Assert that a pipeline result is a structural parse error.
    #[track_caller]
    pub fn assert_parse_error<T: std::fmt::Debug>(result: &FileLinksResult<T>) -> &ParseError {
        match result {
            Err(FileLinksError::Parse(e)) => e,
            other => panic!("Expected Parse error, got: {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(origin_id: &str) -> ContextualizedItem {
        ContextualizedItem {
            storage_id: Some(new_entity_id()),
            origin: OriginData {
                id: origin_id.to_string(),
                name: "a.txt".to_string(),
                ..OriginData::default()
            },
            creator: ActorId::new("alice"),
            container: ContainerRef::work_package(new_entity_id()),
        }
    }

    #[tokio::test]
    async fn test_mock_creator_follows_script() -> Result<(), InfrastructureError> {
        let creator = MockItemCreator::with_script(vec![
            Scripted::Create,
            Scripted::reject("originData/name", "can't be blank."),
            Scripted::store_down(),
        ]);

        assert!(creator.create(item("1")).await?.is_created());
        assert!(creator.create(item("2")).await?.errors().is_some());
        assert!(creator.create(item("3")).await.is_err());
        assert!(creator.create(item("4")).await?.is_created());

        let ids: Vec<String> = creator.calls().into_iter().map(|i| i.origin.id).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        Ok(())
    }

    #[test]
    fn test_element_fixture_shape() {
        let storage = new_entity_id();
        let element = fixtures::element(storage, "5503", "logo.png");
        assert_eq!(element["originData"]["id"], "5503");
        assert_eq!(
            element["_links"]["storage"]["href"],
            format!("/api/v3/storages/{}", storage)
        );
    }
}
