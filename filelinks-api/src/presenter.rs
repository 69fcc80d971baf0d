//! Batch result presentation
//!
//! Turns an [`AggregateOutcome`] into exactly one response: the collection of
//! created file links, or a single error built from the earliest rejected
//! item. Later rejections are never reported.

use filelinks_core::{AggregateOutcome, ContainerRef, FirstFailure};
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::paths;
use crate::types::FileLinkCollectionResponse;

/// Message used when one item violated more than one constraint.
pub const MULTIPLE_ERRORS_MESSAGE: &str = "Multiple field constraints have been violated.";

/// Render a batch outcome for the batch posted to `container`.
pub fn present(outcome: &AggregateOutcome, container: &ContainerRef) -> ApiResult<FileLinkCollectionResponse> {
    match outcome.first_failure() {
        None => Ok(present_success(outcome, container)),
        Some(failure) => Err(present_failure(failure)),
    }
}

/// Created file links in submission order with a link to the container's
/// file link collection.
pub fn present_success(
    outcome: &AggregateOutcome,
    container: &ContainerRef,
) -> FileLinkCollectionResponse {
    FileLinkCollectionResponse::new(outcome.created(), paths::container_file_links(container))
}

/// Error for the earliest rejected item.
pub fn present_failure(failure: FirstFailure<'_>) -> ApiError {
    let message = match (failure.errors.len(), failure.errors.first()) {
        (1, Some(only)) => only.full_message(),
        _ => MULTIPLE_ERRORS_MESSAGE.to_string(),
    };

    ApiError::validation_failed(message).with_details(json!({
        "index": failure.index,
        "errors": failure.errors,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::Utc;
    use filelinks_core::{new_entity_id, ActorId, FileLink, ItemErrors, ItemOutcome, OriginData};

    fn created(origin_id: &str, container: ContainerRef) -> ItemOutcome {
        let now = Utc::now();
        ItemOutcome::Created(FileLink {
            file_link_id: new_entity_id(),
            storage_id: new_entity_id(),
            origin: OriginData {
                id: origin_id.to_string(),
                name: format!("{}.txt", origin_id),
                ..OriginData::default()
            },
            creator: ActorId::new("alice"),
            container,
            created_at: now,
            updated_at: now,
        })
    }

    #[test]
    fn test_success_lists_created_in_order() -> ApiResult<()> {
        let container = ContainerRef::work_package(new_entity_id());
        let outcome = AggregateOutcome::fold(vec![
            created("b", container),
            created("a", container),
            created("c", container),
        ]);

        let view = present(&outcome, &container)?;

        let ids: Vec<&str> = view.elements().iter().map(|e| e.origin_data.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(view.count, 3);
        assert_eq!(
            view.links.get("self").map(|l| l.href.clone()),
            Some(format!("/api/v3/work_packages/{}/file_links", container.id))
        );
        Ok(())
    }

    #[test]
    fn test_failure_reports_first_rejection_only() {
        let container = ContainerRef::work_package(new_entity_id());
        let outcome = AggregateOutcome::fold(vec![
            created("a", container),
            ItemOutcome::Rejected(ItemErrors::single("originData/name", "can't be blank.")),
            ItemOutcome::Rejected(ItemErrors::single("storage", "does not exist.")),
        ]);

        let err = present(&outcome, &container).expect_err("batch should fail");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "originData/name can't be blank.");
        let details = err.details.expect("details expected");
        assert_eq!(details["index"], 1);
        assert_eq!(details["errors"].as_array().map(Vec::len), Some(1));
        assert!(!details.to_string().contains("does not exist"));
    }

    #[test]
    fn test_failure_with_several_violations() {
        let mut errors = ItemErrors::new();
        errors.add("originData/id", "can't be blank.");
        errors.add("originData/name", "can't be blank.");

        let err = present_failure(FirstFailure {
            index: 0,
            errors: &errors,
        });

        assert_eq!(err.message, MULTIPLE_ERRORS_MESSAGE);
        let details = err.details.expect("details expected");
        assert_eq!(details["errors"][1]["attribute"], "originData/name");
    }
}
