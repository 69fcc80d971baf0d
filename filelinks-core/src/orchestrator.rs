//! Batch orchestration
//!
//! Drives parsing, context injection and per-item creation for one batch
//! request, then folds the item outcomes into an [`AggregateOutcome`].
//!
//! Items are created strictly one after another in input order, and every
//! item is attempted even after earlier rejections. The batch is not
//! transactional: created items stay created when later ones fail.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::decode::ElementDecoder;
use crate::entities::{ContextualizedItem, RequestContext};
use crate::error::{FileLinksResult, InfrastructureError};
use crate::inject::inject_context;
use crate::outcome::{AggregateOutcome, ItemOutcome};
use crate::parser::{parse_elements, ParsedElement};

/// Single-item creation operation orchestrated across a batch.
///
/// Validation failures must be returned as [`ItemOutcome::Rejected`]. An `Err`
/// signals an infrastructural failure and aborts the rest of the batch.
#[async_trait]
pub trait ItemCreator: Send + Sync {
    async fn create(&self, item: ContextualizedItem) -> Result<ItemOutcome, InfrastructureError>;
}

#[async_trait]
impl<T> ItemCreator for Arc<T>
where
    T: ItemCreator + ?Sized,
{
    async fn create(&self, item: ContextualizedItem) -> Result<ItemOutcome, InfrastructureError> {
        (**self).create(item).await
    }
}

/// Runs the batch pipeline with a bound decoder and item creator.
#[derive(Debug, Clone)]
pub struct BatchOrchestrator<D, C> {
    decoder: D,
    creator: C,
}

impl<D, C> BatchOrchestrator<D, C>
where
    D: ElementDecoder,
    C: ItemCreator,
{
    pub fn new(decoder: D, creator: C) -> Self {
        Self { decoder, creator }
    }

    pub fn creator(&self) -> &C {
        &self.creator
    }

    /// Parse `body` and create every element in it.
    ///
    /// Structural errors in the body abort before any item is attempted.
    pub async fn process(
        &self,
        body: &Value,
        context: &RequestContext,
    ) -> FileLinksResult<AggregateOutcome> {
        let elements = parse_elements(body, &self.decoder)?;
        Ok(self.create_all(elements, context).await?)
    }

    /// Create each parsed element in input order and fold the outcomes.
    ///
    /// Elements that failed decoding are recorded as rejected without calling
    /// the creator.
    #[tracing::instrument(
        skip_all,
        fields(container = %context.container, items = elements.len())
    )]
    pub async fn create_all(
        &self,
        elements: Vec<ParsedElement>,
        context: &RequestContext,
    ) -> Result<AggregateOutcome, InfrastructureError> {
        let mut outcomes = Vec::with_capacity(elements.len());

        for (index, element) in elements.into_iter().enumerate() {
            let outcome = match element {
                Ok(params) => {
                    let item = inject_context(params, context);
                    self.creator.create(item).await.map_err(|e| {
                        tracing::error!(index, error = %e, "Aborting batch on infrastructure failure");
                        e
                    })?
                }
                Err(errors) => ItemOutcome::Rejected(errors),
            };

            match &outcome {
                ItemOutcome::Created(link) => {
                    tracing::debug!(index, file_link_id = %link.file_link_id, "File link created");
                }
                ItemOutcome::Rejected(errors) => {
                    tracing::debug!(index, errors = %errors, "File link rejected");
                }
            }
            outcomes.push(outcome);
        }

        let aggregate = AggregateOutcome::fold(outcomes);
        tracing::info!(
            success = aggregate.success(),
            created = aggregate.created_count(),
            rejected = aggregate.rejected_count(),
            "Batch processed"
        );
        Ok(aggregate)
    }
}
