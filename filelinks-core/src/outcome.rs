//! Per-item and whole-batch outcomes

use crate::entities::FileLink;
use crate::error::ItemErrors;

/// Result of attempting to create one file link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Created(FileLink),
    Rejected(ItemErrors),
}

impl ItemOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, ItemOutcome::Created(_))
    }

    pub fn created(&self) -> Option<&FileLink> {
        match self {
            ItemOutcome::Created(link) => Some(link),
            ItemOutcome::Rejected(_) => None,
        }
    }

    pub fn errors(&self) -> Option<&ItemErrors> {
        match self {
            ItemOutcome::Created(_) => None,
            ItemOutcome::Rejected(errors) => Some(errors),
        }
    }
}

/// The earliest rejected item of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstFailure<'a> {
    /// Zero-based position in the submitted collection.
    pub index: usize,
    pub errors: &'a ItemErrors,
}

/// Whole-batch outcome folded from the item outcomes in input order.
///
/// Fields are private so the invariants hold by construction: `success()` is
/// true iff every item was created, and `first_failure()` is the lowest-indexed
/// rejection whenever it is not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateOutcome {
    items: Vec<ItemOutcome>,
    first_failure: Option<usize>,
}

impl AggregateOutcome {
    /// Fold item outcomes, given in input order, into one aggregate.
    pub fn fold<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = ItemOutcome>,
    {
        outcomes.into_iter().fold(Self::default(), Self::push)
    }

    fn push(mut self, outcome: ItemOutcome) -> Self {
        if self.first_failure.is_none() && !outcome.is_created() {
            self.first_failure = Some(self.items.len());
        }
        self.items.push(outcome);
        self
    }

    pub fn success(&self) -> bool {
        self.first_failure.is_none()
    }

    pub fn items(&self) -> &[ItemOutcome] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first_failure(&self) -> Option<FirstFailure<'_>> {
        let index = self.first_failure?;
        self.items
            .get(index)?
            .errors()
            .map(|errors| FirstFailure { index, errors })
    }

    pub fn created_count(&self) -> usize {
        self.items.iter().filter(|o| o.is_created()).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.items.len() - self.created_count()
    }

    /// Created resources in input order.
    pub fn created(&self) -> impl Iterator<Item = &FileLink> {
        self.items.iter().filter_map(ItemOutcome::created)
    }
}

impl FromIterator<ItemOutcome> for AggregateOutcome {
    fn from_iter<I: IntoIterator<Item = ItemOutcome>>(iter: I) -> Self {
        Self::fold(iter)
    }
}
