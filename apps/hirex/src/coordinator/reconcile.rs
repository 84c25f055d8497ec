//! Mutation policy of the collection coordinator, as a lookup table.
//!
//! | Trigger                                 | Reconciliation   |
//! |-----------------------------------------|------------------|
//! | upload, at least one file succeeded     | forced re-fetch  |
//! | upload, every file failed               | no-op            |
//! | delete one, unranked view               | optimistic apply |
//! | delete one, job-ranked view             | forced re-fetch  |
//! | delete all                              | optimistic apply |
//!
//! Declined confirmations and failed requests never reach the table: nothing
//! is issued or nothing changed, so the collection is left as it was.

/// A confirmed mutation whose backend request succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Upload { succeeded: usize },
    DeleteOne { ranked_view: bool },
    DeleteAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Patch the in-memory collection directly.
    OptimisticApply,
    /// Replace the collection with a fresh fetch of the current view.
    ForcedRefetch,
    NoOp,
}

pub fn reconcile(trigger: Trigger) -> Reconciliation {
    match trigger {
        // ids of extracted candidates are only known after the backend finishes
        Trigger::Upload { succeeded: 0 } => Reconciliation::NoOp,
        Trigger::Upload { .. } => Reconciliation::ForcedRefetch,
        // ranking order depends on the remaining set
        Trigger::DeleteOne { ranked_view: true } => Reconciliation::ForcedRefetch,
        Trigger::DeleteOne { ranked_view: false } => Reconciliation::OptimisticApply,
        Trigger::DeleteAll => Reconciliation::OptimisticApply,
    }
}
