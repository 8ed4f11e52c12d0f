//! Set-reconciliation of a party collection.
//!
//! The review form always sends the complete collection as it is currently
//! displayed. Planning compares it against the stored ids and yields the
//! inserts, updates and deletes that make the stored collection equal to
//! the incoming one.

use std::collections::HashSet;

use kyc_review_api::PartyInput;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("{0} does not belong to this KYC record")]
    ForeignId(Uuid),
    #[error("{0} appears more than once in the collection")]
    DuplicateId(Uuid),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePlan<I> {
    /// Rows without id; they get generated ids on insert
    pub inserts: Vec<I>,
    /// Rows whose id already belongs to the KYC record
    pub updates: Vec<(Uuid, I)>,
    /// Stored ids missing from the incoming collection
    pub deletes: Vec<Uuid>,
}

impl<I> ReconcilePlan<I> {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation<I> {
    /// The incoming collection held only placeholder rows; leave storage as is.
    Skip,
    Apply(ReconcilePlan<I>),
}

/// Plans the reconciliation of `incoming` against `existing_ids`.
///
/// Placeholder rows (blank name) are discarded. A non-empty collection made
/// only of placeholders yields [`Reconciliation::Skip`]; an empty collection
/// deletes everything.
pub fn plan_reconciliation<I: PartyInput>(
    existing_ids: &[Uuid],
    incoming: Vec<I>,
) -> Result<Reconciliation<I>, ReconcileError> {
    if !incoming.is_empty() && incoming.iter().all(PartyInput::is_placeholder) {
        return Ok(Reconciliation::Skip);
    }

    let existing: HashSet<Uuid> = existing_ids.iter().copied().collect();
    let mut kept = HashSet::new();
    let mut inserts = Vec::new();
    let mut updates = Vec::new();

    for item in incoming.into_iter().filter(|item| !item.is_placeholder()) {
        match item.id() {
            None => inserts.push(item),
            Some(id) => {
                if !existing.contains(&id) {
                    return Err(ReconcileError::ForeignId(id));
                }
                if !kept.insert(id) {
                    return Err(ReconcileError::DuplicateId(id));
                }
                updates.push((id, item));
            }
        }
    }

    let deletes = existing_ids.iter().copied().filter(|id| !kept.contains(id)).collect();

    Ok(Reconciliation::Apply(ReconcilePlan {
        inserts,
        updates,
        deletes,
    }))
}
