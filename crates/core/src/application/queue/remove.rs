// Remove Use Case

use super::ShiftSummary;
use crate::domain::line;
use crate::domain::{DomainError, EntryId, QueueEntry};
use crate::error::Result;
use crate::port::TransactionalEntryRepository;

/// Outcome of a removal
#[derive(Debug, Clone)]
pub struct RemoveOutcome {
    pub removed: QueueEntry,
    pub shift: ShiftSummary,
}

/// Delete an active entry, then shift the rest of its class down by one.
///
/// The shift applies to every remaining active entry of the class, not only
/// to those behind the removed one. Removing a non-front entry therefore
/// serves whoever is at position 1.
pub async fn execute(
    repo: &dyn TransactionalEntryRepository,
    id: EntryId,
) -> Result<RemoveOutcome> {
    let mut tx = repo.begin_transaction().await?;

    let removed = tx
        .find_by_id(id)
        .await?
        .ok_or(DomainError::EntryNotFound(id))?;

    if removed.served {
        return Err(DomainError::AlreadyServed(id).into());
    }

    if !tx.delete(id).await? {
        return Err(DomainError::EntryNotFound(id).into());
    }

    let remaining = tx.find_active_by_class(removed.class).await?;
    let moved = line::shift_class(remaining, removed.class)?;

    for entry in &moved {
        tx.update_position(entry).await?;
    }

    tx.commit().await?;

    let shift = ShiftSummary::new(removed.class, &moved);
    Ok(RemoveOutcome { removed, shift })
}
