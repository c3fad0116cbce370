// Advance Use Case

use super::ShiftSummary;
use crate::domain::line;
use crate::domain::{DomainError, PriorityClass};
use crate::error::Result;
use crate::port::TransactionalEntryRepository;

/// Move every active entry of a class one step closer to the front.
///
/// Fails with `EmptyClass` only when the class has never had an entry; a
/// class whose entries are all served advances as a no-op.
pub async fn execute(
    repo: &dyn TransactionalEntryRepository,
    class_code: &str,
) -> Result<ShiftSummary> {
    let class = PriorityClass::from_code(class_code)?;

    let mut tx = repo.begin_transaction().await?;

    if tx.count_by_class(class).await? == 0 {
        return Err(DomainError::EmptyClass(class.to_string()).into());
    }

    let active = tx.find_active_by_class(class).await?;
    let moved = line::shift_class(active, class)?;

    for entry in &moved {
        tx.update_position(entry).await?;
    }

    tx.commit().await?;

    Ok(ShiftSummary::new(class, &moved))
}
