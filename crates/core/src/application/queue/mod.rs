// Queue Service - Position engine use cases behind a queue-wide lock

pub mod advance;
pub mod join;
pub mod remove;

pub use join::JoinRequest;
pub use remove::RemoveOutcome;

use crate::domain::{DomainError, EntryId, PriorityClass, QueueEntry};
use crate::error::Result;
use crate::port::{EntryRepository, TimeProvider, TransactionalEntryRepository};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Result of shifting one class forward
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftSummary {
    pub class: PriorityClass,
    /// Number of entries whose position changed
    pub shifted: usize,
    /// Entries that reached position 0 during this shift
    pub served: Vec<EntryId>,
}

impl ShiftSummary {
    fn new(class: PriorityClass, moved: &[QueueEntry]) -> Self {
        Self {
            class,
            shifted: moved.len(),
            served: moved.iter().filter(|e| e.served).map(|e| e.id).collect(),
        }
    }
}

/// Queue Service
///
/// Join, advance and remove run their read-modify-write sequence under one
/// mutex, each inside a single store transaction. Reads see the last
/// committed state and do not take the lock.
pub struct QueueService {
    entry_repo: Arc<dyn EntryRepository>,
    tx_repo: Arc<dyn TransactionalEntryRepository>,
    time_provider: Arc<dyn TimeProvider>,
    lock: Mutex<()>,
}

impl QueueService {
    pub fn new(
        entry_repo: Arc<dyn EntryRepository>,
        tx_repo: Arc<dyn TransactionalEntryRepository>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            entry_repo,
            tx_repo,
            time_provider,
            lock: Mutex::new(()),
        }
    }

    /// Add a person to the end of their class
    pub async fn join(&self, req: JoinRequest) -> Result<QueueEntry> {
        let _guard = self.lock.lock().await;

        let entry = join::execute(self.tx_repo.as_ref(), self.time_provider.as_ref(), req).await?;

        info!(
            entry_id = entry.id,
            class = %entry.class,
            position = entry.position,
            "Entry joined"
        );
        Ok(entry)
    }

    /// Advance one class by a single step
    pub async fn advance(&self, class_code: &str) -> Result<ShiftSummary> {
        let _guard = self.lock.lock().await;

        let summary = advance::execute(self.tx_repo.as_ref(), class_code).await?;

        info!(
            class = %summary.class,
            shifted = summary.shifted,
            served = ?summary.served,
            "Class advanced"
        );
        Ok(summary)
    }

    /// Remove an active entry
    pub async fn remove(&self, id: EntryId) -> Result<RemoveOutcome> {
        let _guard = self.lock.lock().await;

        let outcome = remove::execute(self.tx_repo.as_ref(), id).await?;

        info!(
            entry_id = id,
            class = %outcome.shift.class,
            shifted = outcome.shift.shifted,
            served = ?outcome.shift.served,
            "Entry removed"
        );
        Ok(outcome)
    }

    /// Active entries of both classes.
    ///
    /// Fails with `QueueEmpty` only when nothing was ever stored (or everything
    /// was removed); a queue whose entries are all served yields an empty list.
    /// Both reads share one transaction so they see the same committed state.
    pub async fn list_active(&self) -> Result<Vec<QueueEntry>> {
        let mut tx = self.tx_repo.begin_transaction().await?;

        if tx.count_all().await? == 0 {
            tx.rollback().await?;
            return Err(DomainError::QueueEmpty.into());
        }

        let entries = tx.find_active().await?;
        tx.rollback().await?;

        debug!(active = entries.len(), "Listed active entries");
        Ok(entries)
    }

    /// Look up an entry, served ones included
    pub async fn get(&self, id: EntryId) -> Result<QueueEntry> {
        self.entry_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::EntryNotFound(id).into())
    }
}
