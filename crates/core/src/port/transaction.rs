// Transaction port for atomic operations

use crate::domain::{EntryId, PriorityClass, QueueEntry};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional EntryRepository operations
#[async_trait]
pub trait TransactionalEntryRepository: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn EntryRepositoryTransaction>>;
}

/// EntryRepository operations within a transaction
///
/// Dropping a transaction without committing discards every change made
/// through it.
#[async_trait]
pub trait EntryRepositoryTransaction: Transaction {
    async fn find_by_id(&mut self, id: EntryId) -> Result<Option<QueueEntry>>;

    /// Active entries of both classes
    async fn find_active(&mut self) -> Result<Vec<QueueEntry>>;

    /// Active entries of one class
    async fn find_active_by_class(&mut self, class: PriorityClass) -> Result<Vec<QueueEntry>>;

    /// Count every stored entry, served ones included
    async fn count_all(&mut self) -> Result<i64>;

    /// Count entries of a class, served ones included
    async fn count_by_class(&mut self, class: PriorityClass) -> Result<i64>;

    /// Reserve the next identifier from the monotonic sequence
    async fn allocate_id(&mut self) -> Result<EntryId>;

    async fn insert(&mut self, entry: &QueueEntry) -> Result<()>;

    /// Persist `position` and `served` of an existing entry
    async fn update_position(&mut self, entry: &QueueEntry) -> Result<()>;

    /// Delete an entry; returns false if it did not exist
    async fn delete(&mut self, id: EntryId) -> Result<bool>;
}
