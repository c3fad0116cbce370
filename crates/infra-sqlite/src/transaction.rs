// SQLite Transaction Implementation

use crate::error::map_sqlx_error;
use crate::queries;
use async_trait::async_trait;
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use waitline_core::domain::{EntryId, PriorityClass, QueueEntry};
use waitline_core::error::Result;
use waitline_core::port::{EntryRepositoryTransaction, Transaction};

/// One store transaction; dropped without commit means rolled back
pub struct SqliteEntryTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteEntryTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteEntryTransaction<'_> {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)
    }
}

#[async_trait]
impl EntryRepositoryTransaction for SqliteEntryTransaction<'_> {
    async fn find_by_id(&mut self, id: EntryId) -> Result<Option<QueueEntry>> {
        queries::find_by_id(&mut *self.tx, id).await
    }

    async fn find_active(&mut self) -> Result<Vec<QueueEntry>> {
        queries::find_active(&mut *self.tx).await
    }

    async fn find_active_by_class(&mut self, class: PriorityClass) -> Result<Vec<QueueEntry>> {
        queries::find_active_by_class(&mut *self.tx, class).await
    }

    async fn count_all(&mut self) -> Result<i64> {
        queries::count_all(&mut *self.tx).await
    }

    async fn count_by_class(&mut self, class: PriorityClass) -> Result<i64> {
        queries::count_by_class(&mut *self.tx, class).await
    }

    async fn allocate_id(&mut self) -> Result<EntryId> {
        queries::allocate_id(&mut *self.tx).await
    }

    async fn insert(&mut self, entry: &QueueEntry) -> Result<()> {
        queries::insert(&mut *self.tx, entry).await
    }

    async fn update_position(&mut self, entry: &QueueEntry) -> Result<()> {
        queries::update_position(&mut *self.tx, entry).await
    }

    async fn delete(&mut self, id: EntryId) -> Result<bool> {
        queries::delete(&mut *self.tx, id).await
    }
}
