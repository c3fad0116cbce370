// SQLite EntryRepository Implementation

use crate::error::map_sqlx_error;
use crate::queries;
use crate::SqliteEntryTransaction;
use async_trait::async_trait;
use sqlx::SqlitePool;
use waitline_core::domain::{EntryId, QueueEntry};
use waitline_core::error::Result;
use waitline_core::port::{EntryRepository, EntryRepositoryTransaction, TransactionalEntryRepository};

#[derive(Clone)]
pub struct SqliteEntryRepository {
    pool: SqlitePool,
}

impl SqliteEntryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryRepository for SqliteEntryRepository {
    async fn find_by_id(&self, id: EntryId) -> Result<Option<QueueEntry>> {
        queries::find_by_id(&self.pool, id).await
    }

    async fn find_active(&self) -> Result<Vec<QueueEntry>> {
        queries::find_active(&self.pool).await
    }
}

#[async_trait]
impl TransactionalEntryRepository for SqliteEntryRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn EntryRepositoryTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteEntryTransaction::new(tx)))
    }
}
