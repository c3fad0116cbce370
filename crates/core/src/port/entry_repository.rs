// Entry Repository Port (Interface)

use crate::domain::{EntryId, QueueEntry};
use crate::error::Result;
use async_trait::async_trait;

/// Read-side access to queue entries outside of a transaction
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Find entry by ID (active or served)
    async fn find_by_id(&self, id: EntryId) -> Result<Option<QueueEntry>>;

    /// All active entries across both classes, ordered by id
    async fn find_active(&self) -> Result<Vec<QueueEntry>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::PriorityClass;
    use crate::error::AppError;
    use crate::port::transaction::{
        EntryRepositoryTransaction, Transaction, TransactionalEntryRepository,
    };
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Default)]
    struct MemoryState {
        entries: BTreeMap<EntryId, QueueEntry>,
        last_id: EntryId,
    }

    /// In-memory record store implementing both repository ports.
    ///
    /// Transactions work on a private copy and publish it on commit.
    #[derive(Clone, Default)]
    pub struct InMemoryEntryRepository {
        state: Arc<Mutex<MemoryState>>,
        fail_commits: Arc<AtomicBool>,
    }

    impl InMemoryEntryRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every following commit fail (storage failure simulation)
        pub fn fail_commits(&self, fail: bool) {
            self.fail_commits.store(fail, Ordering::SeqCst);
        }

        /// Copy of every stored entry, ordered by id
        pub fn snapshot(&self) -> Vec<QueueEntry> {
            self.state.lock().unwrap().entries.values().cloned().collect()
        }
    }

    #[async_trait]
    impl EntryRepository for InMemoryEntryRepository {
        async fn find_by_id(&self, id: EntryId) -> Result<Option<QueueEntry>> {
            Ok(self.state.lock().unwrap().entries.get(&id).cloned())
        }

        async fn find_active(&self) -> Result<Vec<QueueEntry>> {
            Ok(self
                .state
                .lock()
                .unwrap()
                .entries
                .values()
                .filter(|e| e.is_active())
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl TransactionalEntryRepository for InMemoryEntryRepository {
        async fn begin_transaction(&self) -> Result<Box<dyn EntryRepositoryTransaction>> {
            let working = self.state.lock().unwrap().clone();
            Ok(Box::new(InMemoryTransaction {
                shared: Arc::clone(&self.state),
                working,
                fail_commit: self.fail_commits.load(Ordering::SeqCst),
            }))
        }
    }

    struct InMemoryTransaction {
        shared: Arc<Mutex<MemoryState>>,
        working: MemoryState,
        fail_commit: bool,
    }

    #[async_trait]
    impl Transaction for InMemoryTransaction {
        async fn commit(self: Box<Self>) -> Result<()> {
            if self.fail_commit {
                return Err(AppError::Database("simulated commit failure".to_string()));
            }
            *self.shared.lock().unwrap() = self.working;
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl EntryRepositoryTransaction for InMemoryTransaction {
        async fn find_by_id(&mut self, id: EntryId) -> Result<Option<QueueEntry>> {
            Ok(self.working.entries.get(&id).cloned())
        }

        async fn find_active(&mut self) -> Result<Vec<QueueEntry>> {
            Ok(self
                .working
                .entries
                .values()
                .filter(|e| e.is_active())
                .cloned()
                .collect())
        }

        async fn find_active_by_class(&mut self, class: PriorityClass) -> Result<Vec<QueueEntry>> {
            Ok(self
                .working
                .entries
                .values()
                .filter(|e| e.is_active() && e.class == class)
                .cloned()
                .collect())
        }

        async fn count_all(&mut self) -> Result<i64> {
            Ok(self.working.entries.len() as i64)
        }

        async fn count_by_class(&mut self, class: PriorityClass) -> Result<i64> {
            Ok(self
                .working
                .entries
                .values()
                .filter(|e| e.class == class)
                .count() as i64)
        }

        async fn allocate_id(&mut self) -> Result<EntryId> {
            self.working.last_id += 1;
            Ok(self.working.last_id)
        }

        async fn insert(&mut self, entry: &QueueEntry) -> Result<()> {
            if self.working.entries.contains_key(&entry.id) {
                return Err(AppError::Database(format!(
                    "Unique constraint violation: entry {}",
                    entry.id
                )));
            }
            self.working.entries.insert(entry.id, entry.clone());
            Ok(())
        }

        async fn update_position(&mut self, entry: &QueueEntry) -> Result<()> {
            match self.working.entries.get_mut(&entry.id) {
                Some(stored) => {
                    stored.position = entry.position;
                    stored.served = entry.served;
                    Ok(())
                }
                None => Err(AppError::Database(format!("Row not found: {}", entry.id))),
            }
        }

        async fn delete(&mut self, id: EntryId) -> Result<bool> {
            Ok(self.working.entries.remove(&id).is_some())
        }
    }
}
