// Port Layer - Interfaces for external dependencies

pub mod access_gate;
pub mod entry_repository;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use access_gate::AccessGate;
pub use entry_repository::EntryRepository;
pub use time_provider::TimeProvider;
pub use transaction::{EntryRepositoryTransaction, Transaction, TransactionalEntryRepository};
