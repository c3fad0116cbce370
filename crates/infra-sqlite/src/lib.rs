// Waitline Infrastructure - SQLite Adapter
// Implements: EntryRepository, TransactionalEntryRepository

mod connection;
mod entry_repository;
mod error;
mod migration;
mod queries;
mod transaction;

pub use connection::create_pool;
pub use entry_repository::SqliteEntryRepository;
pub use migration::run_migrations;
pub use transaction::SqliteEntryTransaction;
