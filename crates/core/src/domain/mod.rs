// Domain Layer - Pure business logic and entities

pub mod entry;
pub mod error;
pub mod line;

// Re-exports
pub use entry::{EntryId, Position, PriorityClass, QueueEntry, MAX_NAME_LEN};
pub use error::DomainError;
