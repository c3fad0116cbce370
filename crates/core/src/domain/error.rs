// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid class code {0:?}, choose P (preferential) or N (normal)")]
    InvalidClass(String),

    #[error("Entry {0} is already in the queue")]
    DuplicateId(i64),

    #[error("No entries of class {0} exist")]
    EmptyClass(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(i64),

    #[error("Entry {0} was already served")]
    AlreadyServed(i64),

    #[error("The queue is empty")]
    QueueEmpty,
}

pub type Result<T> = std::result::Result<T, DomainError>;
