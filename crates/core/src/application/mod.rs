// Application Layer - Use Cases

pub mod queue;

// Re-exports
pub use queue::{JoinRequest, QueueService, RemoveOutcome, ShiftSummary};
