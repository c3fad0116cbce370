// Join Use Case

use crate::domain::line;
use crate::domain::{DomainError, EntryId, PriorityClass, QueueEntry, MAX_NAME_LEN};
use crate::error::{AppError, Result};
use crate::port::{TimeProvider, TransactionalEntryRepository};
use serde::{Deserialize, Serialize};

/// Join request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    /// Client-supplied id. Only checked against active entries, then overwritten.
    #[serde(default)]
    pub id: Option<EntryId>,
    pub name: String,
    #[serde(alias = "classCode")]
    pub class_code: String,
}

impl JoinRequest {
    pub fn new(name: impl Into<String>, class_code: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            class_code: class_code.into(),
        }
    }
}

/// Validate and normalize a display name
pub fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::Validation(format!(
            "name too long (max {} characters)",
            MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

/// Execute join use case (single transaction)
///
/// # Arguments
///
/// * `repo` - Transactional entry repository
/// * `time_provider` - Clock for `joined_at` (injected for determinism)
/// * `req` - Join request
pub async fn execute(
    repo: &dyn TransactionalEntryRepository,
    time_provider: &dyn TimeProvider,
    req: JoinRequest,
) -> Result<QueueEntry> {
    let mut tx = repo.begin_transaction().await?;

    let active = tx.find_active().await?;

    if let Some(requested) = req.id {
        if active.iter().any(|e| e.id == requested) {
            return Err(DomainError::DuplicateId(requested).into());
        }
    }

    let class = PriorityClass::from_code(&req.class_code)?;
    let name = validate_name(&req.name)?;

    let id = tx.allocate_id().await?;
    let position = line::next_position(&active, class);
    let joined_at = line::format_joined_at(time_provider.now_millis());

    let entry = QueueEntry::new(id, name, class, position, joined_at);
    tx.insert(&entry).await?;

    tx.commit().await?;

    Ok(entry)
}
