// Shared SQL for pool- and transaction-scoped access

use crate::error::map_sqlx_error;
use sqlx::SqliteExecutor;
use waitline_core::domain::{EntryId, PriorityClass, QueueEntry};
use waitline_core::error::{AppError, Result};

const SELECT_ENTRY: &str =
    "SELECT id, name, class_code, served, joined_at, position FROM queue_entries";

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct EntryRow {
    id: i64,
    name: String,
    class_code: String,
    served: bool,
    joined_at: String,
    position: i64,
}

impl EntryRow {
    fn into_entry(self) -> Result<QueueEntry> {
        let class = PriorityClass::from_code(&self.class_code).map_err(|_| {
            AppError::Database(format!(
                "Corrupt row {}: unknown class code {:?}",
                self.id, self.class_code
            ))
        })?;

        Ok(QueueEntry {
            id: self.id,
            name: self.name,
            class,
            served: self.served,
            joined_at: self.joined_at,
            position: self.position,
        })
    }
}

fn into_entries(rows: Vec<EntryRow>) -> Result<Vec<QueueEntry>> {
    rows.into_iter().map(EntryRow::into_entry).collect()
}

pub(crate) async fn find_by_id<'e>(
    executor: impl SqliteExecutor<'e>,
    id: EntryId,
) -> Result<Option<QueueEntry>> {
    let row = sqlx::query_as::<_, EntryRow>(&format!("{} WHERE id = ?", SELECT_ENTRY))
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(map_sqlx_error)?;

    row.map(EntryRow::into_entry).transpose()
}

pub(crate) async fn find_active(executor: impl SqliteExecutor<'_>) -> Result<Vec<QueueEntry>> {
    let rows = sqlx::query_as::<_, EntryRow>(&format!(
        "{} WHERE served = 0 ORDER BY id ASC",
        SELECT_ENTRY
    ))
    .fetch_all(executor)
    .await
    .map_err(map_sqlx_error)?;

    into_entries(rows)
}

pub(crate) async fn find_active_by_class(
    executor: impl SqliteExecutor<'_>,
    class: PriorityClass,
) -> Result<Vec<QueueEntry>> {
    let rows = sqlx::query_as::<_, EntryRow>(&format!(
        "{} WHERE served = 0 AND class_code = ? ORDER BY position ASC, id ASC",
        SELECT_ENTRY
    ))
    .bind(class.code())
    .fetch_all(executor)
    .await
    .map_err(map_sqlx_error)?;

    into_entries(rows)
}

pub(crate) async fn count_all(executor: impl SqliteExecutor<'_>) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM queue_entries")
        .fetch_one(executor)
        .await
        .map_err(map_sqlx_error)
}

pub(crate) async fn count_by_class(
    executor: impl SqliteExecutor<'_>,
    class: PriorityClass,
) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM queue_entries WHERE class_code = ?")
        .bind(class.code())
        .fetch_one(executor)
        .await
        .map_err(map_sqlx_error)
}

pub(crate) async fn allocate_id(executor: impl SqliteExecutor<'_>) -> Result<EntryId> {
    sqlx::query_scalar(
        r#"
        UPDATE id_sequence
        SET next_id = next_id + 1
        WHERE singleton = 1
        RETURNING next_id - 1
        "#,
    )
    .fetch_one(executor)
    .await
    .map_err(map_sqlx_error)
}

pub(crate) async fn insert(executor: impl SqliteExecutor<'_>, entry: &QueueEntry) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO queue_entries (id, name, class_code, served, joined_at, position)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(entry.id)
    .bind(&entry.name)
    .bind(entry.class.code())
    .bind(entry.served)
    .bind(&entry.joined_at)
    .bind(entry.position)
    .execute(executor)
    .await
    .map_err(map_sqlx_error)?;

    Ok(())
}

pub(crate) async fn update_position(
    executor: impl SqliteExecutor<'_>,
    entry: &QueueEntry,
) -> Result<()> {
    let result = sqlx::query("UPDATE queue_entries SET position = ?, served = ? WHERE id = ?")
        .bind(entry.position)
        .bind(entry.served)
        .bind(entry.id)
        .execute(executor)
        .await
        .map_err(map_sqlx_error)?;

    if result.rows_affected() == 0 {
        return Err(AppError::Database(format!(
            "Row not found: entry {}",
            entry.id
        )));
    }
    Ok(())
}

pub(crate) async fn delete(executor: impl SqliteExecutor<'_>, id: EntryId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM queue_entries WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await
        .map_err(map_sqlx_error)?;

    Ok(result.rows_affected() > 0)
}
