//! Background enrichment queue.
//!
//! Priority convention: lower values are more urgent and are claimed first;
//! ties go to the oldest item. Claiming flips `pending` to `processing` in a
//! single conditional update, so concurrent workers never pick up the same
//! item. `done` and `failed` are terminal.

use sqlx::SqlitePool;

use crate::error::{Result, StoreError};
use crate::models::{QueueItem, QueueStatus};
use crate::validation;

/// Priority assigned when the caller has no opinion.
pub const DEFAULT_PRIORITY: i64 = 5;

/// Insert a pending enrichment job.
///
/// Duplicate pending jobs for the same name are allowed; deduplication is
/// the caller's concern.
pub async fn enqueue(pool: &SqlitePool, drug_name: &str, priority: i64) -> Result<QueueItem> {
    validation::validate_drug_name(drug_name)?;

    let item = sqlx::query_as::<_, QueueItem>(
        r#"
        INSERT INTO processing_queue (drug_name, priority)
        VALUES (?, ?)
        RETURNING id, drug_name, priority, status, created_at
        "#,
    )
    .bind(drug_name)
    .bind(priority)
    .fetch_one(pool)
    .await?;

    Ok(item)
}

/// Claim the next pending job, or `None` when the queue is drained.
///
/// The claim is one conditional update: whichever worker's statement runs
/// first gets the row, everyone else moves on to the next one.
pub async fn dequeue_next(pool: &SqlitePool) -> Result<Option<QueueItem>> {
    let item = sqlx::query_as::<_, QueueItem>(
        r#"
        UPDATE processing_queue
        SET status = 'processing'
        WHERE id = (
            SELECT id FROM processing_queue
            WHERE status = 'pending'
            ORDER BY priority ASC, created_at ASC, id ASC
            LIMIT 1
        )
        AND status = 'pending'
        RETURNING id, drug_name, priority, status, created_at
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

/// Mark a claimed job as completed.
pub async fn mark_done(pool: &SqlitePool, id: i64) -> Result<QueueItem> {
    transition(pool, id, QueueStatus::Done).await
}

/// Mark a claimed job as failed.
pub async fn mark_failed(pool: &SqlitePool, id: i64) -> Result<QueueItem> {
    transition(pool, id, QueueStatus::Failed).await
}

/// Move a job out of `processing`. Any other current state is an illegal
/// transition; in particular, terminal rows never change again.
async fn transition(pool: &SqlitePool, id: i64, to: QueueStatus) -> Result<QueueItem> {
    let item = sqlx::query_as::<_, QueueItem>(
        r#"
        UPDATE processing_queue
        SET status = ?
        WHERE id = ? AND status = 'processing'
        RETURNING id, drug_name, priority, status, created_at
        "#,
    )
    .bind(to)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match item {
        Some(item) => Ok(item),
        None => {
            let current = get_item(pool, id).await?;
            Err(StoreError::InvalidTransition {
                id,
                from: current.status.as_str(),
                to: to.as_str(),
            })
        }
    }
}

/// Get a job by ID.
pub async fn get_item(pool: &SqlitePool, id: i64) -> Result<QueueItem> {
    sqlx::query_as::<_, QueueItem>(
        r#"
        SELECT id, drug_name, priority, status, created_at
        FROM processing_queue
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| StoreError::NotFound {
        entity: "QueueItem",
        id: id.to_string(),
    })
}

/// Count jobs grouped by status.
pub async fn count_by_status(pool: &SqlitePool) -> Result<Vec<(QueueStatus, i64)>> {
    let rows = sqlx::query_as::<_, (QueueStatus, i64)>(
        r#"
        SELECT status, COUNT(*) as count
        FROM processing_queue
        GROUP BY status
        ORDER BY count DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
