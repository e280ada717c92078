//! Search log persistence. Append-only.

use sqlx::SqlitePool;

use crate::models::SearchLog;
use crate::Result;

/// Record a lookup attempt. `drug_id` is `None` when resolution failed.
pub async fn log_search(
    pool: &SqlitePool,
    search_term: &str,
    drug_id: Option<i64>,
    found: bool,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO searches (search_term, drug_id, found)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(search_term)
    .bind(drug_id)
    .bind(found)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get recent lookups, newest first.
pub async fn recent_searches(pool: &SqlitePool, limit: i64) -> Result<Vec<SearchLog>> {
    let rows = sqlx::query_as::<_, SearchLog>(
        r#"
        SELECT id, search_term, drug_id, found, created_at
        FROM searches
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count total lookups.
pub async fn count_searches(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM searches
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Count lookups that resolved nothing.
pub async fn count_misses(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM searches
        WHERE found = 0
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drug;
    use crate::test_support::test_db;

    #[tokio::test]
    async fn test_log_and_counts() {
        let db = test_db().await;
        let drug = drug::upsert_drug(db.pool(), "Tylenol", None).await.unwrap();

        log_search(db.pool(), "tylenol", Some(drug.id), true)
            .await
            .unwrap();
        log_search(db.pool(), "unobtainium", None, false)
            .await
            .unwrap();

        assert_eq!(count_searches(db.pool()).await.unwrap(), 2);
        assert_eq!(count_misses(db.pool()).await.unwrap(), 1);

        let recent = recent_searches(db.pool(), 10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].search_term, "unobtainium");
        assert!(!recent[0].found);
        assert_eq!(recent[0].drug_id, None);
        assert_eq!(recent[1].drug_id, Some(drug.id));
    }

    #[tokio::test]
    async fn test_log_survives_drug_deletion() {
        let db = test_db().await;
        let drug = drug::upsert_drug(db.pool(), "Advil", None).await.unwrap();

        log_search(db.pool(), "advil", Some(drug.id), true)
            .await
            .unwrap();
        drug::delete_drug(db.pool(), drug.id).await.unwrap();

        let recent = recent_searches(db.pool(), 10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].search_term, "advil");
        assert_eq!(recent[0].drug_id, None);
    }
}
