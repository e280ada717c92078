//! Drug record operations.
//!
//! `name` is unique with NOCASE collation, so equality lookups and the
//! uniqueness constraint are both case-insensitive.

use sqlx::SqlitePool;

use crate::error::{Result, StoreError};
use crate::models::Drug;
use crate::validation;

/// Create a new drug.
///
/// Fails with [`StoreError::AlreadyExists`] when the name is taken (in any
/// case variant); the caller recovers by re-reading with
/// [`find_drug_by_name`].
pub async fn create_drug(
    pool: &SqlitePool,
    name: &str,
    generic_name: Option<&str>,
) -> Result<Drug> {
    validation::validate_drug_name(name)?;

    sqlx::query_as::<_, Drug>(
        r#"
        INSERT INTO drugs (name, generic_name)
        VALUES (?, ?)
        RETURNING id, name, generic_name, created_at
        "#,
    )
    .bind(name)
    .bind(generic_name)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return StoreError::AlreadyExists {
                    entity: "Drug",
                    id: name.to_string(),
                };
            }
        }
        StoreError::Sqlx(e)
    })
}

/// Create a drug or return the existing row for the same name.
///
/// A single upsert statement, so concurrent calls with the same name can
/// never create duplicates. An incoming generic name fills an empty slot but
/// never erases a stored one.
pub async fn upsert_drug(
    pool: &SqlitePool,
    name: &str,
    generic_name: Option<&str>,
) -> Result<Drug> {
    validation::validate_drug_name(name)?;

    let drug = sqlx::query_as::<_, Drug>(
        r#"
        INSERT INTO drugs (name, generic_name)
        VALUES (?, ?)
        ON CONFLICT(name) DO UPDATE SET
            generic_name = COALESCE(excluded.generic_name, drugs.generic_name)
        RETURNING id, name, generic_name, created_at
        "#,
    )
    .bind(name)
    .bind(generic_name)
    .fetch_one(pool)
    .await?;

    Ok(drug)
}

/// Find a drug by name, case-insensitively. Exact match only.
pub async fn find_drug_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Drug>> {
    let drug = sqlx::query_as::<_, Drug>(
        r#"
        SELECT id, name, generic_name, created_at
        FROM drugs
        WHERE name = ?
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(drug)
}

/// Find a drug whose name or generic name matches, case-insensitively.
pub async fn find_drug_by_any_name(pool: &SqlitePool, name: &str) -> Result<Option<Drug>> {
    let drug = sqlx::query_as::<_, Drug>(
        r#"
        SELECT id, name, generic_name, created_at
        FROM drugs
        WHERE name = ? OR generic_name = ? COLLATE NOCASE
        "#,
    )
    .bind(name)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(drug)
}

/// Get a drug by ID.
pub async fn get_drug(pool: &SqlitePool, id: i64) -> Result<Drug> {
    sqlx::query_as::<_, Drug>(
        r#"
        SELECT id, name, generic_name, created_at
        FROM drugs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| StoreError::NotFound {
        entity: "Drug",
        id: id.to_string(),
    })
}

/// Delete a drug by ID. Its safety data rows go with it.
pub async fn delete_drug(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM drugs
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound {
            entity: "Drug",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List all drugs.
pub async fn list_drugs(pool: &SqlitePool) -> Result<Vec<Drug>> {
    let drugs = sqlx::query_as::<_, Drug>(
        r#"
        SELECT id, name, generic_name, created_at
        FROM drugs
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(drugs)
}

/// Count total drugs.
pub async fn count_drugs(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM drugs
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
