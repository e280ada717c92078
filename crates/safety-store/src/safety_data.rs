//! Safety assessment persistence.
//!
//! Assessments are append-only: every fetch/analysis cycle inserts a new row
//! and readers take the freshest row whose expiry has not passed. A row is
//! never updated in place, so concurrent writers cannot lose each other's
//! results and the fetch history stays intact.

use std::time::Duration;

use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::error::{Result, StoreError};
use crate::models::{NewSafetyData, SafetyData};
use crate::validation;

/// Default lifetime of an assessment: 30 days past its fetch time.
pub const DEFAULT_SAFETY_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Record a new safety assessment for a drug.
///
/// Always inserts; prior rows for the same drug are left untouched. `ttl`
/// overrides the 30-day default expiry (e.g. a shorter window for
/// low-confidence data). The confidence score is stored with two-decimal
/// precision.
pub async fn record_safety_data(
    pool: &SqlitePool,
    drug_id: i64,
    data: &NewSafetyData,
    ttl: Option<Duration>,
) -> Result<SafetyData> {
    validation::validate_confidence_score(data.confidence_score)?;
    validation::validate_study_count(data.study_count)?;
    if let Some(category) = &data.pregnancy_category {
        validation::validate_pregnancy_category(category)?;
    }

    let ttl = ttl.unwrap_or(DEFAULT_SAFETY_TTL);
    validation::validate_ttl("safety data ttl", ttl)?;
    let expiry_modifier = format!("+{} seconds", ttl.as_secs());

    let score = (data.confidence_score * 100.0).round() / 100.0;

    sqlx::query_as::<_, SafetyData>(
        r#"
        INSERT INTO drug_safety_data
            (drug_id, pregnancy_category, pregnancy_text, breastfeeding_text,
             pregnancy_safety, breastfeeding_safety, ai_summary, key_warnings,
             data_source, confidence_score, study_count, fetched_at, expires_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'), datetime('now', ?))
        RETURNING id, drug_id, pregnancy_category, pregnancy_text, breastfeeding_text,
                  pregnancy_safety, breastfeeding_safety, ai_summary, key_warnings,
                  data_source, confidence_score, study_count, fetched_at, expires_at
        "#,
    )
    .bind(drug_id)
    .bind(&data.pregnancy_category)
    .bind(&data.pregnancy_text)
    .bind(&data.breastfeeding_text)
    .bind(&data.pregnancy_safety)
    .bind(&data.breastfeeding_safety)
    .bind(&data.ai_summary)
    .bind(Json(&data.key_warnings))
    .bind(&data.data_source)
    .bind(score)
    .bind(data.study_count)
    .bind(&expiry_modifier)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return StoreError::NotFound {
                    entity: "Drug",
                    id: drug_id.to_string(),
                };
            }
        }
        StoreError::Sqlx(e)
    })
}

/// Get the freshest non-expired assessment for a drug, if any.
///
/// Expired rows are treated exactly like missing rows; `None` tells the
/// caller to re-fetch.
pub async fn get_fresh(pool: &SqlitePool, drug_id: i64) -> Result<Option<SafetyData>> {
    let row = sqlx::query_as::<_, SafetyData>(
        r#"
        SELECT id, drug_id, pregnancy_category, pregnancy_text, breastfeeding_text,
               pregnancy_safety, breastfeeding_safety, ai_summary, key_warnings,
               data_source, confidence_score, study_count, fetched_at, expires_at
        FROM drug_safety_data
        WHERE drug_id = ? AND expires_at > datetime('now')
        ORDER BY fetched_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(drug_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Get the freshest non-expired assessment from one data source.
pub async fn get_fresh_from_source(
    pool: &SqlitePool,
    drug_id: i64,
    data_source: &str,
) -> Result<Option<SafetyData>> {
    let row = sqlx::query_as::<_, SafetyData>(
        r#"
        SELECT id, drug_id, pregnancy_category, pregnancy_text, breastfeeding_text,
               pregnancy_safety, breastfeeding_safety, ai_summary, key_warnings,
               data_source, confidence_score, study_count, fetched_at, expires_at
        FROM drug_safety_data
        WHERE drug_id = ? AND data_source = ? AND expires_at > datetime('now')
        ORDER BY fetched_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(drug_id)
    .bind(data_source)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Get recent assessments for a drug, expired ones included, newest first.
pub async fn history(pool: &SqlitePool, drug_id: i64, limit: i64) -> Result<Vec<SafetyData>> {
    let rows = sqlx::query_as::<_, SafetyData>(
        r#"
        SELECT id, drug_id, pregnancy_category, pregnancy_text, breastfeeding_text,
               pregnancy_safety, breastfeeding_safety, ai_summary, key_warnings,
               data_source, confidence_score, study_count, fetched_at, expires_at
        FROM drug_safety_data
        WHERE drug_id = ?
        ORDER BY fetched_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(drug_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete expired assessments. Returns how many rows went away.
pub async fn purge_expired(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM drug_safety_data
        WHERE expires_at <= datetime('now')
        "#,
    )
    .execute(pool)
    .await?;

    let purged = result.rows_affected();
    if purged > 0 {
        tracing::debug!("Purged {} expired safety data rows", purged);
    }

    Ok(purged)
}
