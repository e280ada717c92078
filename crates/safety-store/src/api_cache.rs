//! Generic expiring cache for raw external-API payloads.
//!
//! Keys are opaque composites like `"fda:atorvastatin"`. The fetch layer
//! checks here before going to the network and writes back what it got.

use std::time::Duration;

use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::ApiCacheEntry;
use crate::validation;
use crate::Result;

/// Get a cached payload, if present and not yet expired.
///
/// An expired entry reads exactly like a missing one.
pub async fn cache_get(pool: &SqlitePool, key: &str) -> Result<Option<serde_json::Value>> {
    let entry = sqlx::query_as::<_, ApiCacheEntry>(
        r#"
        SELECT cache_key, data, expires_at
        FROM api_cache
        WHERE cache_key = ? AND expires_at > datetime('now')
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(entry.map(|e| e.data.0))
}

/// Store a payload under a key for `ttl`.
///
/// A single upsert statement: payload and expiry are replaced together, so a
/// concurrent reader sees either the old entry or the new one, never a mix.
pub async fn cache_put(
    pool: &SqlitePool,
    key: &str,
    payload: &serde_json::Value,
    ttl: Duration,
) -> Result<()> {
    validation::validate_cache_key(key)?;
    validation::validate_ttl("cache ttl", ttl)?;
    let expiry_modifier = format!("+{} seconds", ttl.as_secs());

    sqlx::query(
        r#"
        INSERT INTO api_cache (cache_key, data, expires_at)
        VALUES (?, ?, datetime('now', ?))
        ON CONFLICT(cache_key) DO UPDATE SET
            data = excluded.data,
            expires_at = excluded.expires_at
        "#,
    )
    .bind(key)
    .bind(Json(payload))
    .bind(&expiry_modifier)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete expired entries. Returns how many rows went away.
pub async fn purge_expired(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM api_cache
        WHERE expires_at <= datetime('now')
        "#,
    )
    .execute(pool)
    .await?;

    let purged = result.rows_affected();
    if purged > 0 {
        tracing::debug!("Purged {} expired cache entries", purged);
    }

    Ok(purged)
}
