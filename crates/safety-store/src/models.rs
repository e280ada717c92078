//! Store row models.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A canonical medication record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Drug {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Brand or product name. Unique, case-insensitively.
    pub name: String,
    /// Generic (INN) name, if known.
    pub generic_name: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// A time-boxed safety assessment for one drug.
///
/// Rows are append-only: a re-fetch inserts a new row and the freshest
/// non-expired one is the row consulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SafetyData {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning drug.
    pub drug_id: i64,
    /// One-letter regulatory risk code, when the label carries one.
    pub pregnancy_category: Option<String>,
    /// Pregnancy section excerpt from the label.
    pub pregnancy_text: Option<String>,
    /// Nursing-mothers section excerpt from the label.
    pub breastfeeding_text: Option<String>,
    /// Derived pregnancy safety label (e.g. "safe", "caution", "avoid").
    pub pregnancy_safety: String,
    /// Derived breastfeeding safety label.
    pub breastfeeding_safety: String,
    /// Analysis summary text.
    pub ai_summary: Option<String>,
    /// Ordered warning excerpts, most important first.
    pub key_warnings: Json<Vec<String>>,
    /// Where the assessment came from (e.g. "fda_ai", "enhanced_multi_source").
    pub data_source: String,
    /// Assessment confidence in [0, 1], two decimals.
    pub confidence_score: f64,
    /// Number of supporting studies.
    pub study_count: i64,
    /// When the assessment was fetched.
    pub fetched_at: String,
    /// When the assessment stops being served as fresh.
    pub expires_at: String,
}

/// Fields supplied when recording a new safety assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSafetyData {
    pub pregnancy_category: Option<String>,
    pub pregnancy_text: Option<String>,
    pub breastfeeding_text: Option<String>,
    pub pregnancy_safety: String,
    pub breastfeeding_safety: String,
    pub ai_summary: Option<String>,
    pub key_warnings: Vec<String>,
    pub data_source: String,
    pub confidence_score: f64,
    pub study_count: i64,
}

/// An append-only record of one lookup attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SearchLog {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Search term as the caller typed it.
    pub search_term: String,
    /// Resolved drug, if the lookup matched one.
    pub drug_id: Option<i64>,
    /// Whether the lookup was served.
    pub found: bool,
    /// Creation timestamp.
    pub created_at: String,
}

/// An expiring cached payload from an external API call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ApiCacheEntry {
    /// Opaque key, e.g. "fda:atorvastatin".
    pub cache_key: String,
    /// Raw structured payload as returned by the source.
    pub data: Json<serde_json::Value>,
    /// When the entry stops being valid.
    pub expires_at: String,
}

/// Lifecycle state of a queued enrichment job.
///
/// `pending -> processing -> {done, failed}`; terminal states never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    Pending,
    Processing,
    Done,
    Failed,
}

impl QueueStatus {
    /// Stable lowercase name, matching the stored TEXT value.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Pending => "pending",
            QueueStatus::Processing => "processing",
            QueueStatus::Done => "done",
            QueueStatus::Failed => "failed",
        }
    }

    /// Whether no further transition is allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueueStatus::Done | QueueStatus::Failed)
    }
}

/// A pending or completed background enrichment job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct QueueItem {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Requested drug name; may not match an existing drug yet.
    pub drug_name: String,
    /// Urgency; lower values are claimed first.
    pub priority: i64,
    /// Current lifecycle state.
    pub status: QueueStatus,
    /// Creation timestamp.
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_status_names() {
        assert_eq!(QueueStatus::Pending.as_str(), "pending");
        assert_eq!(QueueStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn test_queue_status_terminal() {
        assert!(!QueueStatus::Pending.is_terminal());
        assert!(!QueueStatus::Processing.is_terminal());
        assert!(QueueStatus::Done.is_terminal());
        assert!(QueueStatus::Failed.is_terminal());
    }
}
