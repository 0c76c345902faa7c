//! Audit Event Model

use serde::{Deserialize, Serialize};

/// Append-only audit log entry
///
/// Write-only from the core's perspective; `metadata` is an opaque JSON
/// blob stored as TEXT. Together with `reward_transaction` rows these
/// make the `last_*_claim_year` cache fields reconstructible.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Event {
    pub id: i64,
    pub merchant_id: i64,
    pub member_id: Option<i64>,
    pub event_type: String,
    /// JSON metadata blob (serialized `serde_json::Value`)
    pub metadata: String,
    pub created_at: i64,
}
