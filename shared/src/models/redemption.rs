//! Redemption Request Model

use serde::{Deserialize, Serialize};

/// Redemption session status
///
/// `PENDING → {CONFIRMED, DECLINED, EXPIRED, CANCELED}`, the four
/// right-hand states are terminal; no transition ever leaves them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RedemptionStatus {
    Pending,
    Confirmed,
    Declined,
    Expired,
    Canceled,
}

impl RedemptionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// One attempt to exchange points for a reward
///
/// `points_cost` is snapshotted at creation; later catalog edits never
/// change what an in-flight session will charge. Rows are never deleted
/// (audit record).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RedemptionRequest {
    pub id: i64,
    pub member_id: i64,
    pub merchant_id: i64,
    pub business_id: Option<i64>,
    pub reward_id: i64,
    pub points_cost: i64,
    /// Opaque, unguessable bearer token shown as a QR code
    pub qr_code_hash: String,
    pub status: RedemptionStatus,
    pub expires_at: i64,
    pub confirmed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl RedemptionRequest {
    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.status == RedemptionStatus::Pending && now_millis > self.expires_at
    }
}
