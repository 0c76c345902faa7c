//! Reward Catalog Model

use serde::{Deserialize, Serialize};

/// How a reward pays out on confirmation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RewardType {
    /// In-store item or service, fulfilled by staff
    Traditional,
    /// USDC transfer to the member's custodial wallet (external relayer)
    UsdcPayout,
}

/// Merchant-owned catalog entry
///
/// Immutable once referenced by a past redemption (historical integrity);
/// the settings UI enforces that, this core only reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reward {
    pub id: i64,
    pub merchant_id: i64,
    pub name: String,
    /// Points debited on confirmation, ≥ 0
    pub points_cost: i64,
    pub reward_type: RewardType,
    /// Required iff `reward_type == UsdcPayout`
    pub usdc_amount: Option<f64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
