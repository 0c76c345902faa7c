//! Reward Transaction (points ledger) Model

use serde::{Deserialize, Serialize};

/// Direction-bearing transaction type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TransactionType {
    /// Credit: visit, special reward, promotion
    Earn,
    /// Debit: points exchanged for a catalog reward
    Redeem,
    /// Debit companion row for a USDC payout dispatch
    Payout,
    /// Credit: manual support correction
    Adjust,
}

impl TransactionType {
    /// Sign from the member's perspective (+1 credit, -1 debit)
    pub fn direction(&self) -> i64 {
        match self {
            Self::Earn | Self::Adjust => 1,
            Self::Redeem | Self::Payout => -1,
        }
    }
}

/// Transaction settlement status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TransactionStatus {
    Completed,
    /// USDC payout handed to the relayer, on-chain settlement pending
    Pending,
}

/// Immutable ledger row, append-only
///
/// `amount` is always stored positive; `tx_type` carries the direction.
/// Core invariant: for any (merchant, member), the signed sum of rows
/// equals `merchant_membership.points`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RewardTransaction {
    pub id: i64,
    pub merchant_id: i64,
    pub member_id: i64,
    pub tx_type: TransactionType,
    pub amount: i64,
    pub status: TransactionStatus,
    pub reason: String,
    pub created_at: i64,
}

impl RewardTransaction {
    /// Amount signed from the member's perspective
    pub fn signed_amount(&self) -> i64 {
        self.tx_type.direction() * self.amount
    }
}
