//! Merchant & Special Reward Settings Models

use serde::{Deserialize, Serialize};

/// Merchant entity (商户)
///
/// Carries the per-kind special-reward toggles the settings UI writes
/// and the claim service reads. One `enabled/points/window_days/reward_id`
/// quadruple per [`SpecialRewardKind`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Merchant {
    pub id: i64,
    pub name: String,
    /// Plan capability: whether USDC payout rewards may be redeemed
    pub usdc_payouts_enabled: bool,

    pub birthday_reward_enabled: bool,
    pub birthday_reward_points: i64,
    pub birthday_window_days: i64,
    /// Optional catalog reward bundled with a birthday claim
    pub birthday_reward_id: Option<i64>,

    pub member_anniversary_reward_enabled: bool,
    pub member_anniversary_reward_points: i64,
    pub member_anniversary_window_days: i64,
    pub member_anniversary_reward_id: Option<i64>,

    pub relationship_anniversary_reward_enabled: bool,
    pub relationship_anniversary_reward_points: i64,
    pub relationship_anniversary_window_days: i64,
    pub relationship_anniversary_reward_id: Option<i64>,

    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Business location entity (merchant-owned)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Business {
    pub id: i64,
    pub merchant_id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Once-per-year special reward kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecialRewardKind {
    Birthday,
    MemberAnniversary,
    RelationshipAnniversary,
}

/// The merchant settings slice for one special-reward kind
#[derive(Debug, Clone, Copy)]
pub struct SpecialRewardSettings {
    pub enabled: bool,
    pub points: i64,
    pub window_days: i64,
    pub reward_id: Option<i64>,
}

impl SpecialRewardKind {
    /// Extract this kind's settings quadruple from a merchant row
    pub fn settings(&self, merchant: &Merchant) -> SpecialRewardSettings {
        match self {
            Self::Birthday => SpecialRewardSettings {
                enabled: merchant.birthday_reward_enabled,
                points: merchant.birthday_reward_points,
                window_days: merchant.birthday_window_days,
                reward_id: merchant.birthday_reward_id,
            },
            Self::MemberAnniversary => SpecialRewardSettings {
                enabled: merchant.member_anniversary_reward_enabled,
                points: merchant.member_anniversary_reward_points,
                window_days: merchant.member_anniversary_window_days,
                reward_id: merchant.member_anniversary_reward_id,
            },
            Self::RelationshipAnniversary => SpecialRewardSettings {
                enabled: merchant.relationship_anniversary_reward_enabled,
                points: merchant.relationship_anniversary_reward_points,
                window_days: merchant.relationship_anniversary_window_days,
                reward_id: merchant.relationship_anniversary_reward_id,
            },
        }
    }

    /// Audit event type written when a claim of this kind succeeds
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Birthday => "BIRTHDAY_REWARD",
            Self::MemberAnniversary => "MEMBER_ANNIVERSARY_REWARD",
            Self::RelationshipAnniversary => "RELATIONSHIP_ANNIVERSARY_REWARD",
        }
    }

    /// Ledger reason string for the EARN transaction
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Birthday => "birthday reward",
            Self::MemberAnniversary => "member anniversary reward",
            Self::RelationshipAnniversary => "relationship anniversary reward",
        }
    }
}
