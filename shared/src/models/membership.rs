//! Merchant Membership Model

use serde::{Deserialize, Serialize};

use super::merchant::SpecialRewardKind;

/// Member tier within a merchant's program
///
/// Derived, not authoritative, the balance in `points` is the source of
/// truth, tier is a presentation cache maintained outside this core.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Tier {
    Base,
    Silver,
    Gold,
}

/// Merchant × member join entity (持有积分余额)
///
/// Created lazily on first interaction. `points` is only ever mutated by
/// the points ledger; the `last_*_claim_year` fields strictly increase
/// when set and gate once-per-year special-reward claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MerchantMembership {
    pub id: i64,
    pub merchant_id: i64,
    pub member_id: i64,
    /// Current balance, integer ≥ 0
    pub points: i64,
    pub tier: Tier,
    pub last_birthday_claim_year: Option<i64>,
    pub last_member_anniversary_claim_year: Option<i64>,
    pub last_relationship_anniversary_claim_year: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MerchantMembership {
    /// The claim-year gate for one special-reward kind
    pub fn last_claim_year(&self, kind: SpecialRewardKind) -> Option<i64> {
        match kind {
            SpecialRewardKind::Birthday => self.last_birthday_claim_year,
            SpecialRewardKind::MemberAnniversary => self.last_member_anniversary_claim_year,
            SpecialRewardKind::RelationshipAnniversary => {
                self.last_relationship_anniversary_claim_year
            }
        }
    }
}
