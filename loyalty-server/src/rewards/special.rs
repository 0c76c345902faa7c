//! Special Reward Claims
//!
//! Once-per-year bonus grants (birthday, member anniversary,
//! relationship anniversary). Unlike catalog redemptions these are
//! instant: no QR, no staff step. The precondition ladder runs in a
//! fixed order so each failure kind keeps its own message, and the grant
//! itself is one transaction whose claim-year guard makes retries and
//! double-submits converge on a single credit per calendar year.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use sqlx::SqlitePool;

use crate::db::repository::{event, member, membership, merchant, redemption, reward, transaction};
use crate::rewards::claim_window;
use crate::rewards::notify::Notifier;
use crate::utils::{AppError, AppResult};
use shared::models::{
    Member, MonthDay, RedemptionStatus, SpecialRewardKind, TransactionStatus, TransactionType,
};

/// Bundled catalog reward granted alongside a claim
#[derive(Debug, Clone, serde::Serialize)]
pub struct RewardGrant {
    pub redemption_id: i64,
    pub reward_id: i64,
    pub reward_name: String,
}

/// Successful claim summary
#[derive(Debug, Clone, serde::Serialize)]
pub struct ClaimOutcome {
    pub kind: SpecialRewardKind,
    pub points_awarded: i64,
    pub total_points: i64,
    pub reward_grant: Option<RewardGrant>,
    pub message: String,
}

#[derive(Clone)]
pub struct SpecialRewardClaimService {
    pool: SqlitePool,
    notifier: Arc<dyn Notifier>,
}

impl SpecialRewardClaimService {
    pub fn new(pool: SqlitePool, notifier: Arc<dyn Notifier>) -> Self {
        Self { pool, notifier }
    }

    /// Claim a special reward now.
    pub async fn claim(
        &self,
        member_id: i64,
        merchant_id: i64,
        kind: SpecialRewardKind,
    ) -> AppResult<ClaimOutcome> {
        self.claim_at(member_id, merchant_id, kind, Utc::now()).await
    }

    /// Claim at an explicit instant (the seam the window tests use).
    /// A write collision that survives the busy timeout is retried once.
    pub async fn claim_at(
        &self,
        member_id: i64,
        merchant_id: i64,
        kind: SpecialRewardKind,
        now: DateTime<Utc>,
    ) -> AppResult<ClaimOutcome> {
        match self.try_claim_at(member_id, merchant_id, kind, now).await {
            Err(AppError::Conflict(_)) => {
                tracing::warn!(member_id, merchant_id, "claim hit a write collision, retrying once");
                self.try_claim_at(member_id, merchant_id, kind, now).await
            }
            other => other,
        }
    }

    async fn try_claim_at(
        &self,
        member_id: i64,
        merchant_id: i64,
        kind: SpecialRewardKind,
        now: DateTime<Utc>,
    ) -> AppResult<ClaimOutcome> {
        let merchant_row = merchant::find_by_id(&self.pool, merchant_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Merchant {merchant_id}")))?;
        let member_row = member::find_by_id(&self.pool, member_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Member {member_id}")))?;

        let anniversary = anchor_date(&member_row, kind)?;

        let settings = kind.settings(&merchant_row);
        if !settings.enabled {
            return Err(AppError::FeatureDisabled(format!(
                "{} rewards are not enabled for this merchant",
                kind_label(kind)
            )));
        }

        if !claim_window::is_within_window(anniversary, settings.window_days, now) {
            return Err(AppError::OutsideWindow(format!(
                "The {} claim window ({} days around the date) is not open",
                kind_label(kind),
                settings.window_days
            )));
        }

        let year = i64::from(now.year());
        if let Some(existing) = membership::find(&self.pool, merchant_id, member_id).await?
            && claim_window::has_claimed_this_year(existing.last_claim_year(kind), now)
        {
            return Err(AppError::AlreadyClaimed(format!(
                "The {} reward was already claimed this year",
                kind_label(kind)
            )));
        }

        // Optional bundled catalog reward; resolved before the
        // transaction so the write path stays short.
        let bundled = match settings.reward_id {
            Some(rid) => reward::find_by_id(&self.pool, rid)
                .await?
                .filter(|r| r.merchant_id == merchant_id && r.is_active),
            None => None,
        };

        let now_ms = shared::util::now_millis();
        let mut tx = self.pool.begin().await?;

        membership::ensure(&mut tx, merchant_id, member_id).await?;

        let rows = membership::claim_year_guarded_credit(
            &mut tx,
            merchant_id,
            member_id,
            kind,
            year,
            settings.points,
            now_ms,
        )
        .await?;
        if rows == 0 {
            // A concurrent request won the year guard
            return Err(AppError::AlreadyClaimed(format!(
                "The {} reward was already claimed this year",
                kind_label(kind)
            )));
        }

        transaction::append(
            &mut tx,
            merchant_id,
            member_id,
            TransactionType::Earn,
            settings.points,
            TransactionStatus::Completed,
            kind.reason(),
            now_ms,
        )
        .await?;

        let reward_grant = match &bundled {
            Some(r) => {
                let redemption_id = redemption::insert(
                    &mut tx,
                    redemption::NewRedemption {
                        member_id,
                        merchant_id,
                        business_id: None,
                        reward_id: r.id,
                        points_cost: 0,
                        qr_code_hash: shared::util::redemption_code(),
                        status: RedemptionStatus::Confirmed,
                        expires_at: now_ms,
                        confirmed_at: Some(now_ms),
                    },
                )
                .await?;
                Some(RewardGrant {
                    redemption_id,
                    reward_id: r.id,
                    reward_name: r.name.clone(),
                })
            }
            None => None,
        };

        event::append(
            &mut tx,
            merchant_id,
            Some(member_id),
            kind.event_type(),
            &serde_json::json!({
                "points": settings.points,
                "year": year,
                "bundledRewardId": bundled.as_ref().map(|r| r.id),
            }),
            now_ms,
        )
        .await?;

        let total_points = membership::find_on(&mut tx, merchant_id, member_id)
            .await?
            .map(|m| m.points)
            .ok_or_else(|| AppError::internal("Membership vanished mid-claim"))?;

        tx.commit().await?;

        self.notifier
            .special_reward_claimed(merchant_id, member_id, kind, settings.points)
            .await;

        Ok(ClaimOutcome {
            kind,
            points_awarded: settings.points,
            total_points,
            reward_grant,
            message: format!(
                "Happy {}! {} points added to your balance",
                kind_label(kind),
                settings.points
            ),
        })
    }
}

fn kind_label(kind: SpecialRewardKind) -> &'static str {
    match kind {
        SpecialRewardKind::Birthday => "birthday",
        SpecialRewardKind::MemberAnniversary => "member anniversary",
        SpecialRewardKind::RelationshipAnniversary => "relationship anniversary",
    }
}

/// The calendar anchor for a claim kind.
///
/// Birthday and relationship anniversary come from member-set profile
/// fields (missing → `ProfileIncomplete`); the member anniversary is the
/// signup date and therefore always present.
fn anchor_date(member_row: &Member, kind: SpecialRewardKind) -> AppResult<MonthDay> {
    match kind {
        SpecialRewardKind::Birthday => member_row
            .birthday
            .as_deref()
            .and_then(MonthDay::parse)
            .ok_or_else(|| {
                AppError::ProfileIncomplete("Set your birthday to claim this reward".into())
            }),
        SpecialRewardKind::RelationshipAnniversary => member_row
            .relationship_anniversary_date
            .as_deref()
            .and_then(MonthDay::parse)
            .ok_or_else(|| {
                AppError::ProfileIncomplete(
                    "Set your relationship anniversary to claim this reward".into(),
                )
            }),
        SpecialRewardKind::MemberAnniversary => Ok(MonthDay::from_millis(member_row.created_at)),
    }
}
