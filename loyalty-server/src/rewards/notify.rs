//! Notification Seam
//!
//! Email/push delivery and the USDC relayer are external collaborators;
//! the core only fires and forgets. The trait keeps those integrations
//! out of the domain logic while tests can observe calls.

use async_trait::async_trait;

use shared::models::SpecialRewardKind;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// A special reward was granted (after commit)
    async fn special_reward_claimed(
        &self,
        merchant_id: i64,
        member_id: i64,
        kind: SpecialRewardKind,
        points: i64,
    );

    /// A USDC payout redemption was confirmed and awaits the relayer
    async fn payout_ready(&self, merchant_id: i64, member_id: i64, usdc_amount: f64);
}

/// Default notifier, structured log lines only
#[derive(Clone, Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn special_reward_claimed(
        &self,
        merchant_id: i64,
        member_id: i64,
        kind: SpecialRewardKind,
        points: i64,
    ) {
        tracing::info!(
            target: "notify",
            merchant_id,
            member_id,
            kind = ?kind,
            points,
            "special reward claimed"
        );
    }

    async fn payout_ready(&self, merchant_id: i64, member_id: i64, usdc_amount: f64) {
        tracing::info!(
            target: "notify",
            merchant_id,
            member_id,
            usdc_amount,
            "USDC payout ready for relayer"
        );
    }
}
