//! Redemption Coordinator
//!
//! Orchestrates the redemption session lifecycle:
//! `PENDING → {CONFIRMED, DECLINED, EXPIRED, CANCELED}`.
//!
//! Creation checks the balance without deducting; points only move when
//! staff confirm, inside one SQLite transaction that pairs the guarded
//! PENDING→CONFIRMED transition with the ledger debit. A debit that
//! fails because the balance dropped between create and confirm flips
//! the session to DECLINED instead.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::db::repository::{member, merchant, redemption, reward};
use crate::rewards::ledger::PointsLedger;
use crate::rewards::notify::Notifier;
use crate::utils::{AppError, AppResult};
use shared::models::{RedemptionRequest, RedemptionStatus, RewardType, TransactionType};

/// Default session lifetime: 10 minutes
pub const DEFAULT_REDEMPTION_TTL_MS: i64 = 10 * 60 * 1000;

/// What the member client needs to render the QR and poll
#[derive(Debug, Clone, serde::Serialize)]
pub struct CreatedRedemption {
    pub session_id: i64,
    pub code: String,
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct RedemptionCoordinator {
    pool: SqlitePool,
    ttl_ms: i64,
    notifier: Arc<dyn Notifier>,
}

impl RedemptionCoordinator {
    pub fn new(pool: SqlitePool, ttl_ms: i64, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            pool,
            ttl_ms,
            notifier,
        }
    }

    /// Open a redemption session for a catalog reward.
    ///
    /// Fails without persisting anything when the reward is ineligible
    /// or the member's balance is short (`InsufficientPoints` carries
    /// the shortfall).
    pub async fn create(
        &self,
        member_id: i64,
        merchant_id: i64,
        reward_id: i64,
        business_id: Option<i64>,
    ) -> AppResult<CreatedRedemption> {
        let merchant_row = merchant::find_by_id(&self.pool, merchant_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Merchant {merchant_id}")))?;
        member::find_by_id(&self.pool, member_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Member {member_id}")))?;

        let reward_row = reward::find_by_id(&self.pool, reward_id)
            .await?
            .filter(|r| r.merchant_id == merchant_id)
            .ok_or_else(|| AppError::not_found(format!("Reward {reward_id}")))?;
        if !reward_row.is_active {
            return Err(AppError::invalid_state(format!(
                "Reward '{}' is no longer available",
                reward_row.name
            )));
        }
        if reward_row.reward_type == RewardType::UsdcPayout && !merchant_row.usdc_payouts_enabled {
            return Err(AppError::FeatureDisabled(
                "USDC payouts are not enabled for this merchant".into(),
            ));
        }
        if let Some(bid) = business_id {
            merchant::find_business(&self.pool, bid)
                .await?
                .filter(|b| b.merchant_id == merchant_id)
                .ok_or_else(|| AppError::not_found(format!("Business {bid}")))?;
        }

        // Balance check only; the debit happens at confirmation
        let available = crate::db::repository::membership::find(&self.pool, merchant_id, member_id)
            .await?
            .map(|m| m.points)
            .unwrap_or(0);
        if available < reward_row.points_cost {
            return Err(AppError::insufficient_points(
                reward_row.points_cost,
                available,
            ));
        }

        let code = shared::util::redemption_code();
        let now = shared::util::now_millis();
        let expires_at = now + self.ttl_ms;

        let mut conn = self.pool.acquire().await?;
        let session_id = redemption::insert(
            &mut conn,
            redemption::NewRedemption {
                member_id,
                merchant_id,
                business_id,
                reward_id,
                points_cost: reward_row.points_cost,
                qr_code_hash: code.clone(),
                status: RedemptionStatus::Pending,
                expires_at,
                confirmed_at: None,
            },
        )
        .await?;

        tracing::info!(session_id, member_id, merchant_id, reward_id, "redemption session created");

        Ok(CreatedRedemption {
            session_id,
            code,
            expires_at,
        })
    }

    /// Staff confirmation: debit points and finalize the session.
    ///
    /// At most one concurrent confirm per code can succeed; losers see
    /// `InvalidState` (or `Expired`), and a balance that dropped since
    /// creation surfaces as `InsufficientPoints` with the session
    /// DECLINED. A write collision that survives the busy timeout is
    /// retried once before surfacing as `Conflict`.
    pub async fn confirm(&self, code: &str, staff_actor_id: i64) -> AppResult<RedemptionRequest> {
        match self.try_confirm(code, staff_actor_id).await {
            Err(AppError::Conflict(_)) => {
                tracing::warn!(code, "confirm hit a write collision, retrying once");
                self.try_confirm(code, staff_actor_id).await
            }
            other => other,
        }
    }

    async fn try_confirm(&self, code: &str, staff_actor_id: i64) -> AppResult<RedemptionRequest> {
        let now = shared::util::now_millis();

        // Pre-read outside any transaction; the PENDING-guarded
        // transition below re-checks the state under the write lock.
        let session = {
            let mut conn = self.pool.acquire().await?;
            redemption::find_by_code(&mut conn, code)
                .await?
                .ok_or_else(|| AppError::not_found("Redemption code"))?
        };

        match session.status {
            RedemptionStatus::Pending => {}
            RedemptionStatus::Expired => {
                return Err(AppError::expired("Redemption session has expired"));
            }
            other => {
                return Err(AppError::invalid_state(format!(
                    "Redemption session already {other:?}"
                )));
            }
        }

        // Expiry is re-checked here even if the sweep hasn't run yet:
        // a past-due session can never become CONFIRMED.
        if now > session.expires_at {
            redemption::expire_if_due(&self.pool, session.id, now).await?;
            return Err(AppError::expired("Redemption session has expired"));
        }

        let reward_row = reward::find_by_id(&self.pool, session.reward_id)
            .await?
            .ok_or_else(|| AppError::internal("Reward row missing for existing session"))?;
        let (tx_type, reason) = match reward_row.reward_type {
            RewardType::UsdcPayout => (TransactionType::Payout, "usdc payout"),
            RewardType::Traditional => (TransactionType::Redeem, "redemption"),
        };

        // The debit UPDATE is the transaction's first statement, so the
        // write lock is taken up front; a transaction that reads before
        // writing can fail the snapshot upgrade under WAL instead of
        // waiting on the busy timeout.
        let mut tx = self.pool.begin().await?;
        match PointsLedger::apply_delta_on(
            &mut tx,
            session.merchant_id,
            session.member_id,
            -session.points_cost,
            reason,
            tx_type,
        )
        .await
        {
            Ok(_) => {}
            Err(err @ AppError::InsufficientPoints { .. }) => {
                // Balance dropped between create and confirm: the
                // session is unusable; record the decline and surface
                // the shortfall.
                redemption::transition(&mut tx, session.id, RedemptionStatus::Declined, None, now)
                    .await?;
                tx.commit().await?;
                return Err(err);
            }
            Err(err) => return Err(err),
        }

        let rows =
            redemption::transition(&mut tx, session.id, RedemptionStatus::Confirmed, Some(now), now)
                .await?;
        if rows == 0 {
            // Lost the PENDING→CONFIRMED race; dropping tx rolls the
            // debit back.
            drop(tx);
            return Err(self.already_processed(session.id).await);
        }

        tx.commit().await?;

        tracing::info!(
            session_id = session.id,
            staff_actor_id,
            points = session.points_cost,
            "redemption confirmed"
        );

        if let (RewardType::UsdcPayout, Some(amount)) =
            (reward_row.reward_type, reward_row.usdc_amount)
        {
            self.notifier
                .payout_ready(session.merchant_id, session.member_id, amount)
                .await;
        }

        redemption::find_by_id(&self.pool, session.id)
            .await?
            .ok_or_else(|| AppError::internal("Session vanished after confirm"))
    }

    /// Staff decline: PENDING → DECLINED, points untouched.
    pub async fn decline(&self, code: &str, staff_actor_id: i64) -> AppResult<RedemptionRequest> {
        match self.try_decline(code, staff_actor_id).await {
            Err(AppError::Conflict(_)) => {
                tracing::warn!(code, "decline hit a write collision, retrying once");
                self.try_decline(code, staff_actor_id).await
            }
            other => other,
        }
    }

    async fn try_decline(&self, code: &str, staff_actor_id: i64) -> AppResult<RedemptionRequest> {
        let now = shared::util::now_millis();

        let session = {
            let mut conn = self.pool.acquire().await?;
            redemption::find_by_code(&mut conn, code)
                .await?
                .ok_or_else(|| AppError::not_found("Redemption code"))?
        };
        match session.status {
            RedemptionStatus::Pending => {}
            RedemptionStatus::Expired => {
                return Err(AppError::expired("Redemption session has expired"));
            }
            other => {
                return Err(AppError::invalid_state(format!(
                    "Redemption session already {other:?}"
                )));
            }
        }
        if now > session.expires_at {
            redemption::expire_if_due(&self.pool, session.id, now).await?;
            return Err(AppError::expired("Redemption session has expired"));
        }

        // A single guarded UPDATE; no transaction needed.
        let mut conn = self.pool.acquire().await?;
        let rows =
            redemption::transition(&mut conn, session.id, RedemptionStatus::Declined, None, now)
                .await?;
        drop(conn);
        if rows == 0 {
            return Err(self.already_processed(session.id).await);
        }

        tracing::info!(session_id = session.id, staff_actor_id, "redemption declined");

        redemption::find_by_id(&self.pool, session.id)
            .await?
            .ok_or_else(|| AppError::internal("Session vanished after decline"))
    }

    /// Member cancellation: PENDING → CANCELED, owner only.
    pub async fn cancel(&self, session_id: i64, member_id: i64) -> AppResult<RedemptionRequest> {
        match self.try_cancel(session_id, member_id).await {
            Err(AppError::Conflict(_)) => {
                tracing::warn!(session_id, "cancel hit a write collision, retrying once");
                self.try_cancel(session_id, member_id).await
            }
            other => other,
        }
    }

    async fn try_cancel(&self, session_id: i64, member_id: i64) -> AppResult<RedemptionRequest> {
        let now = shared::util::now_millis();

        let session = redemption::find_by_id(&self.pool, session_id)
            .await?
            // A foreign member learns nothing about the session
            .filter(|s| s.member_id == member_id)
            .ok_or_else(|| AppError::not_found(format!("Redemption session {session_id}")))?;

        match session.status {
            RedemptionStatus::Pending => {}
            RedemptionStatus::Expired => {
                return Err(AppError::expired("Redemption session has expired"));
            }
            other => {
                return Err(AppError::invalid_state(format!(
                    "Redemption session already {other:?}"
                )));
            }
        }
        if now > session.expires_at {
            redemption::expire_if_due(&self.pool, session.id, now).await?;
            return Err(AppError::expired("Redemption session has expired"));
        }

        let mut conn = self.pool.acquire().await?;
        let rows = redemption::transition_if_owner(
            &mut conn,
            session_id,
            member_id,
            RedemptionStatus::Canceled,
            now,
        )
        .await?;
        drop(conn);
        if rows == 0 {
            return Err(self.already_processed(session_id).await);
        }

        redemption::find_by_id(&self.pool, session_id)
            .await?
            .ok_or_else(|| AppError::internal("Session vanished after cancel"))
    }

    /// Shape the error for a session that refused a PENDING-guarded
    /// transition: another actor got there first, so re-read and report
    /// what it became.
    async fn already_processed(&self, session_id: i64) -> AppError {
        match redemption::find_by_id(&self.pool, session_id).await {
            Ok(Some(s)) if s.status == RedemptionStatus::Expired => {
                AppError::expired("Redemption session has expired")
            }
            Ok(_) => AppError::invalid_state("Redemption session was already processed"),
            Err(err) => err.into(),
        }
    }

    /// Member-facing poll. Side-effect-free except lazy expiry.
    pub async fn get_status(&self, session_id: i64) -> AppResult<RedemptionRequest> {
        let now = shared::util::now_millis();
        redemption::expire_if_due(&self.pool, session_id, now).await?;
        redemption::find_by_id(&self.pool, session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Redemption session {session_id}")))
    }

    /// Background sweep: expire every past-due PENDING session.
    pub async fn expiry_sweep(&self, now: i64) -> AppResult<u64> {
        let expired = redemption::expire_due(&self.pool, now).await?;
        if expired > 0 {
            tracing::info!(expired, "redemption expiry sweep");
        }
        Ok(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{membership, transaction};
    use crate::rewards::notify::LogNotifier;

    async fn seeded() -> (SqlitePool, RedemptionCoordinator) {
        let db = DbService::in_memory().await.unwrap();
        let pool = db.pool;
        sqlx::query(
            "INSERT INTO merchant (id, name, usdc_payouts_enabled) VALUES (1, 'Cafe Uno', 1)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO member (id, name) VALUES (10, 'Alice'), (11, 'Bob')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO merchant_membership (id, merchant_id, member_id, points) \
             VALUES (100, 1, 10, 80)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO reward (id, merchant_id, name, points_cost, reward_type, usdc_amount, is_active) VALUES \
             (201, 1, 'Free Coffee', 50, 'TRADITIONAL', NULL, 1), \
             (202, 1, 'Gold Mug', 100, 'TRADITIONAL', NULL, 1), \
             (203, 1, 'Retired', 10, 'TRADITIONAL', NULL, 0), \
             (204, 1, 'Cash Out', 50, 'USDC_PAYOUT', 5.0, 1)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let coordinator = RedemptionCoordinator::new(
            pool.clone(),
            DEFAULT_REDEMPTION_TTL_MS,
            Arc::new(LogNotifier),
        );
        (pool, coordinator)
    }

    async fn session_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM redemption_request")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn balance(pool: &SqlitePool) -> i64 {
        membership::find(pool, 1, 10).await.unwrap().unwrap().points
    }

    async fn force_expiry(pool: &SqlitePool, session_id: i64) {
        sqlx::query("UPDATE redemption_request SET expires_at = ?1 WHERE id = ?2")
            .bind(shared::util::now_millis() - 1_000)
            .bind(session_id)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_returns_code_and_deadline_without_debiting() {
        let (pool, coordinator) = seeded().await;
        let created = coordinator.create(10, 1, 201, None).await.unwrap();

        assert_eq!(created.code.len(), 64);
        assert!(created.expires_at > shared::util::now_millis());
        // Creation never moves points
        assert_eq!(balance(&pool).await, 80);

        let session = coordinator.get_status(created.session_id).await.unwrap();
        assert_eq!(session.status, RedemptionStatus::Pending);
        assert_eq!(session.points_cost, 50);
    }

    #[tokio::test]
    async fn create_with_insufficient_balance_leaves_no_row() {
        let (pool, coordinator) = seeded().await;
        // Gold Mug costs 100, Alice has 80
        let err = coordinator.create(10, 1, 202, None).await.unwrap_err();
        match err {
            AppError::InsufficientPoints {
                required,
                available,
            } => {
                assert_eq!((required, available), (100, 80));
            }
            other => panic!("expected InsufficientPoints, got {other:?}"),
        }
        assert_eq!(session_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn create_rejects_inactive_reward_and_unknown_refs() {
        let (_pool, coordinator) = seeded().await;
        assert!(matches!(
            coordinator.create(10, 1, 203, None).await.unwrap_err(),
            AppError::InvalidState(_)
        ));
        assert!(matches!(
            coordinator.create(10, 1, 999, None).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            coordinator.create(999, 1, 201, None).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            coordinator.create(10, 999, 201, None).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn confirm_debits_and_finalizes() {
        let (pool, coordinator) = seeded().await;
        let created = coordinator.create(10, 1, 201, None).await.unwrap();

        let session = coordinator.confirm(&created.code, 7).await.unwrap();
        assert_eq!(session.status, RedemptionStatus::Confirmed);
        assert!(session.confirmed_at.is_some());
        assert_eq!(balance(&pool).await, 30);
        // Ledger row matches the balance change
        assert_eq!(transaction::signed_sum(&pool, 1, 10).await.unwrap(), -50);
    }

    #[tokio::test]
    async fn confirm_is_at_most_once() {
        let (pool, coordinator) = seeded().await;
        let created = coordinator.create(10, 1, 201, None).await.unwrap();

        coordinator.confirm(&created.code, 7).await.unwrap();
        let err = coordinator.confirm(&created.code, 8).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        // Only one debit
        assert_eq!(balance(&pool).await, 30);
    }

    #[tokio::test]
    async fn confirm_after_deadline_expires_session_and_keeps_balance() {
        let (pool, coordinator) = seeded().await;
        let created = coordinator.create(10, 1, 201, None).await.unwrap();
        force_expiry(&pool, created.session_id).await;

        let err = coordinator.confirm(&created.code, 7).await.unwrap_err();
        assert!(matches!(err, AppError::Expired(_)));

        let session = coordinator.get_status(created.session_id).await.unwrap();
        assert_eq!(session.status, RedemptionStatus::Expired);
        assert_eq!(balance(&pool).await, 80);

        // Expiry is terminal: a later confirm can never succeed
        let err = coordinator.confirm(&created.code, 7).await.unwrap_err();
        assert!(matches!(err, AppError::Expired(_)));
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let (_pool, coordinator) = seeded().await;
        let err = coordinator.confirm("deadbeef", 7).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn decline_leaves_points_untouched() {
        let (pool, coordinator) = seeded().await;
        let created = coordinator.create(10, 1, 201, None).await.unwrap();

        let session = coordinator.decline(&created.code, 7).await.unwrap();
        assert_eq!(session.status, RedemptionStatus::Declined);
        assert_eq!(balance(&pool).await, 80);

        // Terminal: no confirm after decline
        let err = coordinator.confirm(&created.code, 7).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn cancel_is_owner_only() {
        let (pool, coordinator) = seeded().await;
        let created = coordinator.create(10, 1, 201, None).await.unwrap();

        // Bob cannot cancel Alice's session, and learns nothing about it
        let err = coordinator.cancel(created.session_id, 11).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let session = coordinator.cancel(created.session_id, 10).await.unwrap();
        assert_eq!(session.status, RedemptionStatus::Canceled);
        assert_eq!(balance(&pool).await, 80);
    }

    #[tokio::test]
    async fn stale_second_session_declines_on_confirm() {
        let (pool, coordinator) = seeded().await;
        // Drop Alice to exactly one reward's worth of points
        sqlx::query("UPDATE merchant_membership SET points = 50 WHERE id = 100")
            .execute(&pool)
            .await
            .unwrap();

        // Both creations see balance 50; creation doesn't deduct
        let first = coordinator.create(10, 1, 201, None).await.unwrap();
        let second = coordinator.create(10, 1, 201, None).await.unwrap();

        coordinator.confirm(&first.code, 7).await.unwrap();
        assert_eq!(balance(&pool).await, 0);

        let err = coordinator.confirm(&second.code, 7).await.unwrap_err();
        match err {
            AppError::InsufficientPoints {
                required,
                available,
            } => assert_eq!((required, available), (50, 0)),
            other => panic!("expected InsufficientPoints, got {other:?}"),
        }
        // The losing session is recorded as DECLINED; balance never negative
        let session = coordinator.get_status(second.session_id).await.unwrap();
        assert_eq!(session.status, RedemptionStatus::Declined);
        assert_eq!(balance(&pool).await, 0);
        assert_eq!(transaction::signed_sum(&pool, 1, 10).await.unwrap(), -50);
    }

    #[tokio::test]
    async fn usdc_payout_records_payout_transaction() {
        let (pool, coordinator) = seeded().await;
        let created = coordinator.create(10, 1, 204, None).await.unwrap();
        coordinator.confirm(&created.code, 7).await.unwrap();

        assert_eq!(balance(&pool).await, 30);
        let rows = transaction::list_recent(&pool, 1, 10, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tx_type, shared::models::TransactionType::Payout);
        assert_eq!(rows[0].status, shared::models::TransactionStatus::Pending);
        assert_eq!(rows[0].amount, 50);
    }

    #[tokio::test]
    async fn usdc_reward_requires_merchant_capability() {
        let (pool, coordinator) = seeded().await;
        sqlx::query("UPDATE merchant SET usdc_payouts_enabled = 0 WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();
        let err = coordinator.create(10, 1, 204, None).await.unwrap_err();
        assert!(matches!(err, AppError::FeatureDisabled(_)));
    }

    // The in-memory pool is capped at one connection, which serializes
    // every write; racing confirms needs a file-backed pool.
    #[tokio::test]
    async fn concurrent_confirms_settle_to_one_winner() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("loyalty.db");
        let db = DbService::new(db_path.to_str().unwrap()).await.unwrap();
        let pool = db.pool;
        sqlx::query("INSERT INTO merchant (id, name) VALUES (1, 'Cafe Uno')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO member (id, name) VALUES (10, 'Alice')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO merchant_membership (id, merchant_id, member_id, points) \
             VALUES (100, 1, 10, 10000)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO reward (id, merchant_id, name, points_cost, reward_type, usdc_amount, is_active) \
             VALUES (201, 1, 'Free Coffee', 50, 'TRADITIONAL', NULL, 1)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let coordinator = RedemptionCoordinator::new(
            pool.clone(),
            DEFAULT_REDEMPTION_TTL_MS,
            Arc::new(LogNotifier),
        );

        for round in 0i64..25 {
            let created = coordinator.create(10, 1, 201, None).await.unwrap();
            let (a, b) = tokio::join!(
                coordinator.confirm(&created.code, 7),
                coordinator.confirm(&created.code, 8)
            );

            let results = [a, b];
            assert_eq!(
                results.iter().filter(|r| r.is_ok()).count(),
                1,
                "round {round}: exactly one confirm wins"
            );
            for result in results {
                if let Err(err) = result {
                    // The loser gets a state error, never a raw
                    // database failure.
                    assert!(
                        matches!(err, AppError::InvalidState(_) | AppError::Expired(_)),
                        "round {round}: loser saw {err:?}"
                    );
                }
            }
            // One debit per session regardless of the race outcome
            assert_eq!(balance(&pool).await, 10_000 - 50 * (round + 1));
        }
    }

    #[tokio::test]
    async fn sweep_expires_all_due_sessions() {
        let (pool, coordinator) = seeded().await;
        let a = coordinator.create(10, 1, 201, None).await.unwrap();
        let b = coordinator.create(10, 1, 201, None).await.unwrap();
        let live = coordinator.create(10, 1, 201, None).await.unwrap();
        force_expiry(&pool, a.session_id).await;
        force_expiry(&pool, b.session_id).await;

        let expired = coordinator
            .expiry_sweep(shared::util::now_millis())
            .await
            .unwrap();
        assert_eq!(expired, 2);

        let still_pending = coordinator.get_status(live.session_id).await.unwrap();
        assert_eq!(still_pending.status, RedemptionStatus::Pending);
    }
}
