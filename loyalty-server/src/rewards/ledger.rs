//! Points Ledger
//!
//! The single authority over `merchant_membership.points`. Every balance
//! mutation pairs the conditional balance UPDATE with one appended
//! `reward_transaction` row inside the same SQLite transaction. Both
//! happen or neither does, which is what keeps the signed ledger sum
//! equal to the live balance.

use sqlx::{SqliteConnection, SqlitePool};

use crate::db::repository::{membership, transaction};
use crate::utils::{AppError, AppResult};
use shared::models::{TransactionStatus, TransactionType};

#[derive(Clone, Debug)]
pub struct PointsLedger {
    pool: SqlitePool,
}

impl PointsLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply a signed delta to a membership balance.
    ///
    /// Fails with `InsufficientPoints` (carrying the shortfall) when a
    /// debit would take the balance negative, `NotFound` when the
    /// membership row does not exist. A write collision that survives
    /// the busy timeout is retried once. Returns the new balance.
    pub async fn apply_delta(
        &self,
        merchant_id: i64,
        member_id: i64,
        delta: i64,
        reason: &str,
        tx_type: TransactionType,
    ) -> AppResult<i64> {
        match self
            .try_apply_delta(merchant_id, member_id, delta, reason, tx_type)
            .await
        {
            Err(AppError::Conflict(_)) => {
                tracing::warn!(
                    merchant_id,
                    member_id,
                    "ledger hit a write collision, retrying once"
                );
                self.try_apply_delta(merchant_id, member_id, delta, reason, tx_type)
                    .await
            }
            other => other,
        }
    }

    async fn try_apply_delta(
        &self,
        merchant_id: i64,
        member_id: i64,
        delta: i64,
        reason: &str,
        tx_type: TransactionType,
    ) -> AppResult<i64> {
        let mut tx = self.pool.begin().await?;
        let balance =
            Self::apply_delta_on(&mut tx, merchant_id, member_id, delta, reason, tx_type).await?;
        tx.commit().await?;
        Ok(balance)
    }

    /// In-transaction delta application, for callers (the redemption
    /// coordinator, the claim service) that compose the debit with other
    /// writes in one atomic unit.
    pub async fn apply_delta_on(
        conn: &mut SqliteConnection,
        merchant_id: i64,
        member_id: i64,
        delta: i64,
        reason: &str,
        tx_type: TransactionType,
    ) -> AppResult<i64> {
        if delta.signum() * tx_type.direction() < 0 {
            return Err(AppError::validation(format!(
                "Delta {delta} contradicts transaction type direction"
            )));
        }

        let now = shared::util::now_millis();
        let rows = membership::apply_points_delta(conn, merchant_id, member_id, delta, now).await?;
        if rows == 0 {
            // Distinguish missing membership from over-draft
            return match membership::find_on(conn, merchant_id, member_id).await? {
                None => Err(AppError::not_found(format!(
                    "Membership for member {member_id} at merchant {merchant_id}"
                ))),
                Some(m) => Err(AppError::insufficient_points(-delta, m.points)),
            };
        }

        let status = match tx_type {
            TransactionType::Payout => TransactionStatus::Pending,
            _ => TransactionStatus::Completed,
        };
        transaction::append(
            conn,
            merchant_id,
            member_id,
            tx_type,
            delta.abs(),
            status,
            reason,
            now,
        )
        .await?;

        let membership = membership::find_on(conn, merchant_id, member_id)
            .await?
            .ok_or_else(|| AppError::internal("Membership vanished mid-transaction"))?;
        Ok(membership.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::transaction::signed_sum;

    async fn seeded_pool() -> SqlitePool {
        let db = DbService::in_memory().await.unwrap();
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
             VALUES (100, 1, 10, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    #[tokio::test]
    async fn credit_then_debit_updates_balance() {
        let pool = seeded_pool().await;
        let ledger = PointsLedger::new(pool.clone());

        let b = ledger
            .apply_delta(1, 10, 50, "visit", TransactionType::Earn)
            .await
            .unwrap();
        assert_eq!(b, 50);

        let b = ledger
            .apply_delta(1, 10, -20, "redemption", TransactionType::Redeem)
            .await
            .unwrap();
        assert_eq!(b, 30);
    }

    #[tokio::test]
    async fn overdraft_fails_with_shortfall_and_no_ledger_row() {
        let pool = seeded_pool().await;
        let ledger = PointsLedger::new(pool.clone());
        ledger
            .apply_delta(1, 10, 30, "visit", TransactionType::Earn)
            .await
            .unwrap();

        let err = ledger
            .apply_delta(1, 10, -50, "redemption", TransactionType::Redeem)
            .await
            .unwrap_err();
        match err {
            AppError::InsufficientPoints {
                required,
                available,
            } => {
                assert_eq!(required, 50);
                assert_eq!(available, 30);
            }
            other => panic!("expected InsufficientPoints, got {other:?}"),
        }

        // Failed debit must leave no trace: balance intact, no REDEEM row
        assert_eq!(signed_sum(&pool, 1, 10).await.unwrap(), 30);
    }

    #[tokio::test]
    async fn missing_membership_is_not_found() {
        let pool = seeded_pool().await;
        let ledger = PointsLedger::new(pool);
        let err = ledger
            .apply_delta(1, 999, 10, "visit", TransactionType::Earn)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn direction_mismatch_is_rejected() {
        let pool = seeded_pool().await;
        let ledger = PointsLedger::new(pool);
        let err = ledger
            .apply_delta(1, 10, -10, "typo", TransactionType::Earn)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn balance_conservation_over_mixed_sequence() {
        let pool = seeded_pool().await;
        let ledger = PointsLedger::new(pool.clone());

        for (delta, tx_type) in [
            (120, TransactionType::Earn),
            (-40, TransactionType::Redeem),
            (15, TransactionType::Adjust),
            (-30, TransactionType::Payout),
            (5, TransactionType::Earn),
        ] {
            ledger
                .apply_delta(1, 10, delta, "seq", tx_type)
                .await
                .unwrap();
        }

        let membership = crate::db::repository::membership::find(&pool, 1, 10)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(membership.points, 70);
        assert_eq!(signed_sum(&pool, 1, 10).await.unwrap(), membership.points);
    }
}
