//! Reward Transaction Repository
//!
//! Append-only: there is deliberately no update or delete here.

use super::RepoResult;
use shared::models::{RewardTransaction, TransactionStatus, TransactionType};
use sqlx::{SqliteConnection, SqlitePool};

const TRANSACTION_SELECT: &str = "SELECT id, merchant_id, member_id, tx_type, amount, status, \
    reason, created_at FROM reward_transaction";

/// Append one ledger row. `amount` must be the absolute value; the type
/// carries the direction.
pub async fn append(
    conn: &mut SqliteConnection,
    merchant_id: i64,
    member_id: i64,
    tx_type: TransactionType,
    amount: i64,
    status: TransactionStatus,
    reason: &str,
    now: i64,
) -> RepoResult<i64> {
    debug_assert!(amount >= 0);
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO reward_transaction \
         (id, merchant_id, member_id, tx_type, amount, status, reason, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(id)
    .bind(merchant_id)
    .bind(member_id)
    .bind(tx_type)
    .bind(amount)
    .bind(status)
    .bind(reason)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(id)
}

pub async fn list_recent(
    pool: &SqlitePool,
    merchant_id: i64,
    member_id: i64,
    limit: i64,
) -> RepoResult<Vec<RewardTransaction>> {
    let sql = format!(
        "{TRANSACTION_SELECT} WHERE merchant_id = ? AND member_id = ? \
         ORDER BY created_at DESC, id DESC LIMIT ?"
    );
    let rows = sqlx::query_as::<_, RewardTransaction>(&sql)
        .bind(merchant_id)
        .bind(member_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Signed sum of all rows for a membership; must equal the live
/// `merchant_membership.points` balance (the ledger conservation
/// invariant the tests assert).
pub async fn signed_sum(pool: &SqlitePool, merchant_id: i64, member_id: i64) -> RepoResult<i64> {
    let sum: Option<i64> = sqlx::query_scalar(
        "SELECT SUM(CASE WHEN tx_type IN ('EARN', 'ADJUST') THEN amount ELSE -amount END) \
         FROM reward_transaction WHERE merchant_id = ? AND member_id = ?",
    )
    .bind(merchant_id)
    .bind(member_id)
    .fetch_one(pool)
    .await?;
    Ok(sum.unwrap_or(0))
}
