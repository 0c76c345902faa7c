//! Redemption Request Repository
//!
//! Sessions are never deleted; terminal rows stay as the audit record.
//! All state transitions are conditional on `status = 'PENDING'`, which
//! is what makes each terminal state reachable at most once.

use super::RepoResult;
use shared::models::{RedemptionRequest, RedemptionStatus};
use sqlx::{SqliteConnection, SqlitePool};

const REDEMPTION_SELECT: &str = "SELECT id, member_id, merchant_id, business_id, reward_id, \
    points_cost, qr_code_hash, status, expires_at, confirmed_at, created_at, updated_at \
    FROM redemption_request";

/// Insert parameters for a new session row
pub struct NewRedemption {
    pub member_id: i64,
    pub merchant_id: i64,
    pub business_id: Option<i64>,
    pub reward_id: i64,
    pub points_cost: i64,
    pub qr_code_hash: String,
    pub status: RedemptionStatus,
    pub expires_at: i64,
    pub confirmed_at: Option<i64>,
}

pub async fn insert(conn: &mut SqliteConnection, data: NewRedemption) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO redemption_request \
         (id, member_id, merchant_id, business_id, reward_id, points_cost, qr_code_hash, \
          status, expires_at, confirmed_at, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
    )
    .bind(id)
    .bind(data.member_id)
    .bind(data.merchant_id)
    .bind(data.business_id)
    .bind(data.reward_id)
    .bind(data.points_cost)
    .bind(&data.qr_code_hash)
    .bind(data.status)
    .bind(data.expires_at)
    .bind(data.confirmed_at)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(id)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<RedemptionRequest>> {
    let sql = format!("{REDEMPTION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, RedemptionRequest>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Lookup by the bearer code
pub async fn find_by_code(
    conn: &mut SqliteConnection,
    code: &str,
) -> RepoResult<Option<RedemptionRequest>> {
    let sql = format!("{REDEMPTION_SELECT} WHERE qr_code_hash = ?");
    let row = sqlx::query_as::<_, RedemptionRequest>(&sql)
        .bind(code)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Transition PENDING → `to`. Returns 0 if the session already left
/// PENDING (lost race or terminal); the caller maps that to
/// `InvalidState`.
pub async fn transition(
    conn: &mut SqliteConnection,
    id: i64,
    to: RedemptionStatus,
    confirmed_at: Option<i64>,
    now: i64,
) -> RepoResult<u64> {
    let res = sqlx::query(
        "UPDATE redemption_request SET status = ?1, confirmed_at = COALESCE(?2, confirmed_at), \
         updated_at = ?3 WHERE id = ?4 AND status = 'PENDING'",
    )
    .bind(to)
    .bind(confirmed_at)
    .bind(now)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(res.rows_affected())
}

/// Owner-scoped transition (member cancellation)
pub async fn transition_if_owner(
    conn: &mut SqliteConnection,
    id: i64,
    member_id: i64,
    to: RedemptionStatus,
    now: i64,
) -> RepoResult<u64> {
    let res = sqlx::query(
        "UPDATE redemption_request SET status = ?1, updated_at = ?2 \
         WHERE id = ?3 AND member_id = ?4 AND status = 'PENDING'",
    )
    .bind(to)
    .bind(now)
    .bind(id)
    .bind(member_id)
    .execute(conn)
    .await?;
    Ok(res.rows_affected())
}

/// Lazy expiry for a single session, used on status reads
pub async fn expire_if_due(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<u64> {
    let res = sqlx::query(
        "UPDATE redemption_request SET status = 'EXPIRED', updated_at = ?1 \
         WHERE id = ?2 AND status = 'PENDING' AND expires_at < ?1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

/// Bulk lazy-expiry sweep: all PENDING sessions past their deadline
pub async fn expire_due(pool: &SqlitePool, now: i64) -> RepoResult<u64> {
    let res = sqlx::query(
        "UPDATE redemption_request SET status = 'EXPIRED', updated_at = ?1 \
         WHERE status = 'PENDING' AND expires_at < ?1",
    )
    .bind(now)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}
