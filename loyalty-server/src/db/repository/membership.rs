//! Merchant Membership Repository
//!
//! The points balance is the only shared mutable resource in the core,
//! so every write here is a conditional UPDATE whose WHERE clause is the
//! concurrency guard, evaluated atomically by SQLite.

use super::RepoResult;
use shared::models::{MerchantMembership, SpecialRewardKind};
use sqlx::{SqliteConnection, SqlitePool};

const MEMBERSHIP_SELECT: &str = "SELECT id, merchant_id, member_id, points, tier, \
    last_birthday_claim_year, last_member_anniversary_claim_year, \
    last_relationship_anniversary_claim_year, created_at, updated_at FROM merchant_membership";

fn claim_year_column(kind: SpecialRewardKind) -> &'static str {
    match kind {
        SpecialRewardKind::Birthday => "last_birthday_claim_year",
        SpecialRewardKind::MemberAnniversary => "last_member_anniversary_claim_year",
        SpecialRewardKind::RelationshipAnniversary => "last_relationship_anniversary_claim_year",
    }
}

pub async fn find(
    pool: &SqlitePool,
    merchant_id: i64,
    member_id: i64,
) -> RepoResult<Option<MerchantMembership>> {
    let sql = format!("{MEMBERSHIP_SELECT} WHERE merchant_id = ? AND member_id = ?");
    let row = sqlx::query_as::<_, MerchantMembership>(&sql)
        .bind(merchant_id)
        .bind(member_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// In-transaction variant of [`find`]
pub async fn find_on(
    conn: &mut SqliteConnection,
    merchant_id: i64,
    member_id: i64,
) -> RepoResult<Option<MerchantMembership>> {
    let sql = format!("{MEMBERSHIP_SELECT} WHERE merchant_id = ? AND member_id = ?");
    let row = sqlx::query_as::<_, MerchantMembership>(&sql)
        .bind(merchant_id)
        .bind(member_id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Lazily create the membership row (zero points, BASE tier).
///
/// INSERT OR IGNORE: the UNIQUE(merchant_id, member_id) constraint makes
/// concurrent first interactions converge on one row.
pub async fn ensure(
    conn: &mut SqliteConnection,
    merchant_id: i64,
    member_id: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT OR IGNORE INTO merchant_membership \
         (id, merchant_id, member_id, points, tier, created_at, updated_at) \
         VALUES (?1, ?2, ?3, 0, 'BASE', ?4, ?4)",
    )
    .bind(id)
    .bind(merchant_id)
    .bind(member_id)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

/// Apply a signed points delta, guarded against over-draft.
///
/// Returns the affected row count: 0 means either the membership row is
/// missing or `points + delta` would go negative; the caller
/// distinguishes by reading the row.
pub async fn apply_points_delta(
    conn: &mut SqliteConnection,
    merchant_id: i64,
    member_id: i64,
    delta: i64,
    now: i64,
) -> RepoResult<u64> {
    let res = sqlx::query(
        "UPDATE merchant_membership SET points = points + ?1, updated_at = ?2 \
         WHERE merchant_id = ?3 AND member_id = ?4 AND points + ?1 >= 0",
    )
    .bind(delta)
    .bind(now)
    .bind(merchant_id)
    .bind(member_id)
    .execute(conn)
    .await?;
    Ok(res.rows_affected())
}

/// Credit special-reward points and stamp the claim year in one guarded
/// UPDATE.
///
/// The `IS NULL OR < year` guard is the once-per-calendar-year invariant:
/// two simultaneous claims race on this statement and exactly one wins
/// (claim years only ever increase).
pub async fn claim_year_guarded_credit(
    conn: &mut SqliteConnection,
    merchant_id: i64,
    member_id: i64,
    kind: SpecialRewardKind,
    year: i64,
    points: i64,
    now: i64,
) -> RepoResult<u64> {
    let col = claim_year_column(kind);
    let sql = format!(
        "UPDATE merchant_membership SET points = points + ?1, {col} = ?2, updated_at = ?3 \
         WHERE merchant_id = ?4 AND member_id = ?5 AND ({col} IS NULL OR {col} < ?2)"
    );
    let res = sqlx::query(&sql)
        .bind(points)
        .bind(year)
        .bind(now)
        .bind(merchant_id)
        .bind(member_id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}
