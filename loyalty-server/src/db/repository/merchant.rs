//! Merchant Repository
//!
//! Read-mostly from the core's perspective; merchant settings are
//! mutated by the (out-of-scope) settings surface, consumed here.

use super::RepoResult;
use shared::models::{Business, Merchant};
use sqlx::SqlitePool;

const MERCHANT_SELECT: &str = "SELECT id, name, usdc_payouts_enabled, \
    birthday_reward_enabled, birthday_reward_points, birthday_window_days, birthday_reward_id, \
    member_anniversary_reward_enabled, member_anniversary_reward_points, member_anniversary_window_days, member_anniversary_reward_id, \
    relationship_anniversary_reward_enabled, relationship_anniversary_reward_points, relationship_anniversary_window_days, relationship_anniversary_reward_id, \
    is_active, created_at, updated_at FROM merchant";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Merchant>> {
    let sql = format!("{MERCHANT_SELECT} WHERE id = ? AND is_active = 1");
    let row = sqlx::query_as::<_, Merchant>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_business(pool: &SqlitePool, id: i64) -> RepoResult<Option<Business>> {
    let row = sqlx::query_as::<_, Business>(
        "SELECT id, merchant_id, name, is_active, created_at, updated_at FROM business WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
