//! Reward Catalog Repository

use super::RepoResult;
use shared::models::Reward;
use sqlx::SqlitePool;

const REWARD_SELECT: &str = "SELECT id, merchant_id, name, points_cost, reward_type, \
    usdc_amount, is_active, created_at, updated_at FROM reward";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Reward>> {
    let sql = format!("{REWARD_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Reward>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_active_for_merchant(
    pool: &SqlitePool,
    merchant_id: i64,
) -> RepoResult<Vec<Reward>> {
    let sql = format!("{REWARD_SELECT} WHERE merchant_id = ? AND is_active = 1 ORDER BY points_cost");
    let rows = sqlx::query_as::<_, Reward>(&sql)
        .bind(merchant_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
