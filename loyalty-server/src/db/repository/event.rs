//! Audit Event Repository (append-only)

use super::RepoResult;
use shared::models::Event;
use sqlx::{SqliteConnection, SqlitePool};

pub async fn append(
    conn: &mut SqliteConnection,
    merchant_id: i64,
    member_id: Option<i64>,
    event_type: &str,
    metadata: &serde_json::Value,
    now: i64,
) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO event (id, merchant_id, member_id, event_type, metadata, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(merchant_id)
    .bind(member_id)
    .bind(event_type)
    .bind(metadata.to_string())
    .bind(now)
    .execute(conn)
    .await?;
    Ok(id)
}

pub async fn list_for_merchant(
    pool: &SqlitePool,
    merchant_id: i64,
    limit: i64,
) -> RepoResult<Vec<Event>> {
    let rows = sqlx::query_as::<_, Event>(
        "SELECT id, merchant_id, member_id, event_type, metadata, created_at FROM event \
         WHERE merchant_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
    )
    .bind(merchant_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
