//! Member Repository

use super::{RepoError, RepoResult};
use shared::models::{Member, MemberProfileUpdate};
use sqlx::SqlitePool;

const MEMBER_SELECT: &str = "SELECT id, name, email, wallet_address, birthday, \
    relationship_anniversary_date, is_active, created_at, updated_at FROM member";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Member>> {
    let sql = format!("{MEMBER_SELECT} WHERE id = ? AND is_active = 1");
    let row = sqlx::query_as::<_, Member>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Update the member-settable profile dates (birthday, relationship
/// anniversary). Identity fields are immutable and have no update path.
pub async fn update_profile(
    pool: &SqlitePool,
    id: i64,
    data: MemberProfileUpdate,
) -> RepoResult<Member> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE member SET birthday = COALESCE(?1, birthday), \
         relationship_anniversary_date = COALESCE(?2, relationship_anniversary_date), \
         updated_at = ?3 WHERE id = ?4 AND is_active = 1",
    )
    .bind(&data.birthday)
    .bind(&data.relationship_anniversary_date)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Member {id} not found")))
}
