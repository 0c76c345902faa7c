//! Membership API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentMember;
use crate::core::ServerState;
use crate::db::repository::{member, membership, reward, transaction};
use crate::utils::{AppError, AppResult};
use shared::models::{Member, MemberProfileUpdate, MerchantMembership, Reward, RewardTransaction};

const RECENT_TRANSACTIONS: i64 = 20;

/// Membership detail response (membership + recent ledger rows)
#[derive(serde::Serialize)]
pub struct MembershipDetail {
    #[serde(flatten)]
    pub membership: MerchantMembership,
    pub recent_transactions: Vec<RewardTransaction>,
}

/// GET /api/memberships/:merchant_id - 查询本人在某商户的会员关系
pub async fn get_membership(
    State(state): State<ServerState>,
    current: CurrentMember,
    Path(merchant_id): Path<i64>,
) -> AppResult<Json<MembershipDetail>> {
    let membership = membership::find(state.pool(), merchant_id, current.member_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!(
                "Membership for merchant {merchant_id} not found"
            ))
        })?;

    let recent_transactions = transaction::list_recent(
        state.pool(),
        merchant_id,
        current.member_id,
        RECENT_TRANSACTIONS,
    )
    .await?;

    Ok(Json(MembershipDetail {
        membership,
        recent_transactions,
    }))
}

/// GET /api/merchants/:merchant_id/rewards - 可兑换奖励目录
pub async fn list_rewards(
    State(state): State<ServerState>,
    _current: CurrentMember,
    Path(merchant_id): Path<i64>,
) -> AppResult<Json<Vec<Reward>>> {
    let rewards = reward::find_active_for_merchant(state.pool(), merchant_id).await?;
    Ok(Json(rewards))
}

/// PUT /api/members/profile - 更新生日/恋爱纪念日
///
/// 日期字段在落库前做格式校验，避免写入永远无法命中
/// 领取窗口的脏数据。
pub async fn update_profile(
    State(state): State<ServerState>,
    current: CurrentMember,
    Json(payload): Json<MemberProfileUpdate>,
) -> AppResult<Json<Member>> {
    if let Some(birthday) = &payload.birthday
        && shared::models::MonthDay::parse(birthday).is_none()
    {
        return Err(AppError::validation(format!(
            "Invalid birthday '{birthday}', expected MM-DD"
        )));
    }
    if let Some(date) = &payload.relationship_anniversary_date
        && shared::models::MonthDay::parse(date).is_none()
    {
        return Err(AppError::validation(format!(
            "Invalid anniversary date '{date}', expected YYYY-MM-DD"
        )));
    }

    let updated = member::update_profile(state.pool(), current.member_id, payload).await?;
    Ok(Json(updated))
}
