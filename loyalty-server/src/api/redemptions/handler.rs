//! Redemption API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::{CurrentMember, CurrentStaff};
use crate::core::ServerState;
use crate::db::repository::redemption;
use crate::rewards::CreatedRedemption;
use crate::utils::{AppError, AppResult};
use shared::models::RedemptionRequest;

#[derive(serde::Deserialize)]
pub struct CreateRedemption {
    pub merchant_id: i64,
    pub reward_id: i64,
    pub business_id: Option<i64>,
}

#[derive(serde::Deserialize)]
pub struct RedemptionCode {
    pub code: String,
}

/// POST /api/redemptions - 会员创建兑换会话
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentMember,
    Json(payload): Json<CreateRedemption>,
) -> AppResult<Json<CreatedRedemption>> {
    let created = state
        .redemptions
        .create(
            current.member_id,
            payload.merchant_id,
            payload.reward_id,
            payload.business_id,
        )
        .await?;
    Ok(Json(created))
}

/// GET /api/redemptions/:id - 会员查询自己的会话状态
pub async fn get_status(
    State(state): State<ServerState>,
    current: CurrentMember,
    Path(id): Path<i64>,
) -> AppResult<Json<RedemptionRequest>> {
    let session = state.redemptions.get_status(id).await?;
    // 非本人会话按不存在处理
    if session.member_id != current.member_id {
        return Err(AppError::not_found(format!("Redemption session {id}")));
    }
    Ok(Json(session))
}

/// POST /api/redemptions/:id/cancel - 会员取消待处理会话
pub async fn cancel(
    State(state): State<ServerState>,
    current: CurrentMember,
    Path(id): Path<i64>,
) -> AppResult<Json<RedemptionRequest>> {
    let session = state.redemptions.cancel(id, current.member_id).await?;
    Ok(Json(session))
}

/// 员工扫码路径共用的租户校验
///
/// 会话的 merchant 永不变更，所以确认前的只读校验不会与
/// 协调器内部的原子状态转换产生竞争。
async fn assert_staff_scope(
    state: &ServerState,
    staff: &CurrentStaff,
    code: &str,
) -> AppResult<()> {
    let mut conn = state.pool().acquire().await?;
    redemption::find_by_code(&mut conn, code)
        .await?
        .filter(|s| s.merchant_id == staff.merchant_id)
        .ok_or_else(|| AppError::not_found("Redemption code"))?;
    Ok(())
}

/// POST /api/redemptions/confirm - 员工确认兑换（执行扣分）
pub async fn confirm(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Json(payload): Json<RedemptionCode>,
) -> AppResult<Json<RedemptionRequest>> {
    assert_staff_scope(&state, &staff, &payload.code).await?;
    let session = state
        .redemptions
        .confirm(&payload.code, staff.staff_id)
        .await?;
    Ok(Json(session))
}

/// POST /api/redemptions/decline - 员工拒绝兑换
pub async fn decline(
    State(state): State<ServerState>,
    staff: CurrentStaff,
    Json(payload): Json<RedemptionCode>,
) -> AppResult<Json<RedemptionRequest>> {
    assert_staff_scope(&state, &staff, &payload.code).await?;
    let session = state
        .redemptions
        .decline(&payload.code, staff.staff_id)
        .await?;
    Ok(Json(session))
}
