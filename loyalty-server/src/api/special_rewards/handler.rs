//! Special Reward API Handlers

use axum::{Json, extract::State};

use crate::auth::CurrentMember;
use crate::core::ServerState;
use crate::rewards::ClaimOutcome;
use crate::utils::AppResult;
use shared::models::SpecialRewardKind;

#[derive(serde::Deserialize)]
pub struct ClaimRequest {
    pub merchant_id: i64,
    pub kind: SpecialRewardKind,
}

/// POST /api/special-rewards/claim - 领取生日/周年奖励
pub async fn claim(
    State(state): State<ServerState>,
    current: CurrentMember,
    Json(payload): Json<ClaimRequest>,
) -> AppResult<Json<ClaimOutcome>> {
    let outcome = state
        .special_rewards
        .claim(current.member_id, payload.merchant_id, payload.kind)
        .await?;
    Ok(Json(outcome))
}
