//! Membership API 模块
//!
//! | 路径 | 方法 | 调用方 | 说明 |
//! |------|------|--------|------|
//! | /api/memberships/{merchant_id} | GET | 会员 | 余额、等级、流水 |
//! | /api/merchants/{merchant_id}/rewards | GET | 会员 | 可兑换奖励目录 |
//! | /api/members/profile | PUT | 会员 | 更新生日/纪念日 |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/memberships/{merchant_id}", get(handler::get_membership))
        .route(
            "/api/merchants/{merchant_id}/rewards",
            get(handler::list_rewards),
        )
        .route("/api/members/profile", put(handler::update_profile))
}
