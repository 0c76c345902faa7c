//! Special Reward API 模块
//!
//! | 路径 | 方法 | 调用方 | 说明 |
//! |------|------|--------|------|
//! | /api/special-rewards/claim | POST | 会员 | 领取年度特殊奖励 |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/special-rewards/claim", post(handler::claim))
}
