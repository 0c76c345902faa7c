//! Redemption API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 调用方 | 说明 |
//! |------|------|--------|------|
//! | /api/redemptions | POST | 会员 | 创建兑换会话 |
//! | /api/redemptions/{id} | GET | 会员 | 查询会话状态 |
//! | /api/redemptions/{id}/cancel | POST | 会员 | 取消待处理会话 |
//! | /api/redemptions/confirm | POST | 员工 | 扫码确认（扣分） |
//! | /api/redemptions/decline | POST | 员工 | 扫码拒绝 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/redemptions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{id}", get(handler::get_status))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/confirm", post(handler::confirm))
        .route("/decline", post(handler::decline))
}
