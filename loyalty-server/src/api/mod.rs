//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`redemptions`] - 兑换会话接口（会员创建/取消，员工确认/拒绝）
//! - [`special_rewards`] - 特殊奖励领取接口
//! - [`memberships`] - 会员关系查询（余额、流水）

pub mod health;
pub mod memberships;
pub mod redemptions;
pub mod special_rewards;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// 装配完整路由
pub fn create_router(state: ServerState) -> Router {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(redemptions::router())
        .merge(special_rewards::router())
        .merge(memberships::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
