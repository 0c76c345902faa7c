//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResponse`] - API 响应结构
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | E01xx | 积分/领取业务错误 | E0101 积分不足 |
//! | E0xxx | 通用业务错误 | E0003 资源不存在 |
//! | E3xxx | 身份错误 | E3001 未识别的调用方 |
//! | E9xxx | 系统错误 | E9002 数据库错误 |
//!
//! Every failure an operation can produce is a normal, expected outcome
//! representable here; nothing in the core is fatal to the process.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// 错误响应结构
///
/// Every [`AppError`] serializes into this envelope:
///
/// ```json
/// {
///   "code": "E0005",
///   "message": "Redemption session already Confirmed"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// 错误码
    pub code: String,
    /// 消息
    pub message: String,
    /// 附加数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 应用错误枚举
///
/// The claim-precondition kinds (`OutsideWindow`, `AlreadyClaimed`,
/// `ProfileIncomplete`, `FeatureDisabled`) are deliberately distinct:
/// each maps to its own code and user-facing message, never merged.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 身份错误 (401) ==========
    #[error("Caller identity missing or invalid")]
    Unauthorized,

    // ========== 通用业务错误 ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Operation attempted against a session/reward no longer eligible.
    /// The caller must re-fetch state before retrying.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Session passed its expiry, distinct from [`AppError::InvalidState`]
    /// so clients can offer "try again" instead of a generic failure.
    #[error("Expired: {0}")]
    Expired(String),

    /// Transient concurrency failure that survived an internal retry
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // ========== 积分/领取业务错误 (422) ==========
    /// Balance too low for the requested debit. Carries the shortfall so
    /// the client can display "N more points needed".
    #[error("Insufficient points: need {required}, have {available}")]
    InsufficientPoints { required: i64, available: i64 },

    #[error("Outside claim window: {0}")]
    OutsideWindow(String),

    #[error("Already claimed this year: {0}")]
    AlreadyClaimed(String),

    #[error("Profile incomplete: {0}")]
    ProfileIncomplete(String),

    #[error("Feature disabled: {0}")]
    FeatureDisabled(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001"),

            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "E0003"),
            AppError::InvalidState(_) => (StatusCode::CONFLICT, "E0005"),
            AppError::Expired(_) => (StatusCode::GONE, "E0007"),
            AppError::Conflict(_) => (StatusCode::SERVICE_UNAVAILABLE, "E0006"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "E0002"),

            AppError::InsufficientPoints { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "E0101"),
            AppError::OutsideWindow(_) => (StatusCode::UNPROCESSABLE_ENTITY, "E0102"),
            AppError::AlreadyClaimed(_) => (StatusCode::UNPROCESSABLE_ENTITY, "E0103"),
            AppError::ProfileIncomplete(_) => (StatusCode::UNPROCESSABLE_ENTITY, "E0104"),
            AppError::FeatureDisabled(_) => (StatusCode::UNPROCESSABLE_ENTITY, "E0105"),

            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002")
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9001")
            }
        };

        // 5xx: 记录详情但不暴露给客户端
        let message = match &self {
            AppError::Database(_) => "Database error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn expired(msg: impl Into<String>) -> Self {
        Self::Expired(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn insufficient_points(required: i64, available: i64) -> Self {
        Self::InsufficientPoints {
            required,
            available,
        }
    }

    /// Points still missing for the attempted debit (0 for other kinds)
    pub fn shortfall(&self) -> i64 {
        match self {
            Self::InsufficientPoints {
                required,
                available,
            } => (required - available).max(0),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortfall_only_for_insufficient_points() {
        let e = AppError::insufficient_points(100, 80);
        assert_eq!(e.shortfall(), 20);
        assert_eq!(AppError::not_found("x").shortfall(), 0);
    }

    #[test]
    fn insufficient_points_message_carries_both_sides() {
        let e = AppError::insufficient_points(100, 80);
        assert_eq!(e.to_string(), "Insufficient points: need 100, have 80");
    }
}
