//! Shared domain types for the loyalty rewards platform
//!
//! # 模块结构
//!
//! - [`models`] - 领域模型 (merchant, member, membership, reward,
//!   redemption, transaction, event)
//! - [`util`] - ID 生成和时间工具
//!
//! The `db` feature gates `sqlx::FromRow`/`sqlx::Type` derives so that
//! clients without a database dependency can still use the models.

pub mod models;
pub mod util;

pub use models::{
    Event, Member, Merchant, MerchantMembership, MonthDay, RedemptionRequest, RedemptionStatus,
    Reward, RewardTransaction, RewardType, SpecialRewardKind, Tier, TransactionType,
};
