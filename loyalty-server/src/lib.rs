//! Loyalty Server - 多租户会员积分与兑换核心
//!
//! # 架构概述
//!
//! 本模块是忠诚度核心服务的主入口，提供以下核心功能：
//!
//! - **积分账本** (`rewards::ledger`): 追加式流水 + 原子余额守卫
//! - **兑换会话** (`rewards::redemption`): 扫码兑换状态机
//! - **特殊奖励** (`rewards::special`): 生日/周年年度领取
//! - **HTTP API** (`api`): RESTful API 接口
//! - **数据库** (`db`): SQLite 存储与仓储层
//!
//! # 模块结构
//!
//! ```text
//! loyalty-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── auth/          # 身份提取器
//! ├── rewards/       # 领域核心（账本、兑换、特殊奖励）
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 错误、响应、日志
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod rewards;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentMember, CurrentStaff};
pub use core::{Config, Server, ServerState};
pub use rewards::{
    ClaimOutcome, CreatedRedemption, PointsLedger, RedemptionCoordinator,
    SpecialRewardClaimService,
};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 启动前的环境准备 (dotenv, 工作目录, 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    if config.is_production() {
        let log_dir = format!("{}/logs", config.work_dir);
        std::fs::create_dir_all(&log_dir)?;
        init_logger_with_file(None, Some(&log_dir));
    } else {
        init_logger();
    }
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __                    ____
   / /   ____  __  ______ _/ / /___  __
  / /   / __ \/ / / / __ `/ / __/ / / /
 / /___/ /_/ / /_/ / /_/ / / /_/ /_/ /
/_____/\____/\__, /\__,_/_/\__/\__, /
            /____/            /____/
    "#
    );
}
