use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::core::tasks::BackgroundTasks;
use crate::core::Config;
use crate::db::DbService;
use crate::rewards::{
    LogNotifier, Notifier, PointsLedger, RedemptionCoordinator, SpecialRewardClaimService,
};

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是忠诚度核心的中心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | ledger | PointsLedger | 积分账本 |
/// | redemptions | RedemptionCoordinator | 兑换会话协调器 |
/// | special_rewards | SpecialRewardClaimService | 特殊奖励领取 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// 积分账本
    pub ledger: PointsLedger,
    /// 兑换会话协调器
    pub redemptions: RedemptionCoordinator,
    /// 特殊奖励领取服务
    pub special_rewards: SpecialRewardClaimService,
    /// 后台任务管理器
    tasks: Arc<Mutex<Option<BackgroundTasks>>>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 打开（并迁移）数据库，装配各领域服务。
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let db = DbService::new(&config.db_path).await?;
        Ok(Self::assemble(config.clone(), db, Arc::new(LogNotifier)))
    }

    /// 基于内存数据库构造状态（测试用）
    pub async fn in_memory(config: Config) -> anyhow::Result<Self> {
        let db = DbService::in_memory().await?;
        Ok(Self::assemble(config, db, Arc::new(LogNotifier)))
    }

    fn assemble(config: Config, db: DbService, notifier: Arc<dyn Notifier>) -> Self {
        let pool = db.pool.clone();
        let ledger = PointsLedger::new(pool.clone());
        let redemptions = RedemptionCoordinator::new(
            pool.clone(),
            config.redemption_ttl_ms(),
            notifier.clone(),
        );
        let special_rewards = SpecialRewardClaimService::new(pool, notifier);
        Self {
            config,
            db,
            ledger,
            redemptions,
            special_rewards,
            tasks: Arc::new(Mutex::new(None)),
        }
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// 启动后台任务
    ///
    /// 目前只有一个定时任务：过期兑换会话清扫。
    pub async fn start_background_tasks(&self) {
        let mut tasks = BackgroundTasks::new();
        let token = tasks.shutdown_token();

        let redemptions = self.redemptions.clone();
        let interval = Duration::from_secs(self.config.sweep_interval_secs.max(1));
        tasks.spawn("redemption_expiry_sweep", async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick fires immediately; skip it so startup stays quiet
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match redemptions.expiry_sweep(shared::util::now_millis()).await {
                            Ok(0) => {}
                            Ok(n) => tracing::info!(expired = n, "Expiry sweep closed sessions"),
                            Err(e) => tracing::error!(error = %e, "Expiry sweep failed"),
                        }
                    }
                    _ = token.cancelled() => {
                        tracing::debug!("Expiry sweep stopping");
                        break;
                    }
                }
            }
        });

        *self.tasks.lock().await = Some(tasks);
    }

    /// 后台任务健康快照：异常终止的任务数，未启动则为 None
    pub async fn background_task_failures(&self) -> Option<usize> {
        self.tasks.lock().await.as_ref().map(|t| t.check_health())
    }

    /// 停止后台任务（graceful shutdown）
    pub async fn stop_background_tasks(&self) {
        if let Some(tasks) = self.tasks.lock().await.take() {
            tasks.shutdown().await;
        }
    }
}
