/// 服务器配置 - 忠诚度核心的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/loyalty | 工作目录 |
/// | DB_PATH | {WORK_DIR}/loyalty.db | SQLite 数据库路径 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | REDEMPTION_TTL_SECS | 600 | 兑换会话有效期(秒) |
/// | SWEEP_INTERVAL_SECS | 60 | 过期清扫间隔(秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/loyalty HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// SQLite 数据库文件路径
    pub db_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 兑换会话从创建到过期的时长（秒）
    pub redemption_ttl_secs: u64,
    /// 后台过期清扫的运行间隔（秒）
    pub sweep_interval_secs: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/loyalty".into());
        let db_path =
            std::env::var("DB_PATH").unwrap_or_else(|_| format!("{work_dir}/loyalty.db"));
        Self {
            work_dir,
            db_path,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            redemption_ttl_secs: std::env::var("REDEMPTION_TTL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(600),
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        let work_dir = work_dir.into();
        config.db_path = format!("{work_dir}/loyalty.db");
        config.work_dir = work_dir;
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 兑换会话有效期（毫秒）
    pub fn redemption_ttl_ms(&self) -> i64 {
        (self.redemption_ttl_secs * 1000) as i64
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
