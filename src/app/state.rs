// ==========================================
// 销售分析与采购建议系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::Connection;

use crate::api::{ReportApi, ReportCache};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::importer::SalesImporter;
use crate::repository::{ProjectionRepository, RefreshLogRepository};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 共享连接
    pub conn: Arc<Mutex<Connection>>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 报表API
    pub report_api: Arc<ReportApi>,

    /// 销售数据导入器
    pub importer: Arc<SalesImporter>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并建表（幂等）
    /// 2. 写入缺省配置（已有配置保持不变）
    /// 3. 创建仓储与API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法初始化配置管理器: {}", e))?,
        );
        let seeded = config_manager
            .seed_defaults()
            .map_err(|e| format!("写入缺省配置失败: {}", e))?;
        if seeded > 0 {
            tracing::info!(seeded, "已写入缺省配置");
        }

        let ttl_seconds = config_manager
            .get_cache_ttl_seconds()
            .map_err(|e| format!("读取缓存配置失败: {}", e))?;

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let projection_repo = Arc::new(ProjectionRepository::from_connection(conn.clone()));
        let refresh_log_repo = Arc::new(RefreshLogRepository::from_connection(conn.clone()));

        // ==========================================
        // 初始化API层
        // ==========================================
        let report_api = Arc::new(ReportApi::new(
            projection_repo,
            refresh_log_repo,
            config_manager.clone(),
            ReportCache::new(Duration::from_secs(ttl_seconds)),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            conn,
            config_manager,
            report_api,
            importer: Arc::new(SalesImporter::new()),
        })
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 PURCHASE_ADVISOR_DB_PATH（非空时优先）
/// - 用户数据目录/purchase-advisor/purchase_advisor.db
/// - 无法获取用户数据目录时: ./purchase_advisor.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("PURCHASE_ADVISOR_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./purchase_advisor.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("purchase-advisor");
        // 目录创建失败时沿用当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("purchase_advisor.db");
        }
    }

    path.to_string_lossy().to_string()
}
