// ==========================================
// 销售分析与采购建议系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理，刷新元信息记录
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::config_reader::ProjectionConfigReader;
use crate::config::projection_config::{
    StockThresholds, DEFAULT_ANALYSIS_WINDOW_DAYS, DEFAULT_PROJECTION_WINDOW_DAYS,
    DEFAULT_UNIT_DIVISOR,
};
use crate::db::open_sqlite_connection;
use crate::domain::product_group::{default_product_groups, ProductGroup};
use crate::domain::types::DataSource;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 时间戳存储格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 报表缓存默认有效期（秒）
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        Ok(())
    }

    /// 写入默认配置（已存在的键保持不变）
    ///
    /// # 返回
    /// - Ok(usize): 新写入的配置项数量
    pub fn seed_defaults(&self) -> Result<usize, Box<dyn Error>> {
        let groups_json = serde_json::to_string(&default_product_groups())?;
        let thresholds = StockThresholds::default();

        let defaults: Vec<(&str, String, &str)> = vec![
            (
                config_keys::ANALYSIS_WINDOW_DAYS,
                DEFAULT_ANALYSIS_WINDOW_DAYS.to_string(),
                "分析窗口（天）",
            ),
            (
                config_keys::PROJECTION_WINDOW_DAYS,
                DEFAULT_PROJECTION_WINDOW_DAYS.to_string(),
                "投影窗口（天）",
            ),
            (
                config_keys::STOCK_CRITICAL_DAYS,
                thresholds.critical.to_string(),
                "库存危急上界（天）",
            ),
            (
                config_keys::STOCK_LOW_DAYS,
                thresholds.low.to_string(),
                "库存偏低上界（天）",
            ),
            (
                config_keys::STOCK_ADEQUATE_DAYS,
                thresholds.adequate.to_string(),
                "库存充足上界（天）",
            ),
            (config_keys::PRODUCT_GROUPS, groups_json, "品类白名单 (JSON)"),
            (
                config_keys::UNIT_DIVISOR,
                DEFAULT_UNIT_DIVISOR.to_string(),
                "源数据单位换算系数",
            ),
            (
                config_keys::CACHE_TTL_SECONDS,
                DEFAULT_CACHE_TTL_SECONDS.to_string(),
                "报表缓存有效期（秒）",
            ),
        ];

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut inserted = 0;
        for (key, value, description) in defaults {
            inserted += conn.execute(
                "INSERT OR IGNORE INTO config_kv (scope_id, key, value, description)
                 VALUES ('global', ?1, ?2, ?3)",
                params![key, value, description],
            )?;
        }

        Ok(inserted)
    }

    /// 获取所有 global 配置
    pub fn list_global_configs(&self) -> Result<HashMap<String, String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(config_map)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取并解析配置值，解析失败时告警并返回默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: std::str::FromStr + ToString + Copy,
    {
        let raw = self.get_config_or_default(key, &default.to_string())?;
        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(config_key = key, raw_value = %raw, "配置值格式错误，使用默认值");
                Ok(default)
            }
        }
    }

    // ===== 刷新元信息 =====

    /// 记录最近一次刷新的时间与数据来源
    pub fn record_refresh(
        &self,
        source: DataSource,
        refreshed_at: NaiveDateTime,
    ) -> Result<(), Box<dyn Error>> {
        self.set_global_config_value(
            config_keys::LAST_REFRESH_AT,
            &refreshed_at.format(TIMESTAMP_FORMAT).to_string(),
        )?;
        self.set_global_config_value(config_keys::DATA_SOURCE, &source.to_string())?;
        Ok(())
    }

    /// 最近一次刷新时间
    pub fn get_last_refresh_at(&self) -> Result<Option<NaiveDateTime>, Box<dyn Error>> {
        Ok(self
            .get_config_value(config_keys::LAST_REFRESH_AT)?
            .and_then(|v| NaiveDateTime::parse_from_str(&v, TIMESTAMP_FORMAT).ok()))
    }

    /// 最近一次刷新的数据来源
    pub fn get_data_source(&self) -> Result<Option<DataSource>, Box<dyn Error>> {
        Ok(self
            .get_config_value(config_keys::DATA_SOURCE)?
            .and_then(|v| v.parse::<DataSource>().ok()))
    }

    /// 报表缓存有效期（秒）
    pub fn get_cache_ttl_seconds(&self) -> Result<u64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::CACHE_TTL_SECONDS, DEFAULT_CACHE_TTL_SECONDS)
    }
}

// ==========================================
// ProjectionConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ProjectionConfigReader for ConfigManager {
    async fn get_analysis_window_days(&self) -> Result<u32, Box<dyn Error>> {
        self.get_parsed_or_default(
            config_keys::ANALYSIS_WINDOW_DAYS,
            DEFAULT_ANALYSIS_WINDOW_DAYS,
        )
    }

    async fn get_projection_window_days(&self) -> Result<u32, Box<dyn Error>> {
        self.get_parsed_or_default(
            config_keys::PROJECTION_WINDOW_DAYS,
            DEFAULT_PROJECTION_WINDOW_DAYS,
        )
    }

    async fn get_stock_thresholds(&self) -> Result<StockThresholds, Box<dyn Error>> {
        let defaults = StockThresholds::default();
        Ok(StockThresholds {
            critical: self.get_parsed_or_default(config_keys::STOCK_CRITICAL_DAYS, defaults.critical)?,
            low: self.get_parsed_or_default(config_keys::STOCK_LOW_DAYS, defaults.low)?,
            adequate: self.get_parsed_or_default(config_keys::STOCK_ADEQUATE_DAYS, defaults.adequate)?,
        })
    }

    async fn get_product_groups(&self) -> Result<Vec<ProductGroup>, Box<dyn Error>> {
        let value = match self.get_config_value(config_keys::PRODUCT_GROUPS)? {
            Some(v) => v,
            None => return Ok(default_product_groups()),
        };

        let groups: Vec<ProductGroup> = serde_json::from_str(&value).unwrap_or_else(|_| {
            tracing::warn!(
                config_key = config_keys::PRODUCT_GROUPS,
                raw_value = %value,
                "品类白名单配置格式错误，使用默认白名单"
            );
            default_product_groups()
        });

        Ok(groups)
    }

    async fn get_unit_divisor(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::UNIT_DIVISOR, DEFAULT_UNIT_DIVISOR)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 窗口
    pub const ANALYSIS_WINDOW_DAYS: &str = "analysis_window_days";
    pub const PROJECTION_WINDOW_DAYS: &str = "projection_window_days";

    // 库存分档
    pub const STOCK_CRITICAL_DAYS: &str = "stock_critical_days";
    pub const STOCK_LOW_DAYS: &str = "stock_low_days";
    pub const STOCK_ADEQUATE_DAYS: &str = "stock_adequate_days";

    // 品类白名单 (JSON)
    pub const PRODUCT_GROUPS: &str = "product_groups";

    // 单位换算
    pub const UNIT_DIVISOR: &str = "unit_divisor";

    // 缓存
    pub const CACHE_TTL_SECONDS: &str = "cache_ttl_seconds";

    // 刷新元信息
    pub const LAST_REFRESH_AT: &str = "last_refresh_at";
    pub const DATA_SOURCE: &str = "data_source";
}
