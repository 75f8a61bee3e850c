// ==========================================
// 销售分析与采购建议系统 - 配置层
// ==========================================
// 职责: 投影参数定义与校验，配置持久化
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod config_reader;
pub mod projection_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use config_reader::ProjectionConfigReader;
pub use projection_config::{ProjectionConfig, StockThresholds};
