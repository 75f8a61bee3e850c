// ==========================================
// 销售分析与采购建议系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 决策支持（采购建议由人工最终确认）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 投影参数
pub mod config;

// 引擎层 - 投影计算
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 数据仓储层 - 数据访问
pub mod repository;

// 导出层 - CSV
pub mod exporter;

// API 层 - 报表接口
pub mod api;

// 应用层 - 组装
pub mod app;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AggregationMode, DataSource, RollupKey, StockStatus};

// 领域实体
pub use domain::{ProductGroup, ProjectedRecord, RollupRow, SalesAggregate, SalesRecord};

// 配置
pub use config::{ConfigManager, ProjectionConfig, ProjectionConfigReader, StockThresholds};

// 引擎
pub use engine::{
    DemoDataGenerator, ProjectionEngine, ProjectionError, ProjectionOptions,
    StockStatusClassifier, SummaryEngine,
};

// API
pub use api::{ApiError, ReportApi, ReportStatus};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "销售分析与采购建议系统";
