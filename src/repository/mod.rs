// ==========================================
// 销售分析与采购建议系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod projection_repo;
pub mod refresh_log_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use projection_repo::{ProjectionRepository, StoredWindows};
pub use refresh_log_repo::{RefreshLogEntity, RefreshLogRepository};
