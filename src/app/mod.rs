// ==========================================
// 销售分析与采购建议系统 - 应用层
// ==========================================
// 职责: 组装数据库、配置、仓储与API，供宿主进程使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
