// ==========================================
// 销售分析与采购建议系统 - API 层
// ==========================================
// 职责: 编排引擎、仓储与导出，对外提供报表接口
// ==========================================

pub mod error;
pub mod report_api;
pub mod report_cache;

pub use error::{ApiError, ApiResult};
pub use report_api::{ReportApi, ReportStatus};
pub use report_cache::{ReportCache, ReportCacheKey};
