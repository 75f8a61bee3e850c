// ==========================================
// 销售分析与采购建议系统 - 引擎层
// ==========================================
// 职责: 纯计算（投影、分档、汇总、演示数据）
// 红线: Engine 不拼 SQL，不做 I/O
// ==========================================

pub mod demo_data;
pub mod error;
pub mod projection;
pub mod stock_status;
pub mod summary;

// 重导出核心引擎
pub use demo_data::DemoDataGenerator;
pub use error::{ProjectionError, ProjectionResult};
pub use projection::{ProjectionEngine, ProjectionOptions};
pub use stock_status::StockStatusClassifier;
pub use summary::SummaryEngine;
