// ==========================================
// 销售分析与采购建议系统 - 领域层
// ==========================================
// 职责: 强类型实体与枚举，不含计算逻辑
// ==========================================

pub mod product_group;
pub mod sales;
pub mod types;

// 重导出核心类型
pub use product_group::{default_product_groups, display_name_of, ProductGroup};
pub use sales::{ProjectedRecord, RollupRow, SalesAggregate, SalesRecord};
pub use types::{AggregationMode, DataSource, RollupKey, StockStatus};
