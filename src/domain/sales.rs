// ==========================================
// 销售分析与采购建议系统 - 销售/投影领域模型
// ==========================================
// 单位约定:
// - SalesRecord 为源系统原始单位（展示单位的 1/1000）
// - SalesAggregate / ProjectedRecord 为归一化后的展示单位
// ==========================================

use crate::domain::types::StockStatus;
use serde::{Deserialize, Serialize};

// ==========================================
// SalesRecord - 销售输入行
// ==========================================
// 每行对应 门店×商品 或 门店×品类
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub store_id: i64,            // 门店ID
    pub group_id: i64,            // 品类（子组）ID，必须在白名单内
    pub product_id: Option<i64>,  // 商品ID（品类级聚合行可为空）
    pub quantity_sold: f64,       // 分析窗口内累计销量（原始单位）
    pub current_stock: f64,       // 当前库存（原始单位，无库存记录时为 0）
}

impl SalesRecord {
    pub fn new(
        store_id: i64,
        group_id: i64,
        product_id: Option<i64>,
        quantity_sold: f64,
        current_stock: f64,
    ) -> Self {
        Self {
            store_id,
            group_id,
            product_id,
            quantity_sold,
            current_stock,
        }
    }
}

// ==========================================
// SalesAggregate - 归一化（可选聚合）后的中间行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesAggregate {
    pub store_id: i64,
    pub group_id: i64,
    pub product_id: Option<i64>, // 聚合模式下为 None
    pub product_count: u32,      // 构成商品数（逐行模式恒为 1）
    pub quantity_sold: f64,      // 展示单位
    pub current_stock: f64,      // 展示单位
}

impl From<&ProjectedRecord> for SalesAggregate {
    fn from(record: &ProjectedRecord) -> Self {
        Self {
            store_id: record.store_id,
            group_id: record.group_id,
            product_id: record.product_id,
            product_count: record.product_count,
            quantity_sold: record.quantity_sold,
            current_stock: record.current_stock,
        }
    }
}

// ==========================================
// ProjectedRecord - 投影输出行
// ==========================================
// 红线: recommended_purchase >= 0（过剩库存给 0，不给负数）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedRecord {
    // ===== 维度 =====
    pub store_id: i64,
    pub group_id: i64,
    pub product_id: Option<i64>,
    pub product_count: u32,

    // ===== 归一化输入 =====
    pub quantity_sold: f64,
    pub current_stock: f64,

    // ===== 投影结果 =====
    pub daily_average_sales: f64,  // quantity_sold / analysis_window_days
    pub projected_sales: f64,      // daily_average_sales * projection_window_days
    pub recommended_purchase: f64, // max(0, projected_sales - current_stock)

    // ===== 库存分档（仅在请求分类时填充）=====
    // stock_days 为 +inf 表示无销量信号
    pub stock_days: Option<f64>,
    pub stock_status: Option<StockStatus>,
}

impl ProjectedRecord {
    /// 库存是否永不售罄（无销量信号）
    pub fn has_unbounded_stock_days(&self) -> bool {
        self.stock_days.map(f64::is_infinite).unwrap_or(false)
    }
}

// ==========================================
// RollupRow - 汇总行
// ==========================================
// 只汇总 quantity_sold 与 recommended_purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupRow {
    pub store_id: Option<i64>,
    pub group_id: Option<i64>,
    pub category: Option<String>, // 品类显示名（按品类汇总时填充）
    pub record_count: usize,
    pub quantity_sold: f64,
    pub recommended_purchase: f64,
}
