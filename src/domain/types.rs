// ==========================================
// 销售分析与采购建议系统 - 领域类型定义
// ==========================================
// 职责: 库存状态、数据来源、聚合模式等枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 库存状态 (Stock Status)
// ==========================================
// 由库存可售天数按半开区间分档:
// [0,3) Critical, [3,7) Low, [7,15) Adequate, [15,∞) High
// 顺序: Critical < Low < Adequate < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    Critical, // 危急
    Low,      // 偏低
    Adequate, // 充足
    High,     // 偏高
}

impl StockStatus {
    /// 国际化键（locales/*.yml 中的 stock_status.*）
    pub fn i18n_key(&self) -> &'static str {
        match self {
            StockStatus::Critical => "stock_status.critical",
            StockStatus::Low => "stock_status.low",
            StockStatus::Adequate => "stock_status.adequate",
            StockStatus::High => "stock_status.high",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::Critical => write!(f, "CRITICAL"),
            StockStatus::Low => write!(f, "LOW"),
            StockStatus::Adequate => write!(f, "ADEQUATE"),
            StockStatus::High => write!(f, "HIGH"),
        }
    }
}

impl FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CRITICAL" => Ok(StockStatus::Critical),
            "LOW" => Ok(StockStatus::Low),
            "ADEQUATE" => Ok(StockStatus::Adequate),
            "HIGH" => Ok(StockStatus::High),
            other => Err(format!("未知库存状态: {}", other)),
        }
    }
}

// ==========================================
// 数据来源 (Data Source)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    External, // 外部查询/文件导入
    Demo,     // 模拟数据
    Cached,   // 本地结果表回读
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::External => write!(f, "EXTERNAL"),
            DataSource::Demo => write!(f, "DEMO"),
            DataSource::Cached => write!(f, "CACHED"),
        }
    }
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EXTERNAL" => Ok(DataSource::External),
            "DEMO" => Ok(DataSource::Demo),
            "CACHED" => Ok(DataSource::Cached),
            other => Err(format!("未知数据来源: {}", other)),
        }
    }
}

// ==========================================
// 聚合模式 (Aggregation Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationMode {
    PerRow,       // 逐行计算（商品级建议）
    ByStoreGroup, // 按 门店+品类 汇总后计算（品类级建议）
}

impl Default for AggregationMode {
    fn default() -> Self {
        AggregationMode::ByStoreGroup
    }
}

// ==========================================
// 汇总维度 (Rollup Key)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RollupKey {
    Category,      // 按品类
    Store,         // 按门店
    StoreCategory, // 按 门店+品类
}
