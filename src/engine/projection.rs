// ==========================================
// 销售分析与采购建议系统 - 采购投影引擎
// ==========================================
// 职责: 原始销售行 → 归一化 → (可选)门店+品类聚合 → 投影/建议采购 → (可选)库存分档
// 输入: SalesRecord（原始单位）+ ProjectionConfig
// 输出: ProjectedRecord（展示单位）
// 红线: 纯函数，无副作用，不读全局状态；
//       聚合模式下先汇总销量/库存再计算建议，不对商品级建议求和
// ==========================================

use crate::config::projection_config::ProjectionConfig;
use crate::domain::sales::{ProjectedRecord, SalesAggregate, SalesRecord};
use crate::domain::types::AggregationMode;
use crate::engine::error::ProjectionResult;
use crate::engine::stock_status::StockStatusClassifier;
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// ProjectionOptions - 单次计算选项
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectionOptions {
    pub aggregation: AggregationMode,
    pub classify_stock: bool, // 是否计算 stock_days / stock_status
}

impl ProjectionOptions {
    /// 逐行计算，不分档（简单报表）
    pub fn per_row() -> Self {
        Self {
            aggregation: AggregationMode::PerRow,
            classify_stock: false,
        }
    }

    /// 门店+品类聚合并分档（高级报表）
    pub fn grouped_with_status() -> Self {
        Self {
            aggregation: AggregationMode::ByStoreGroup,
            classify_stock: true,
        }
    }
}

// ==========================================
// ProjectionEngine - 采购投影引擎
// ==========================================
pub struct ProjectionEngine {
    // 无状态引擎，参数由调用方每次传入
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectionEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算采购投影
    ///
    /// # 参数
    /// - `rows`: 原始销售行（可为空）
    /// - `config`: 投影参数（窗口、阈值、单位换算）
    /// - `options`: 聚合模式与是否分档
    ///
    /// # 返回
    /// - Ok(Vec<ProjectedRecord>): 逐行模式行数 = 输入行数；
    ///   聚合模式行数 = 不同 (store_id, group_id) 数，按该键升序
    /// - Err(ConfigurationError): 参数越界
    pub fn compute_projection(
        &self,
        rows: &[SalesRecord],
        config: &ProjectionConfig,
        options: ProjectionOptions,
    ) -> ProjectionResult<Vec<ProjectedRecord>> {
        config.validate()?;

        if rows.is_empty() {
            tracing::debug!("输入为空，返回空投影结果");
            return Ok(Vec::new());
        }

        // 1. 单位归一化
        let normalized = self.normalize(rows, config.unit_divisor);

        // 2. 可选聚合
        let aggregates = match options.aggregation {
            AggregationMode::PerRow => normalized,
            AggregationMode::ByStoreGroup => self.aggregate_by_store_group(&normalized),
        };

        // 3-4. 投影 + 分档
        let projected = self.project_aggregates(&aggregates, config, options.classify_stock)?;

        tracing::debug!(
            input_rows = rows.len(),
            output_rows = projected.len(),
            analysis_window_days = config.analysis_window_days,
            projection_window_days = config.projection_window_days,
            aggregation = ?options.aggregation,
            "投影计算完成"
        );

        Ok(projected)
    }

    /// 对已归一化的行计算投影字段
    ///
    /// 用于本地结果表回读后按新的投影窗口重算
    pub fn project_aggregates(
        &self,
        aggregates: &[SalesAggregate],
        config: &ProjectionConfig,
        classify_stock: bool,
    ) -> ProjectionResult<Vec<ProjectedRecord>> {
        config.validate()?;

        let classifier = StockStatusClassifier::new(&config.thresholds);
        let analysis_days = f64::from(config.analysis_window_days);
        let projection_days = f64::from(config.projection_window_days);

        let projected = aggregates
            .iter()
            .map(|agg| {
                let daily_average_sales = agg.quantity_sold / analysis_days;
                let projected_sales = daily_average_sales * projection_days;
                let recommended_purchase = (projected_sales - agg.current_stock).max(0.0);

                let (stock_days, stock_status) = if classify_stock {
                    let days =
                        StockStatusClassifier::stock_days(agg.current_stock, daily_average_sales);
                    (Some(days), Some(classifier.classify(days)))
                } else {
                    (None, None)
                };

                ProjectedRecord {
                    store_id: agg.store_id,
                    group_id: agg.group_id,
                    product_id: agg.product_id,
                    product_count: agg.product_count,
                    quantity_sold: agg.quantity_sold,
                    current_stock: agg.current_stock,
                    daily_average_sales,
                    projected_sales,
                    recommended_purchase,
                    stock_days,
                    stock_status,
                }
            })
            .collect();

        Ok(projected)
    }

    // ==========================================
    // 归一化与聚合
    // ==========================================

    /// 原始单位 → 展示单位
    ///
    /// 负数/非数值按 0 处理并告警
    pub fn normalize(&self, rows: &[SalesRecord], unit_divisor: f64) -> Vec<SalesAggregate> {
        rows.iter()
            .map(|row| SalesAggregate {
                store_id: row.store_id,
                group_id: row.group_id,
                product_id: row.product_id,
                product_count: 1,
                quantity_sold: sanitize_quantity(row, "quantity_sold", row.quantity_sold)
                    / unit_divisor,
                current_stock: sanitize_quantity(row, "current_stock", row.current_stock)
                    / unit_divisor,
            })
            .collect()
    }

    /// 按 (store_id, group_id) 汇总销量与库存，统计构成商品数
    ///
    /// 无 product_id 的行视为已聚合行，按其 product_count 计入
    pub fn aggregate_by_store_group(&self, rows: &[SalesAggregate]) -> Vec<SalesAggregate> {
        #[derive(Default)]
        struct Acc {
            quantity_sold: f64,
            current_stock: f64,
            products: BTreeSet<i64>,
            anonymous_products: u32,
        }

        let mut groups: BTreeMap<(i64, i64), Acc> = BTreeMap::new();
        for row in rows {
            let acc = groups.entry((row.store_id, row.group_id)).or_default();
            acc.quantity_sold += row.quantity_sold;
            acc.current_stock += row.current_stock;
            match row.product_id {
                Some(product_id) => {
                    acc.products.insert(product_id);
                }
                None => acc.anonymous_products += row.product_count,
            }
        }

        groups
            .into_iter()
            .map(|((store_id, group_id), acc)| SalesAggregate {
                store_id,
                group_id,
                product_id: None,
                product_count: acc.products.len() as u32 + acc.anonymous_products,
                quantity_sold: acc.quantity_sold,
                current_stock: acc.current_stock,
            })
            .collect()
    }
}

fn sanitize_quantity(row: &SalesRecord, field: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        return value;
    }
    tracing::warn!(
        store_id = row.store_id,
        group_id = row.group_id,
        product_id = ?row.product_id,
        field,
        value,
        "数量非法（负数或非数值），按 0 处理"
    );
    0.0
}
