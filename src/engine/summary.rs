// ==========================================
// 销售分析与采购建议系统 - 汇总引擎
// ==========================================
// 职责: 按品类/门店/门店+品类 汇总 quantity_sold 与 recommended_purchase
// 规则: 无记录的分组不出现（不补零行）；输出按键升序
// ==========================================

use crate::domain::product_group::{display_name_of, ProductGroup};
use crate::domain::sales::{ProjectedRecord, RollupRow};
use crate::domain::types::RollupKey;
use std::collections::BTreeMap;

// ==========================================
// SummaryEngine - 汇总引擎
// ==========================================
pub struct SummaryEngine {
    // 无状态
}

impl Default for SummaryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 分组汇总
    ///
    /// # 参数
    /// - `records`: 投影结果
    /// - `key`: 汇总维度
    /// - `groups`: 品类白名单（用于填充显示名；未知品类以编码代替）
    pub fn rollup(
        &self,
        records: &[ProjectedRecord],
        key: RollupKey,
        groups: &[ProductGroup],
    ) -> Vec<RollupRow> {
        let mut buckets: BTreeMap<(Option<i64>, Option<i64>), RollupRow> = BTreeMap::new();

        for record in records {
            let (store_id, group_id) = match key {
                RollupKey::Category => (None, Some(record.group_id)),
                RollupKey::Store => (Some(record.store_id), None),
                RollupKey::StoreCategory => (Some(record.store_id), Some(record.group_id)),
            };

            let row = buckets
                .entry((store_id, group_id))
                .or_insert_with(|| RollupRow {
                    store_id,
                    group_id,
                    category: group_id.map(|id| category_name(groups, id)),
                    record_count: 0,
                    quantity_sold: 0.0,
                    recommended_purchase: 0.0,
                });

            row.record_count += 1;
            row.quantity_sold += record.quantity_sold;
            row.recommended_purchase += record.recommended_purchase;
        }

        buckets.into_values().collect()
    }

    /// 全量合计（quantity_sold, recommended_purchase）
    pub fn totals(&self, records: &[ProjectedRecord]) -> (f64, f64) {
        records.iter().fold((0.0, 0.0), |(sold, purchase), r| {
            (sold + r.quantity_sold, purchase + r.recommended_purchase)
        })
    }
}

fn category_name(groups: &[ProductGroup], group_id: i64) -> String {
    display_name_of(groups, group_id)
        .map(str::to_string)
        .unwrap_or_else(|| group_id.to_string())
}
