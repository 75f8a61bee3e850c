// ==========================================
// 销售分析与采购建议系统 - 演示数据生成器
// ==========================================
// 职责: 外部数据源不可用时生成可复现的模拟销售行
// 规则: 门店 1–5 × 白名单品类，各一行；
//       销量 = 品类基数 + U[-300, 500)，库存 = 销量 + U[-200, 300)，下限 0
//       随机种子 = store_id + group_id（同输入同输出）
// 输出: 原始单位（×1000），走正常归一化路径
// ==========================================

use crate::config::projection_config::ProjectionConfig;
use crate::domain::sales::SalesRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 演示门店
pub const DEMO_STORE_IDS: [i64; 5] = [1, 2, 3, 4, 5];

/// 未配置基数的品类使用的默认销量基数
const FALLBACK_BASE_SALES: i64 = 1000;

// ==========================================
// DemoDataGenerator - 演示数据生成器
// ==========================================
pub struct DemoDataGenerator {
    store_ids: Vec<i64>,
}

impl Default for DemoDataGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoDataGenerator {
    pub fn new() -> Self {
        Self {
            store_ids: DEMO_STORE_IDS.to_vec(),
        }
    }

    /// 指定门店列表
    pub fn with_stores(store_ids: Vec<i64>) -> Self {
        Self { store_ids }
    }

    /// 生成演示销售行（门店+品类级，无 product_id）
    pub fn generate(&self, config: &ProjectionConfig) -> Vec<SalesRecord> {
        let mut rows = Vec::with_capacity(self.store_ids.len() * config.product_groups.len());

        for &store_id in &self.store_ids {
            for group in &config.product_groups {
                let mut rng = StdRng::seed_from_u64((store_id + group.group_id) as u64);

                let base = base_sales_for(&group.display_name);
                let sold = (base + rng.gen_range(-300..500)).max(0);
                let stock = (sold + rng.gen_range(-200..300)).max(0);

                rows.push(SalesRecord::new(
                    store_id,
                    group.group_id,
                    None,
                    sold as f64 * config.unit_divisor,
                    stock as f64 * config.unit_divisor,
                ));
            }
        }

        tracing::debug!(row_count = rows.len(), "演示数据生成完成");
        rows
    }
}

fn base_sales_for(display_name: &str) -> i64 {
    match display_name {
        "ÓLEO" => 1500,
        "AÇÚCAR" => 2200,
        "LEITE" => 1800,
        _ => FALLBACK_BASE_SALES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_covers_every_store_and_group() {
        let config = ProjectionConfig::default();
        let rows = DemoDataGenerator::new().generate(&config);

        assert_eq!(rows.len(), 5 * 3);
        for row in &rows {
            assert!(config.is_group_allowed(row.group_id));
            assert!(row.quantity_sold >= 0.0);
            assert!(row.current_stock >= 0.0);
            assert!(row.product_id.is_none());
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let config = ProjectionConfig::default();
        let generator = DemoDataGenerator::new();
        assert_eq!(generator.generate(&config), generator.generate(&config));
    }

    #[test]
    fn test_generated_values_within_expected_range() {
        let config = ProjectionConfig::default();
        let rows = DemoDataGenerator::with_stores(vec![1]).generate(&config);

        let sugar = rows.iter().find(|r| r.group_id == 210604).unwrap();
        let sold = sugar.quantity_sold / config.unit_divisor;
        assert!((1900.0..2700.0).contains(&sold));
        let stock = sugar.current_stock / config.unit_divisor;
        assert!(stock >= sold - 200.0 && stock < sold + 300.0);
    }
}
