// ==========================================
// 销售分析与采购建议系统 - 库存状态分档
// ==========================================
// 职责: stock_days → StockStatus
// 规则: 有序 (上界不含, 档位) 表，首个满足 stock_days < 上界 的档位命中，
//       均不满足则为 High
// ==========================================

use crate::config::projection_config::StockThresholds;
use crate::domain::types::StockStatus;

// ==========================================
// StockStatusClassifier - 库存状态分档器
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockStatusClassifier {
    table: [(f64, StockStatus); 3],
}

impl Default for StockStatusClassifier {
    fn default() -> Self {
        Self::new(&StockThresholds::default())
    }
}

impl StockStatusClassifier {
    pub fn new(thresholds: &StockThresholds) -> Self {
        Self {
            table: [
                (thresholds.critical, StockStatus::Critical),
                (thresholds.low, StockStatus::Low),
                (thresholds.adequate, StockStatus::Adequate),
            ],
        }
    }

    /// 计算库存可售天数
    ///
    /// 日均销量为 0 时返回 +inf（按当前节奏永不售罄 / 无销量信号）
    pub fn stock_days(current_stock: f64, daily_average_sales: f64) -> f64 {
        if daily_average_sales > 0.0 {
            current_stock / daily_average_sales
        } else {
            f64::INFINITY
        }
    }

    /// 按分档表归类
    pub fn classify(&self, stock_days: f64) -> StockStatus {
        self.table
            .iter()
            .find(|(upper_exclusive, _)| stock_days < *upper_exclusive)
            .map(|(_, status)| *status)
            .unwrap_or(StockStatus::High)
    }

    /// 分档表（上界不含, 档位）
    pub fn boundaries(&self) -> &[(f64, StockStatus)] {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_upper_exclusive() {
        let classifier = StockStatusClassifier::default();

        assert_eq!(classifier.classify(0.0), StockStatus::Critical);
        assert_eq!(classifier.classify(2.999), StockStatus::Critical);
        assert_eq!(classifier.classify(3.0), StockStatus::Low);
        assert_eq!(classifier.classify(6.5), StockStatus::Low);
        assert_eq!(classifier.classify(7.0), StockStatus::Adequate);
        assert_eq!(classifier.classify(14.99), StockStatus::Adequate);
        assert_eq!(classifier.classify(15.0), StockStatus::High);
        assert_eq!(classifier.classify(f64::INFINITY), StockStatus::High);
    }

    #[test]
    fn test_zero_sales_gives_infinite_stock_days() {
        assert!(StockStatusClassifier::stock_days(0.0, 0.0).is_infinite());
        assert!(StockStatusClassifier::stock_days(120.0, 0.0).is_infinite());
        assert_eq!(StockStatusClassifier::stock_days(500.0, 100.0), 5.0);
    }

    #[test]
    fn test_custom_thresholds() {
        let classifier = StockStatusClassifier::new(&StockThresholds {
            critical: 1.0,
            low: 2.0,
            adequate: 30.0,
        });
        assert_eq!(classifier.classify(1.0), StockStatus::Low);
        assert_eq!(classifier.classify(20.0), StockStatus::Adequate);
        assert_eq!(classifier.boundaries().len(), 3);
    }
}
