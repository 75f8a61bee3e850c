// ==========================================
// 销售分析与采购建议系统 - 投影参数
// ==========================================
// 职责: 投影计算所需的全部参数（显式传入引擎，不读全局状态）
// 约束: 分析窗口 7–90 天，投影窗口 1–60 天
// ==========================================

use crate::domain::product_group::{default_product_groups, ProductGroup};
use crate::engine::error::{ProjectionError, ProjectionResult};
use serde::{Deserialize, Serialize};

// ==========================================
// 默认值与边界
// ==========================================
pub const DEFAULT_ANALYSIS_WINDOW_DAYS: u32 = 21;
pub const DEFAULT_PROJECTION_WINDOW_DAYS: u32 = 15;
pub const MIN_ANALYSIS_WINDOW_DAYS: u32 = 7;
pub const MAX_ANALYSIS_WINDOW_DAYS: u32 = 90;
pub const MIN_PROJECTION_WINDOW_DAYS: u32 = 1;
pub const MAX_PROJECTION_WINDOW_DAYS: u32 = 60;

/// 源系统数量单位为展示单位的 1/1000
pub const DEFAULT_UNIT_DIVISOR: f64 = 1000.0;

// ==========================================
// StockThresholds - 库存天数分档阈值
// ==========================================
// 各值为对应档位的上界（不含）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockThresholds {
    pub critical: f64, // 默认 3
    pub low: f64,      // 默认 7
    pub adequate: f64, // 默认 15
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self {
            critical: 3.0,
            low: 7.0,
            adequate: 15.0,
        }
    }
}

impl StockThresholds {
    /// 阈值必须为正、有限且严格递增
    pub fn validate(&self) -> ProjectionResult<()> {
        for (field, value) in [
            ("thresholds.critical", self.critical),
            ("thresholds.low", self.low),
            ("thresholds.adequate", self.adequate),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ProjectionError::configuration(
                    field,
                    format!("阈值必须为正有限数，实际 {}", value),
                ));
            }
        }

        if !(self.critical < self.low && self.low < self.adequate) {
            return Err(ProjectionError::configuration(
                "thresholds",
                format!(
                    "阈值必须严格递增: critical={} low={} adequate={}",
                    self.critical, self.low, self.adequate
                ),
            ));
        }

        Ok(())
    }
}

// ==========================================
// ProjectionConfig - 投影参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    pub analysis_window_days: u32,
    pub projection_window_days: u32,
    pub thresholds: StockThresholds,
    pub product_groups: Vec<ProductGroup>,
    pub unit_divisor: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            analysis_window_days: DEFAULT_ANALYSIS_WINDOW_DAYS,
            projection_window_days: DEFAULT_PROJECTION_WINDOW_DAYS,
            thresholds: StockThresholds::default(),
            product_groups: default_product_groups(),
            unit_divisor: DEFAULT_UNIT_DIVISOR,
        }
    }
}

impl ProjectionConfig {
    /// 以默认值为基础构造指定窗口的参数，并立即校验
    pub fn with_windows(
        analysis_window_days: u32,
        projection_window_days: u32,
    ) -> ProjectionResult<Self> {
        let config = Self {
            analysis_window_days,
            projection_window_days,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// 校验全部参数
    ///
    /// # 返回
    /// - Ok(()): 参数合法
    /// - Err(ProjectionError::ConfigurationError): 窗口越界 / 阈值非法 / 白名单为空
    pub fn validate(&self) -> ProjectionResult<()> {
        check_window(
            "analysis_window_days",
            self.analysis_window_days,
            MIN_ANALYSIS_WINDOW_DAYS,
            MAX_ANALYSIS_WINDOW_DAYS,
        )?;
        check_window(
            "projection_window_days",
            self.projection_window_days,
            MIN_PROJECTION_WINDOW_DAYS,
            MAX_PROJECTION_WINDOW_DAYS,
        )?;

        self.thresholds.validate()?;

        if !self.unit_divisor.is_finite() || self.unit_divisor <= 0.0 {
            return Err(ProjectionError::configuration(
                "unit_divisor",
                format!("单位换算系数必须为正，实际 {}", self.unit_divisor),
            ));
        }

        if self.product_groups.is_empty() {
            return Err(ProjectionError::configuration(
                "product_groups",
                "品类白名单不能为空",
            ));
        }

        Ok(())
    }

    /// group_id 是否在白名单内
    pub fn is_group_allowed(&self, group_id: i64) -> bool {
        self.product_groups.iter().any(|g| g.group_id == group_id)
    }

    /// 查找品类显示名
    pub fn group_display_name(&self, group_id: i64) -> Option<&str> {
        crate::domain::product_group::display_name_of(&self.product_groups, group_id)
    }
}

fn check_window(field: &str, value: u32, min: u32, max: u32) -> ProjectionResult<()> {
    if value < min || value > max {
        return Err(ProjectionError::configuration(
            field,
            format!("值 {} 超出范围 [{}, {}]", value, min, max),
        ));
    }
    Ok(())
}
