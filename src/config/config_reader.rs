// ==========================================
// 销售分析与采购建议系统 - 投影配置读取 Trait
// ==========================================
// 职责: 定义投影计算所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::projection_config::{ProjectionConfig, StockThresholds};
use crate::domain::product_group::ProductGroup;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ProjectionConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ProjectionConfigReader: Send + Sync {
    // ===== 窗口 =====

    /// 获取分析窗口天数
    ///
    /// # 默认值
    /// - 21
    async fn get_analysis_window_days(&self) -> Result<u32, Box<dyn Error>>;

    /// 获取投影窗口天数
    ///
    /// # 默认值
    /// - 15
    async fn get_projection_window_days(&self) -> Result<u32, Box<dyn Error>>;

    // ===== 库存分档 =====

    /// 获取库存天数阈值
    ///
    /// # 默认值
    /// - critical=3, low=7, adequate=15
    async fn get_stock_thresholds(&self) -> Result<StockThresholds, Box<dyn Error>>;

    // ===== 品类白名单 =====

    /// 获取品类白名单（编码 + 显示名）
    async fn get_product_groups(&self) -> Result<Vec<ProductGroup>, Box<dyn Error>>;

    /// 获取源数据单位换算系数
    ///
    /// # 默认值
    /// - 1000
    async fn get_unit_divisor(&self) -> Result<f64, Box<dyn Error>>;

    // ===== 组合 =====

    /// 组装完整投影参数（不做校验，由引擎在计算时校验）
    async fn load_projection_config(&self) -> Result<ProjectionConfig, Box<dyn Error>> {
        let analysis_window_days = self.get_analysis_window_days().await?;
        let projection_window_days = self.get_projection_window_days().await?;
        let thresholds = self.get_stock_thresholds().await?;
        let product_groups = self.get_product_groups().await?;
        let unit_divisor = self.get_unit_divisor().await?;

        Ok(ProjectionConfig {
            analysis_window_days,
            projection_window_days,
            thresholds,
            product_groups,
            unit_divisor,
        })
    }
}
