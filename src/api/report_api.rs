// ==========================================
// 销售分析与采购建议系统 - 采购建议报表 API
// ==========================================
// 职责: 刷新结果集、读取报表、分组汇总、状态查询、CSV 导出
// 流程: 数据来源 → ProjectionEngine → ProjectionRepository → 报表/导出
// ==========================================

use std::io::Write;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::api::error::{ApiError, ApiResult};
use crate::api::report_cache::{ReportCache, ReportCacheKey};
use crate::config::config_manager::ConfigManager;
use crate::config::projection_config::ProjectionConfig;
use crate::domain::sales::{ProjectedRecord, RollupRow, SalesAggregate, SalesRecord};
use crate::domain::types::{DataSource, RollupKey};
use crate::engine::{DemoDataGenerator, ProjectionEngine, ProjectionOptions, SummaryEngine};
use crate::exporter::CsvExporter;
use crate::repository::{
    ProjectionRepository, RefreshLogEntity, RefreshLogRepository, StoredWindows,
};

/// 状态查询中返回的最近刷新记录条数
const RECENT_REFRESH_LIMIT: usize = 5;

// ==========================================
// ReportStatus - 报表状态
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ReportStatus {
    pub row_count: usize,
    pub last_refresh_at: Option<NaiveDateTime>,
    pub data_source: Option<DataSource>,
    pub stored_analysis_window_days: Option<u32>,
    pub stored_projection_window_days: Option<u32>,
    pub total_quantity_sold: f64,
    pub total_recommended_purchase: f64,
    pub by_category: Vec<RollupRow>,
    #[serde(skip)]
    pub recent_refreshes: Vec<RefreshLogEntity>,
}

// ==========================================
// ReportApi - 采购建议报表 API
// ==========================================

/// 采购建议报表API
///
/// 职责：
/// 1. 刷新：外部行/模拟行 → 按 门店+品类 投影并分档 → 整体替换本地结果表
/// 2. 读取：本地结果表回读（可按门店过滤），按请求的参数重算投影与分档（带 TTL 缓存）
/// 3. 汇总与导出
pub struct ReportApi {
    projection_repo: Arc<ProjectionRepository>,
    refresh_log_repo: Arc<RefreshLogRepository>,
    config_manager: Arc<ConfigManager>,
    projection_engine: ProjectionEngine,
    summary_engine: SummaryEngine,
    demo_generator: DemoDataGenerator,
    cache: ReportCache,
    fallback_to_demo: bool,
}

impl ReportApi {
    /// 创建新的ReportApi实例（本地结果为空时默认回退到模拟数据）
    pub fn new(
        projection_repo: Arc<ProjectionRepository>,
        refresh_log_repo: Arc<RefreshLogRepository>,
        config_manager: Arc<ConfigManager>,
        cache: ReportCache,
    ) -> Self {
        Self {
            projection_repo,
            refresh_log_repo,
            config_manager,
            projection_engine: ProjectionEngine::new(),
            summary_engine: SummaryEngine::new(),
            demo_generator: DemoDataGenerator::new(),
            cache,
            fallback_to_demo: true,
        }
    }

    pub fn with_fallback_to_demo(mut self, enabled: bool) -> Self {
        self.fallback_to_demo = enabled;
        self
    }

    pub fn with_demo_generator(mut self, generator: DemoDataGenerator) -> Self {
        self.demo_generator = generator;
        self
    }

    // ==========================================
    // 刷新
    // ==========================================

    /// 由销售行刷新本地结果集
    ///
    /// # 参数
    /// - records: 原始单位的销售行
    /// - source: 数据来源（写入刷新元信息）
    /// - config: 投影参数
    ///
    /// # 返回
    /// - Ok(usize): 写入的结果行数
    /// - Err(ApiError): 参数错误 / 数据库错误
    pub fn refresh_from_records(
        &self,
        records: &[SalesRecord],
        source: DataSource,
        config: &ProjectionConfig,
    ) -> ApiResult<usize> {
        let projected = self.projection_engine.compute_projection(
            records,
            config,
            ProjectionOptions::grouped_with_status(),
        )?;

        let now = chrono::Local::now().naive_local();
        let windows = StoredWindows {
            analysis_window_days: config.analysis_window_days,
            projection_window_days: config.projection_window_days,
        };
        let row_count = self.projection_repo.replace_all(&projected, windows, now)?;

        self.config_manager
            .record_refresh(source, now)
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        self.refresh_log_repo.append(
            source,
            row_count,
            config.analysis_window_days,
            config.projection_window_days,
            now,
        )?;
        self.cache.invalidate();

        tracing::info!(
            data_source = %source,
            input_rows = records.len(),
            row_count,
            analysis_window_days = config.analysis_window_days,
            projection_window_days = config.projection_window_days,
            "结果集已刷新"
        );

        Ok(row_count)
    }

    /// 以模拟数据刷新本地结果集
    pub fn refresh_demo(&self, config: &ProjectionConfig) -> ApiResult<usize> {
        let records = self.demo_generator.generate(config);
        self.refresh_from_records(&records, DataSource::Demo, config)
    }

    // ==========================================
    // 读取
    // ==========================================

    /// 读取报表（全部门店）
    ///
    /// # 规则
    /// - 本地结果为空且开启回退 → 先以模拟数据刷新
    /// - 已存结果按已存分析窗口汇总，请求的分析窗口必须一致
    /// - 投影字段与库存分档按本次调用的参数重算
    ///
    /// # 返回
    /// - Ok(Vec<ProjectedRecord>): 按 (store_id, group_id) 升序
    /// - Err(AnalysisWindowMismatch): 分析窗口与已存结果不一致
    pub fn load_report(&self, config: &ProjectionConfig) -> ApiResult<Vec<ProjectedRecord>> {
        self.load_scoped_report(config, None)
    }

    /// 读取单个门店的报表
    pub fn load_store_report(
        &self,
        config: &ProjectionConfig,
        store_id: i64,
    ) -> ApiResult<Vec<ProjectedRecord>> {
        self.load_scoped_report(config, Some(store_id))
    }

    /// 读取报表，store_id 为 None 时覆盖全部门店
    pub fn load_scoped_report(
        &self,
        config: &ProjectionConfig,
        store_id: Option<i64>,
    ) -> ApiResult<Vec<ProjectedRecord>> {
        config.validate()?;

        let aggregates = self.stored_aggregates(config, store_id)?;
        Ok(self
            .projection_engine
            .project_aggregates(&aggregates, config, true)?)
    }

    /// 已存汇总行（带缓存）
    ///
    /// 缓存只保存未投影的汇总行，投影与分档不入缓存
    fn stored_aggregates(
        &self,
        config: &ProjectionConfig,
        store_id: Option<i64>,
    ) -> ApiResult<Arc<Vec<SalesAggregate>>> {
        let key = ReportCacheKey::new(config.analysis_window_days, store_id);
        if let Some(rows) = self.cache.get(key) {
            tracing::debug!(
                analysis_window_days = key.analysis_window_days,
                store_id = ?key.store_id,
                "报表缓存命中"
            );
            return Ok(rows);
        }

        let stored = match self.projection_repo.stored_windows()? {
            Some(windows) => windows,
            None if self.fallback_to_demo => {
                tracing::warn!("本地结果集为空，使用模拟数据");
                self.refresh_demo(config)?;
                StoredWindows {
                    analysis_window_days: config.analysis_window_days,
                    projection_window_days: config.projection_window_days,
                }
            }
            None => return Ok(Arc::new(Vec::new())),
        };

        if stored.analysis_window_days != config.analysis_window_days {
            return Err(ApiError::AnalysisWindowMismatch {
                stored: stored.analysis_window_days,
                requested: config.analysis_window_days,
            });
        }

        let records = match store_id {
            Some(id) => self.projection_repo.list_by_store(id)?,
            None => self.projection_repo.list_all()?,
        };
        let aggregates = records.iter().map(SalesAggregate::from).collect();

        Ok(self.cache.insert(key, aggregates))
    }

    // ==========================================
    // 汇总
    // ==========================================

    /// 按指定维度汇总报表
    pub fn summary(&self, config: &ProjectionConfig, key: RollupKey) -> ApiResult<Vec<RollupRow>> {
        self.scoped_summary(config, key, None)
    }

    /// 按指定维度汇总，store_id 为 None 时覆盖全部门店
    pub fn scoped_summary(
        &self,
        config: &ProjectionConfig,
        key: RollupKey,
        store_id: Option<i64>,
    ) -> ApiResult<Vec<RollupRow>> {
        let rows = self.load_scoped_report(config, store_id)?;
        Ok(self
            .summary_engine
            .rollup(&rows, key, &config.product_groups))
    }

    /// 按品类汇总
    pub fn category_summary(&self, config: &ProjectionConfig) -> ApiResult<Vec<RollupRow>> {
        self.summary(config, RollupKey::Category)
    }

    /// 按门店汇总
    pub fn store_summary(&self, config: &ProjectionConfig) -> ApiResult<Vec<RollupRow>> {
        self.summary(config, RollupKey::Store)
    }

    /// 按 门店+品类 汇总
    pub fn store_category_summary(&self, config: &ProjectionConfig) -> ApiResult<Vec<RollupRow>> {
        self.summary(config, RollupKey::StoreCategory)
    }

    // ==========================================
    // 状态
    // ==========================================

    /// 本地结果集状态（不触发模拟数据回退）
    ///
    /// store_id 给定时行数、合计与品类汇总只统计该门店
    pub fn status_check(
        &self,
        config: &ProjectionConfig,
        store_id: Option<i64>,
    ) -> ApiResult<ReportStatus> {
        let stored_rows = match store_id {
            Some(id) => self.projection_repo.list_by_store(id)?,
            None => self.projection_repo.list_all()?,
        };
        let stored_windows = self.projection_repo.stored_windows()?;

        let last_refresh_at = self
            .config_manager
            .get_last_refresh_at()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let data_source = self
            .config_manager
            .get_data_source()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let (total_quantity_sold, total_recommended_purchase) =
            self.summary_engine.totals(&stored_rows);
        let by_category =
            self.summary_engine
                .rollup(&stored_rows, RollupKey::Category, &config.product_groups);
        let recent_refreshes = self.refresh_log_repo.list_recent(RECENT_REFRESH_LIMIT)?;

        Ok(ReportStatus {
            row_count: stored_rows.len(),
            last_refresh_at,
            data_source,
            stored_analysis_window_days: stored_windows.map(|w| w.analysis_window_days),
            stored_projection_window_days: stored_windows.map(|w| w.projection_window_days),
            total_quantity_sold,
            total_recommended_purchase,
            by_category,
            recent_refreshes,
        })
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 导出报表明细为 CSV
    pub fn export_projected_csv<W: Write>(
        &self,
        config: &ProjectionConfig,
        store_id: Option<i64>,
        writer: W,
    ) -> ApiResult<usize> {
        let rows = self.load_scoped_report(config, store_id)?;
        Ok(CsvExporter::write_projected(&rows, writer)?)
    }

    /// 导出汇总为 CSV
    pub fn export_summary_csv<W: Write>(
        &self,
        config: &ProjectionConfig,
        key: RollupKey,
        store_id: Option<i64>,
        writer: W,
    ) -> ApiResult<usize> {
        let rows = self.scoped_summary(config, key, store_id)?;
        Ok(CsvExporter::write_rollup(&rows, writer)?)
    }
}
