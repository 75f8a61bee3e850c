// ==========================================
// 销售分析与采购建议系统 - 投影结果仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 语义: 每次刷新整体替换结果集（先删后插，同一事务），不做逐行更新
// ==========================================

use crate::domain::sales::ProjectedRecord;
use crate::domain::types::StockStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT
        store_id, group_id, product_id, product_count,
        quantity_sold, current_stock, daily_average_sales,
        projected_sales, recommended_purchase, stock_days, stock_status
    FROM projection_result
"#;

/// 结果集计算时使用的窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredWindows {
    pub analysis_window_days: u32,
    pub projection_window_days: u32,
}

// ==========================================
// ProjectionRepository - 投影结果仓储
// ==========================================
pub struct ProjectionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProjectionRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 整体替换结果集
    ///
    /// # 参数
    /// - records: 新结果集
    /// - windows: 计算所用窗口
    /// - computed_at: 计算时间
    ///
    /// # 返回
    /// - Ok(usize): 写入行数
    pub fn replace_all(
        &self,
        records: &[ProjectedRecord],
        windows: StoredWindows,
        computed_at: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute("DELETE FROM projection_result", [])?;

        let computed_at_str = computed_at.format("%Y-%m-%d %H:%M:%S").to_string();
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO projection_result (
                    store_id, group_id, product_id, product_count,
                    quantity_sold, current_stock, daily_average_sales,
                    projected_sales, recommended_purchase, stock_days, stock_status,
                    analysis_window_days, projection_window_days, computed_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                "#,
            )?;

            for record in records {
                stmt.execute(params![
                    record.store_id,
                    record.group_id,
                    record.product_id,
                    record.product_count,
                    record.quantity_sold,
                    record.current_stock,
                    record.daily_average_sales,
                    record.projected_sales,
                    record.recommended_purchase,
                    encode_stock_days(record.stock_days),
                    record.stock_status.map(|s| s.to_string()),
                    windows.analysis_window_days,
                    windows.projection_window_days,
                    computed_at_str,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(records.len())
    }

    /// 查询全部结果（按 门店、品类、商品 排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<ProjectedRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY store_id, group_id, product_id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map([], map_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row??);
        }
        Ok(records)
    }

    /// 按门店查询
    pub fn list_by_store(&self, store_id: i64) -> RepositoryResult<Vec<ProjectedRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE store_id = ?1 ORDER BY group_id, product_id",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params![store_id], map_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row??);
        }
        Ok(records)
    }

    /// 结果行数
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM projection_result", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// 结果集计算所用窗口（空表返回 None）
    pub fn stored_windows(&self) -> RepositoryResult<Option<StoredWindows>> {
        let conn = self.get_conn()?;
        let windows = conn
            .query_row(
                "SELECT analysis_window_days, projection_window_days FROM projection_result LIMIT 1",
                [],
                |row| {
                    Ok(StoredWindows {
                        analysis_window_days: row.get(0)?,
                        projection_window_days: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(windows)
    }

    /// 清空结果集
    pub fn clear(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM projection_result", [])?)
    }
}

/// stock_days 为 +inf 时落库为 NULL
/// 回读约定: stock_status 非空且 stock_days 为 NULL 即 +inf
fn encode_stock_days(stock_days: Option<f64>) -> Option<f64> {
    stock_days.filter(|d| d.is_finite())
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<RepositoryResult<ProjectedRecord>> {
    let stock_days: Option<f64> = row.get(9)?;
    let stock_status_raw: Option<String> = row.get(10)?;

    let stock_status = match stock_status_raw {
        None => None,
        Some(raw) => match raw.parse::<StockStatus>() {
            Ok(status) => Some(status),
            Err(message) => {
                return Ok(Err(RepositoryError::FieldValueError {
                    field: "stock_status".to_string(),
                    message,
                }))
            }
        },
    };

    let stock_days = match (stock_days, stock_status) {
        (Some(days), _) => Some(days),
        (None, Some(_)) => Some(f64::INFINITY),
        (None, None) => None,
    };

    Ok(Ok(ProjectedRecord {
        store_id: row.get(0)?,
        group_id: row.get(1)?,
        product_id: row.get(2)?,
        product_count: row.get(3)?,
        quantity_sold: row.get(4)?,
        current_stock: row.get(5)?,
        daily_average_sales: row.get(6)?,
        projected_sales: row.get(7)?,
        recommended_purchase: row.get(8)?,
        stock_days,
        stock_status,
    }))
}
