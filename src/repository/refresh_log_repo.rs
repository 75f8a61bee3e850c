// ==========================================
// 销售分析与采购建议系统 - 刷新日志仓储
// ==========================================
// 职责: 记录每次结果集刷新（来源、行数、窗口、时间）
// ==========================================

use crate::domain::types::DataSource;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RefreshLogEntity {
    pub refresh_id: String,
    pub data_source: DataSource,
    pub row_count: i64,
    pub analysis_window_days: u32,
    pub projection_window_days: u32,
    pub refreshed_at: String,
}

pub struct RefreshLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RefreshLogRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 追加一条刷新记录，返回 refresh_id
    pub fn append(
        &self,
        data_source: DataSource,
        row_count: usize,
        analysis_window_days: u32,
        projection_window_days: u32,
        refreshed_at: NaiveDateTime,
    ) -> RepositoryResult<String> {
        let refresh_id = uuid::Uuid::new_v4().to_string();
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO refresh_log (
                refresh_id, data_source, row_count,
                analysis_window_days, projection_window_days, refreshed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                refresh_id,
                data_source.to_string(),
                row_count as i64,
                analysis_window_days,
                projection_window_days,
                refreshed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ],
        )?;
        Ok(refresh_id)
    }

    /// 最近的刷新记录（新→旧）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<RefreshLogEntity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT refresh_id, data_source, row_count,
                   analysis_window_days, projection_window_days, refreshed_at
            FROM refresh_log
            ORDER BY refreshed_at DESC, rowid DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], map_row)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row??);
        }
        Ok(entries)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<RepositoryResult<RefreshLogEntity>> {
    let raw_source: String = row.get(1)?;
    let data_source = match raw_source.parse::<DataSource>() {
        Ok(source) => source,
        Err(message) => {
            return Ok(Err(RepositoryError::FieldValueError {
                field: "data_source".to_string(),
                message,
            }))
        }
    };

    Ok(Ok(RefreshLogEntity {
        refresh_id: row.get(0)?,
        data_source,
        row_count: row.get(2)?,
        analysis_window_days: row.get(3)?,
        projection_window_days: row.get(4)?,
        refreshed_at: row.get(5)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use chrono::NaiveDate;

    #[test]
    fn test_append_and_list_recent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let repo = RefreshLogRepository::from_connection(Arc::new(Mutex::new(conn)));

        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let first = repo
            .append(DataSource::Demo, 10, 21, 15, day.and_hms_opt(8, 0, 0).unwrap())
            .unwrap();
        let second = repo
            .append(DataSource::External, 4, 30, 7, day.and_hms_opt(9, 0, 0).unwrap())
            .unwrap();
        assert_ne!(first, second);

        let entries = repo.list_recent(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].refresh_id, second);
        assert_eq!(entries[0].data_source, DataSource::External);
        assert_eq!(entries[0].analysis_window_days, 30);
        assert_eq!(entries[1].row_count, 10);

        assert_eq!(repo.list_recent(1).unwrap().len(), 1);
    }
}
