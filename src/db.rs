// ==========================================
// 销售分析与采购建议系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供幂等建表（本地结果表只是一张键控表，不做迁移框架）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
///
/// - config_kv: 配置覆写（scope_id='global'）
/// - projection_result: 最近一次计算的结果集（整体替换）
/// - refresh_log: 刷新审计
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            description TEXT,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS projection_result (
            store_id INTEGER NOT NULL,
            group_id INTEGER NOT NULL,
            product_id INTEGER,
            product_count INTEGER NOT NULL,
            quantity_sold REAL NOT NULL,
            current_stock REAL NOT NULL,
            daily_average_sales REAL NOT NULL,
            projected_sales REAL NOT NULL,
            recommended_purchase REAL NOT NULL,
            stock_days REAL,
            stock_status TEXT,
            analysis_window_days INTEGER NOT NULL,
            projection_window_days INTEGER NOT NULL,
            computed_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_projection_result_store
            ON projection_result (store_id, group_id);

        CREATE TABLE IF NOT EXISTS refresh_log (
            refresh_id TEXT PRIMARY KEY,
            data_source TEXT NOT NULL,
            row_count INTEGER NOT NULL,
            analysis_window_days INTEGER NOT NULL,
            projection_window_days INTEGER NOT NULL,
            refreshed_at TEXT NOT NULL
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
