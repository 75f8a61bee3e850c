// ==========================================
// Repository 层集成测试
// ==========================================
// 测试目标: 结果集整体替换、跨连接持久化、刷新审计
// ==========================================


use chrono::NaiveDate;
use purchase_advisor::config::ProjectionConfig;
use purchase_advisor::domain::{DataSource, StockStatus};
use purchase_advisor::engine::{ProjectionEngine, ProjectionOptions};
use purchase_advisor::repository::{ProjectionRepository, RefreshLogRepository, StoredWindows};
use test_helpers::{create_test_db, open_shared_connection, sample_rows};

fn windows() -> StoredWindows {
    StoredWindows {
        analysis_window_days: 21,
        projection_window_days: 15,
    }
}

#[test]
fn test_result_set_survives_reopen() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let projected = ProjectionEngine::new()
        .compute_projection(
            &sample_rows(),
            &ProjectionConfig::default(),
            ProjectionOptions::grouped_with_status(),
        )
        .unwrap();
    let computed_at = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    {
        let conn = open_shared_connection(&db_path).unwrap();
        let repo = ProjectionRepository::from_connection(conn);
        assert_eq!(repo.replace_all(&projected, windows(), computed_at).unwrap(), 4);
    }

    let conn = open_shared_connection(&db_path).unwrap();
    let repo = ProjectionRepository::from_connection(conn);

    let stored = repo.list_all().unwrap();
    assert_eq!(stored, projected);
    assert_eq!(repo.stored_windows().unwrap(), Some(windows()));

    let store_two = repo.list_by_store(2).unwrap();
    assert_eq!(store_two.len(), 2);
    assert!(store_two
        .iter()
        .any(|r| r.stock_status == Some(StockStatus::High) && r.has_unbounded_stock_days()));
}

#[test]
fn test_replace_with_empty_set_clears_table() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_shared_connection(&db_path).unwrap();
    let repo = ProjectionRepository::from_connection(conn);

    let projected = ProjectionEngine::new()
        .compute_projection(
            &sample_rows(),
            &ProjectionConfig::default(),
            ProjectionOptions::per_row(),
        )
        .unwrap();
    let now = chrono::Local::now().naive_local();

    repo.replace_all(&projected, windows(), now).unwrap();
    assert_eq!(repo.count().unwrap(), 5);

    assert_eq!(repo.replace_all(&[], windows(), now).unwrap(), 0);
    assert_eq!(repo.count().unwrap(), 0);
    assert!(repo.stored_windows().unwrap().is_none());
}

#[test]
fn test_repositories_share_one_connection() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_shared_connection(&db_path).unwrap();

    let projection_repo = ProjectionRepository::from_connection(conn.clone());
    let refresh_log_repo = RefreshLogRepository::from_connection(conn);

    let now = chrono::Local::now().naive_local();
    projection_repo.replace_all(&[], windows(), now).unwrap();
    let refresh_id = refresh_log_repo
        .append(DataSource::Cached, 0, 21, 15, now)
        .unwrap();

    let entries = refresh_log_repo.list_recent(10).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].refresh_id, refresh_id);
    assert_eq!(entries[0].data_source, DataSource::Cached);
    assert_eq!(entries[0].row_count, 0);
}
