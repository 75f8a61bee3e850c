// ==========================================
// ProjectionEngine 集成测试
// ==========================================
// 测试目标: 投影计算的不变量、边界分档与聚合顺序敏感性
// ==========================================


use purchase_advisor::config::ProjectionConfig;
use purchase_advisor::domain::{RollupKey, SalesRecord, StockStatus};
use purchase_advisor::engine::{
    ProjectionEngine, ProjectionError, ProjectionOptions, StockStatusClassifier, SummaryEngine,
};
use purchase_advisor::logging;
use test_helpers::{assert_close, raw_row, sample_rows, ACUCAR, LEITE, OLEO};

fn engine() -> ProjectionEngine {
    ProjectionEngine::new()
}

fn config(analysis: u32, projection: u32) -> ProjectionConfig {
    ProjectionConfig::with_windows(analysis, projection).expect("valid windows")
}

// ==========================================
// 参考示例
// ==========================================

#[test]
fn test_reference_example_per_row() {
    logging::init_test();

    let rows = vec![SalesRecord::new(1, OLEO, Some(10), 2_100_000.0, 500_000.0)];
    let result = engine()
        .compute_projection(&rows, &config(21, 15), ProjectionOptions::per_row())
        .unwrap();

    assert_eq!(result.len(), 1);
    let r = &result[0];
    assert_close(r.quantity_sold, 2100.0);
    assert_close(r.current_stock, 500.0);
    assert_close(r.daily_average_sales, 100.0);
    assert_close(r.projected_sales, 1500.0);
    assert_close(r.recommended_purchase, 1000.0);
}

#[test]
fn test_zero_sales_zero_stock_is_high_with_infinite_days() {
    let rows = vec![raw_row(1, OLEO, Some(10), 0.0, 0.0)];
    let result = engine()
        .compute_projection(&rows, &config(21, 15), ProjectionOptions::grouped_with_status())
        .unwrap();

    let r = &result[0];
    assert_eq!(r.daily_average_sales, 0.0);
    assert_eq!(r.projected_sales, 0.0);
    assert_eq!(r.recommended_purchase, 0.0);
    assert_eq!(r.stock_days, Some(f64::INFINITY));
    assert_eq!(r.stock_status, Some(StockStatus::High));
    assert!(r.has_unbounded_stock_days());
}

// ==========================================
// 不变量
// ==========================================

#[test]
fn test_recommended_purchase_never_negative() {
    let rows = vec![
        raw_row(1, OLEO, Some(1), 21.0, 1_000_000.0),
        raw_row(1, LEITE, Some(2), 0.0, 5.0),
        raw_row(2, ACUCAR, Some(3), 9_000.0, 0.0),
    ];

    for options in [ProjectionOptions::per_row(), ProjectionOptions::grouped_with_status()] {
        let result = engine()
            .compute_projection(&rows, &config(21, 15), options)
            .unwrap();
        assert!(result.iter().all(|r| r.recommended_purchase >= 0.0));
    }
}

#[test]
fn test_daily_average_matches_definition_for_all_windows() {
    let rows = sample_rows();
    for analysis in [7, 21, 45, 90] {
        for projection in [1, 15, 60] {
            let cfg = config(analysis, projection);
            let result = engine()
                .compute_projection(&rows, &cfg, ProjectionOptions::per_row())
                .unwrap();
            for r in &result {
                assert_close(r.daily_average_sales, r.quantity_sold / f64::from(analysis));
                assert_close(r.projected_sales, r.daily_average_sales * f64::from(projection));
                assert_close(
                    r.recommended_purchase,
                    (r.projected_sales - r.current_stock).max(0.0),
                );
            }
        }
    }
}

#[test]
fn test_output_cardinality() {
    let rows = sample_rows();

    let per_row = engine()
        .compute_projection(&rows, &config(21, 15), ProjectionOptions::per_row())
        .unwrap();
    assert_eq!(per_row.len(), rows.len());

    // (1, OLEO), (1, LEITE), (2, OLEO), (2, ACUCAR)
    let grouped = engine()
        .compute_projection(&rows, &config(21, 15), ProjectionOptions::grouped_with_status())
        .unwrap();
    assert_eq!(grouped.len(), 4);
    assert_eq!(grouped[0].product_count, 2);
}

// ==========================================
// 聚合顺序敏感性
// ==========================================

#[test]
fn test_grouping_is_associative_over_quantities_but_not_recommendation() {
    let cfg = config(21, 15);
    let set_a = vec![raw_row(1, OLEO, Some(1), 2100.0, 0.0)];
    let set_b = vec![raw_row(1, OLEO, Some(2), 0.0, 1500.0)];
    let combined: Vec<SalesRecord> = set_a.iter().chain(set_b.iter()).cloned().collect();

    let grouped_opts = ProjectionOptions::grouped_with_status();
    let a = engine().compute_projection(&set_a, &cfg, grouped_opts).unwrap();
    let b = engine().compute_projection(&set_b, &cfg, grouped_opts).unwrap();
    let together = engine().compute_projection(&combined, &cfg, grouped_opts).unwrap();

    assert_eq!(together.len(), 1);
    let t = &together[0];

    // 数量可加
    assert_close(t.quantity_sold, a[0].quantity_sold + b[0].quantity_sold);
    assert_close(t.current_stock, a[0].current_stock + b[0].current_stock);

    // 建议量在聚合后计算，不等于各自建议量之和
    // a: 100/天 × 15 = 1500 - 0 = 1500；b: 0 - 1500 → 0；合并: 1500 - 1500 = 0
    assert_close(a[0].recommended_purchase, 1500.0);
    assert_close(b[0].recommended_purchase, 0.0);
    assert_close(t.recommended_purchase, 0.0);
    assert!(
        (t.recommended_purchase - (a[0].recommended_purchase + b[0].recommended_purchase)).abs()
            > 1.0
    );
}

#[test]
fn test_per_row_and_grouped_recommendations_differ() {
    let cfg = config(21, 15);
    let rows = vec![
        raw_row(1, OLEO, Some(1), 2100.0, 0.0),
        raw_row(1, OLEO, Some(2), 0.0, 1500.0),
    ];

    let per_row: f64 = engine()
        .compute_projection(&rows, &cfg, ProjectionOptions::per_row())
        .unwrap()
        .iter()
        .map(|r| r.recommended_purchase)
        .sum();
    let grouped: f64 = engine()
        .compute_projection(&rows, &cfg, ProjectionOptions::grouped_with_status())
        .unwrap()
        .iter()
        .map(|r| r.recommended_purchase)
        .sum();

    assert_close(per_row, 1500.0);
    assert_close(grouped, 0.0);
}

// ==========================================
// 库存分档边界
// ==========================================

#[test]
fn test_stock_status_boundaries() {
    let classifier = StockStatusClassifier::default();

    assert_eq!(classifier.classify(0.0), StockStatus::Critical);
    assert_eq!(classifier.classify(2.999), StockStatus::Critical);
    assert_eq!(classifier.classify(3.0), StockStatus::Low);
    assert_eq!(classifier.classify(6.999), StockStatus::Low);
    assert_eq!(classifier.classify(7.0), StockStatus::Adequate);
    assert_eq!(classifier.classify(14.999), StockStatus::Adequate);
    assert_eq!(classifier.classify(15.0), StockStatus::High);
    assert_eq!(classifier.classify(f64::INFINITY), StockStatus::High);
}

#[test]
fn test_stock_status_from_projection() {
    // 日均 10：库存 30 → 3 天 (Low)，70 → 7 天 (Adequate)，150 → 15 天 (High)，20 → 2 天 (Critical)
    let cfg = config(21, 15);
    let rows = vec![
        raw_row(1, OLEO, None, 210.0, 30.0),
        raw_row(2, OLEO, None, 210.0, 70.0),
        raw_row(3, OLEO, None, 210.0, 150.0),
        raw_row(4, OLEO, None, 210.0, 20.0),
    ];

    let result = engine()
        .compute_projection(&rows, &cfg, ProjectionOptions::grouped_with_status())
        .unwrap();
    let statuses: Vec<StockStatus> = result.iter().filter_map(|r| r.stock_status).collect();

    assert_eq!(
        statuses,
        vec![
            StockStatus::Low,
            StockStatus::Adequate,
            StockStatus::High,
            StockStatus::Critical
        ]
    );
}

// ==========================================
// 空输入与参数错误
// ==========================================

#[test]
fn test_empty_input_yields_empty_output() {
    let result = engine()
        .compute_projection(&[], &config(21, 15), ProjectionOptions::grouped_with_status())
        .unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_out_of_range_windows_are_configuration_errors() {
    for (analysis, projection) in [(0, 15), (6, 15), (91, 15), (21, 0), (21, 61)] {
        assert!(
            matches!(
                ProjectionConfig::with_windows(analysis, projection),
                Err(ProjectionError::ConfigurationError { .. })
            ),
            "({analysis}, {projection}) should be rejected"
        );

        let cfg = ProjectionConfig {
            analysis_window_days: analysis,
            projection_window_days: projection,
            ..ProjectionConfig::default()
        };
        let err = engine()
            .compute_projection(&sample_rows(), &cfg, ProjectionOptions::per_row())
            .unwrap_err();
        assert!(matches!(err, ProjectionError::ConfigurationError { .. }));
    }

    // 边界值本身合法
    for (analysis, projection) in [(7, 1), (90, 60)] {
        assert!(ProjectionConfig::with_windows(analysis, projection).is_ok());
    }
}

// ==========================================
// 汇总
// ==========================================

#[test]
fn test_rollups_over_projection() {
    let cfg = config(21, 15);
    let projected = engine()
        .compute_projection(&sample_rows(), &cfg, ProjectionOptions::grouped_with_status())
        .unwrap();
    let summary = SummaryEngine::new();

    let by_category = summary.rollup(&projected, RollupKey::Category, &cfg.product_groups);
    assert_eq!(by_category.len(), 3);
    let oleo = by_category
        .iter()
        .find(|r| r.group_id == Some(OLEO))
        .unwrap();
    assert_eq!(oleo.category.as_deref(), Some("ÓLEO"));
    assert_eq!(oleo.record_count, 2);
    assert_close(oleo.quantity_sold, 1500.0 + 600.0 + 210.0);

    let by_store = summary.rollup(&projected, RollupKey::Store, &cfg.product_groups);
    assert_eq!(by_store.len(), 2);
    assert!(by_store.iter().all(|r| r.group_id.is_none()));

    let (total_sold, total_purchase) = summary.totals(&projected);
    let store_sum: f64 = by_store.iter().map(|r| r.quantity_sold).sum();
    let store_purchase: f64 = by_store.iter().map(|r| r.recommended_purchase).sum();
    assert_close(total_sold, store_sum);
    assert_close(total_purchase, store_purchase);

    assert!(summary
        .rollup(&[], RollupKey::StoreCategory, &cfg.product_groups)
        .is_empty());
}
