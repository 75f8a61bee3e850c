// ==========================================
// 销售分析与采购建议系统 - CSV 导出
// ==========================================
// 职责: 结果行 / 汇总行 → CSV
// 说明: 只做格式化，不改变数值；stock_days 无穷时输出 "inf"
// ==========================================

use crate::domain::sales::{ProjectedRecord, RollupRow};
use csv::Writer;
use std::io::Write;

/// 结果行表头
pub const PROJECTED_HEADER: &[&str] = &[
    "store_id",
    "group_id",
    "product_id",
    "product_count",
    "quantity_sold",
    "current_stock",
    "daily_average_sales",
    "projected_sales",
    "recommended_purchase",
    "stock_days",
    "stock_status",
];

/// 汇总行表头
pub const ROLLUP_HEADER: &[&str] = &[
    "store_id",
    "group_id",
    "category",
    "record_count",
    "quantity_sold",
    "recommended_purchase",
];

pub struct CsvExporter;

impl CsvExporter {
    /// 写出结果行，返回数据行数（不含表头）
    pub fn write_projected<W: Write>(rows: &[ProjectedRecord], writer: W) -> csv::Result<usize> {
        let mut wtr = Writer::from_writer(writer);
        wtr.write_record(PROJECTED_HEADER)?;

        for row in rows {
            wtr.write_record(&[
                row.store_id.to_string(),
                row.group_id.to_string(),
                optional_to_string(row.product_id),
                row.product_count.to_string(),
                format_quantity(row.quantity_sold),
                format_quantity(row.current_stock),
                format_quantity(row.daily_average_sales),
                format_quantity(row.projected_sales),
                format_quantity(row.recommended_purchase),
                row.stock_days.map(format_stock_days).unwrap_or_default(),
                optional_to_string(row.stock_status),
            ])?;
        }

        wtr.flush()?;
        Ok(rows.len())
    }

    /// 写出汇总行，返回数据行数（不含表头）
    pub fn write_rollup<W: Write>(rows: &[RollupRow], writer: W) -> csv::Result<usize> {
        let mut wtr = Writer::from_writer(writer);
        wtr.write_record(ROLLUP_HEADER)?;

        for row in rows {
            wtr.write_record(&[
                optional_to_string(row.store_id),
                optional_to_string(row.group_id),
                row.category.clone().unwrap_or_default(),
                row.record_count.to_string(),
                format_quantity(row.quantity_sold),
                format_quantity(row.recommended_purchase),
            ])?;
        }

        wtr.flush()?;
        Ok(rows.len())
    }
}

fn optional_to_string<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// 两位小数，与报表展示一致
fn format_quantity(value: f64) -> String {
    format!("{:.2}", value)
}

fn format_stock_days(days: f64) -> String {
    if days.is_infinite() {
        "inf".to_string()
    } else {
        format!("{:.2}", days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::StockStatus;

    fn projected(stock_days: Option<f64>, status: Option<StockStatus>) -> ProjectedRecord {
        ProjectedRecord {
            store_id: 1,
            group_id: 211604,
            product_id: None,
            product_count: 3,
            quantity_sold: 2100.0,
            current_stock: 500.0,
            daily_average_sales: 100.0,
            projected_sales: 1500.0,
            recommended_purchase: 1000.0,
            stock_days,
            stock_status: status,
        }
    }

    #[test]
    fn test_write_projected() {
        let mut buf = Vec::new();
        let n = CsvExporter::write_projected(
            &[
                projected(Some(5.0), Some(StockStatus::Low)),
                projected(Some(f64::INFINITY), Some(StockStatus::High)),
                projected(None, None),
            ],
            &mut buf,
        )
        .unwrap();
        assert_eq!(n, 3);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("store_id,group_id,product_id"));
        assert_eq!(
            lines[1],
            "1,211604,,3,2100.00,500.00,100.00,1500.00,1000.00,5.00,LOW"
        );
        assert!(lines[2].ends_with(",inf,HIGH"));
        assert!(lines[3].ends_with("1000.00,,"));
    }

    #[test]
    fn test_write_rollup() {
        let rows = vec![RollupRow {
            store_id: None,
            group_id: Some(211604),
            category: Some("ÓLEO".to_string()),
            record_count: 2,
            quantity_sold: 300.5,
            recommended_purchase: 120.0,
        }];

        let mut buf = Vec::new();
        CsvExporter::write_rollup(&rows, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "store_id,group_id,category,record_count,quantity_sold,recommended_purchase\n\
             ,211604,ÓLEO,2,300.50,120.00\n"
        );
    }
}
