// ==========================================
// 销售分析与采购建议系统 - 导出层
// ==========================================

pub mod csv_exporter;

pub use csv_exporter::CsvExporter;
