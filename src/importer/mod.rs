// ==========================================
// 销售分析与采购建议系统 - 导入层
// ==========================================
// 职责: 外部表格数据 → SalesRecord
// 支持: Excel, CSV
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod sales_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::SalesFieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, UniversalFileParser};
pub use sales_importer::SalesImporter;
