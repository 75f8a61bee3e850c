// ==========================================
// 销售分析与采购建议系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
///
/// 各变体中的 `row` 为数据行序号：从 1 开始，不含表头行与被跳过的空行，
/// 因此与 CSV 文件行号相差表头所占的一行
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 数据映射错误 =====
    #[error("缺少必需列: {0}")]
    MissingColumn(String),

    #[error("必填字段为空 (数据行 {row}, 字段 {field})")]
    MissingValue { row: usize, field: String },

    #[error("类型转换失败 (数据行 {row}, 字段 {field}): {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },

    // ===== 数据质量错误 =====
    #[error("数量不能为负 (数据行 {row}, 字段 {field}): {value}")]
    NegativeQuantity { row: usize, field: String, value: f64 },

    #[error("品类不在白名单内 (数据行 {row}): group_id={group_id}")]
    GroupNotAllowed { row: usize, group_id: i64 },
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
