// ==========================================
// 销售分析与采购建议系统 - API层错误类型
// ==========================================
// 职责: 汇总引擎/导入/仓储错误，转换为调用方可读的错误消息
// ==========================================

use crate::engine::error::ProjectionError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 参数与业务规则错误
    // ==========================================
    #[error("参数配置错误 (field={field}): {message}")]
    ConfigurationError { field: String, message: String },

    #[error("分析窗口与已存结果不一致: 已存={stored}天, 请求={requested}天")]
    AnalysisWindowMismatch { stored: u32, requested: u32 },

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),

    // ==========================================
    // 导入导出错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(#[from] ImportError),

    #[error("导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ProjectionError> for ApiError {
    fn from(err: ProjectionError) -> Self {
        match err {
            ProjectionError::ConfigurationError { field, message } => {
                ApiError::ConfigurationError { field, message }
            }
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::InvalidInput(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::DatabaseError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
