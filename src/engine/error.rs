// ==========================================
// 销售分析与采购建议系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 空输入不是错误；引擎唯一的失败模式是参数契约违反
// ==========================================

use thiserror::Error;

/// 投影引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("配置错误 (field={field}): {message}")]
    ConfigurationError { field: String, message: String },
}

impl ProjectionError {
    pub fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        ProjectionError::ConfigurationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result 类型别名
pub type ProjectionResult<T> = Result<T, ProjectionError>;
