// ==========================================
// 控制工程文档系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: Display 文本即返回给调用方的失败原因
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("File read failed: {0}")]
    FileReadError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    // ===== 数据形态错误 =====
    /// 少于 2 行（表头 + 至少 1 行数据）
    #[error("File is empty or invalid")]
    EmptyOrInvalid,

    /// 映射后没有任何有效记录
    #[error("No valid data found in file")]
    NoValidData,

    // ===== 存储错误 =====
    /// 存储层错误信息原样透出
    #[error("{0}")]
    Storage(String),

    // ===== 通用错误 =====
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<RepositoryError> for ImportError {
    fn from(err: RepositoryError) -> Self {
        ImportError::Storage(err.message())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
