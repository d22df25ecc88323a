// ==========================================
// 控制工程文档系统 - 导出错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV 缓冲区刷新失败: {0}")]
    Flush(String),

    #[error("导出内容不是合法 UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub type ExportResult<T> = Result<T, ExportError>;
