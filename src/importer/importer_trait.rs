// ==========================================
// 控制工程文档系统 - 导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 流程: 读取 → 解析 → 映射 → 形态校验 → 批量落库
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::ImportOutcome;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// RowSource Trait
// ==========================================
// 用途: 文件 → 行序列（阶段 0）
// 实现者: DelimitedTextSource, ExcelSource, UniversalRowSource
#[async_trait]
pub trait RowSource: Send + Sync {
    /// 读取整个文件并解析为行（每行为字段序列）
    ///
    /// # 返回
    /// - Ok(rows): 非空行列表，第 0 行为表头
    /// - Err: 文件不存在 / 读取失败 / 格式不支持
    async fn read_rows(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>>;
}

// ==========================================
// RecordMapper Trait
// ==========================================
// 用途: 行序列 → 候选记录（阶段 1）
// 实现者: HeaderMapper (I/O 点), NetworkDeviceMapper (网络设备)
pub trait RecordMapper<T>: Send + Sync {
    /// 第 0 行视为表头，其余行映射为候选记录
    ///
    /// 无效行（主键单元格为空）静默丢弃，不视为错误
    fn map_rows(&self, rows: &[Vec<String>]) -> Vec<T>;
}

// ==========================================
// IoPointImporter Trait
// ==========================================
// 用途: I/O 清单导入主接口
// 实现者: IoPointImporterImpl
#[async_trait]
pub trait IoPointImporter: Send + Sync {
    /// 从文件导入 I/O 点到指定项目
    ///
    /// # 返回
    /// - ImportOutcome: 成功数量或失败原因（不会返回 Err）
    async fn import_file(&self, file_path: &Path, project_id: &str) -> ImportOutcome;

    /// 从已读入内存的文本导入
    async fn import_text(&self, text: &str, project_id: &str) -> ImportOutcome;
}

// ==========================================
// NetworkDeviceImporter Trait
// ==========================================
// 用途: 网络拓扑设备导入（同一解析器，按列位置映射）
// 实现者: NetworkDeviceImporterImpl
#[async_trait]
pub trait NetworkDeviceImporter: Send + Sync {
    async fn import_file(&self, file_path: &Path, project_id: &str) -> ImportOutcome;

    async fn import_text(&self, text: &str, project_id: &str) -> ImportOutcome;
}
