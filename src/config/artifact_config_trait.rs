// ==========================================
// 控制工程文档系统 - 生成物配置读取 Trait
// ==========================================
// 职责: 定义生成物写出所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入
// ==========================================

use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ArtifactConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ArtifactConfigReader: Send + Sync {
    /// 生成物输出目录
    ///
    /// # 默认值
    /// - "."
    async fn get_output_dir(&self) -> RepositoryResult<String>;

    /// 抬头 "Generated:" 的 chrono 时间格式
    ///
    /// # 默认值
    /// - "%Y-%m-%d %H:%M:%S"
    async fn get_timestamp_format(&self) -> RepositoryResult<String>;

    /// 项目未填写控制器类型时使用的名称
    ///
    /// # 默认值
    /// - "Generic PLC"
    async fn get_default_plc_type(&self) -> RepositoryResult<String>;
}
