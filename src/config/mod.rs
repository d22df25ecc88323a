// ==========================================
// 控制工程文档系统 - 配置层
// ==========================================
// 职责: 系统配置管理
// 存储: config_kv 表
// ==========================================

pub mod artifact_config_trait;
pub mod config_manager;

// 重导出核心配置管理器
pub use artifact_config_trait::ArtifactConfigReader;
pub use config_manager::{config_keys, is_valid_timestamp_format, ConfigManager};
