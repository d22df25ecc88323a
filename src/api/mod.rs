// ==========================================
// 控制工程文档系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行调用
// ==========================================

pub mod artifact_api;
pub mod config_api;
pub mod error;
pub mod import_api;
pub mod io_point_api;
pub mod project_api;

// 重导出核心类型
pub use artifact_api::{ArtifactApi, ArtifactKind, ProjectSnapshot, WrittenArtifact};
pub use config_api::{ConfigApi, ConfigItem};
pub use error::{ApiError, ApiResult};
pub use import_api::ImportApi;
pub use io_point_api::{IoPointApi, IoPointPatch, RuleByTags, RulePatch};
pub use project_api::ProjectApi;
