// ==========================================
// 控制工程文档系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod cause_effect_repo;
pub mod error;
pub mod import_repo;
pub mod io_point_repo;
pub mod network_device_repo;
pub mod project_repo;

// 重导出核心仓储
pub use cause_effect_repo::CauseEffectRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use import_repo::{IoPointImportRepository, NetworkDeviceImportRepository};
pub use io_point_repo::IoPointRepository;
pub use network_device_repo::NetworkDeviceRepository;
pub use project_repo::ProjectRepository;

use chrono::{DateTime, Utc};

/// 解析 RFC3339 时间戳列（写入时统一使用 to_rfc3339）
pub(crate) fn parse_utc(col: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(e))
        })
}
