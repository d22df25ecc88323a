// ==========================================
// 控制工程文档系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{ArtifactApi, ConfigApi, ImportApi, IoPointApi, ProjectApi};
use crate::config::{ArtifactConfigReader, ConfigManager};
use crate::db::{init_schema, open_sqlite_connection, read_schema_version};
use crate::repository::{
    CauseEffectRepository, IoPointRepository, NetworkDeviceRepository, ProjectRepository,
};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "CONTROL_DOCS_DB";

/// 应用状态
///
/// 所有仓储共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 初始化后的 schema 版本
    pub schema_version: Option<i64>,

    pub project_api: Arc<ProjectApi>,
    pub io_point_api: Arc<IoPointApi>,
    pub import_api: Arc<ImportApi>,
    pub artifact_api: Arc<ArtifactApi>,
    pub config_api: Arc<ConfigApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并初始化 schema（幂等）
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;
        let schema_version =
            read_schema_version(&conn).map_err(|e| format!("读取 schema 版本失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let project_repo = Arc::new(ProjectRepository::from_connection(conn.clone()));
        let io_point_repo = Arc::new(IoPointRepository::from_connection(conn.clone()));
        let rule_repo = Arc::new(CauseEffectRepository::from_connection(conn.clone()));
        let device_repo = Arc::new(NetworkDeviceRepository::from_connection(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let artifact_config: Arc<dyn ArtifactConfigReader> = config_manager.clone();

        // ==========================================
        // 初始化API层
        // ==========================================
        let project_api = Arc::new(ProjectApi::new(project_repo));
        let io_point_api = Arc::new(IoPointApi::new(
            io_point_repo.clone(),
            rule_repo.clone(),
            device_repo.clone(),
        ));
        let import_api = Arc::new(ImportApi::new(conn));
        let artifact_api = Arc::new(ArtifactApi::new(
            io_point_repo,
            rule_repo,
            device_repo,
            artifact_config,
        ));
        let config_api = Arc::new(ConfigApi::new(config_manager));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            schema_version,
            project_api,
            io_point_api,
            import_api,
            artifact_api,
            config_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 CONTROL_DOCS_DB → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./control_docs.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("control-docs");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("control_docs.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_app_state_initialises_schema() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let db_path = file.path().to_string_lossy().to_string();

        let state = AppState::new(db_path).unwrap();

        assert_eq!(state.schema_version, Some(crate::db::CURRENT_SCHEMA_VERSION));
        assert!(state.project_api.list_projects().unwrap().is_empty());
    }
}
