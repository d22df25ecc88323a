// ==========================================
// 控制工程文档系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::artifact_config_trait::ArtifactConfigReader;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::format::{Item, StrftimeItems};
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 读取配置值，不存在时返回默认值
    pub fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global 配置（UPSERT）
    ///
    /// # 返回
    /// - Err(FieldValueError): 取值未通过校验（如非法的时间格式）
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        validate_value(key, value)?;

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        debug!(key = %key, value = %value, "配置已更新");
        Ok(())
    }

    /// 获取配置快照（JSON）
    ///
    /// 说明：未写入的已知配置项以默认值出现在快照中
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        let mut config_map: BTreeMap<String, String> = config_keys::DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map))
            .map_err(|e| RepositoryError::InternalError(e.to_string()))
    }
}

/// 时间格式串是否能被 chrono 完整识别
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !format.is_empty() && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

fn validate_value(key: &str, value: &str) -> RepositoryResult<()> {
    let valid = match key {
        config_keys::TIMESTAMP_FORMAT => is_valid_timestamp_format(value),
        config_keys::OUTPUT_DIR => !value.trim().is_empty(),
        _ => true,
    };

    if valid {
        Ok(())
    } else {
        Err(RepositoryError::FieldValueError {
            field: key.to_string(),
            message: format!("非法配置值: {:?}", value),
        })
    }
}

#[async_trait]
impl ArtifactConfigReader for ConfigManager {
    async fn get_output_dir(&self) -> RepositoryResult<String> {
        self.get_config_or_default(config_keys::OUTPUT_DIR, config_keys::DEFAULT_OUTPUT_DIR)
    }

    async fn get_timestamp_format(&self) -> RepositoryResult<String> {
        let format =
            self.get_config_or_default(config_keys::TIMESTAMP_FORMAT, config_keys::DEFAULT_TIMESTAMP_FORMAT)?;

        // 库中存在非法格式时回落默认值，避免渲染时出错
        if is_valid_timestamp_format(&format) {
            Ok(format)
        } else {
            warn!(format = %format, "时间格式非法，使用默认值");
            Ok(config_keys::DEFAULT_TIMESTAMP_FORMAT.to_string())
        }
    }

    async fn get_default_plc_type(&self) -> RepositoryResult<String> {
        self.get_config_or_default(config_keys::DEFAULT_PLC_TYPE, config_keys::DEFAULT_PLC_TYPE_VALUE)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 生成物
    pub const OUTPUT_DIR: &str = "artifact.output_dir";
    pub const DEFAULT_OUTPUT_DIR: &str = ".";

    // 报告抬头
    pub const TIMESTAMP_FORMAT: &str = "report.timestamp_format";
    pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    // 项目
    pub const DEFAULT_PLC_TYPE: &str = "project.default_plc_type";
    pub const DEFAULT_PLC_TYPE_VALUE: &str = "Generic PLC";

    /// 已知配置项及默认值
    pub const DEFAULTS: [(&str, &str); 3] = [
        (OUTPUT_DIR, DEFAULT_OUTPUT_DIR),
        (TIMESTAMP_FORMAT, DEFAULT_TIMESTAMP_FORMAT),
        (DEFAULT_PLC_TYPE, DEFAULT_PLC_TYPE_VALUE),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let config = setup();
        assert_eq!(config.get_output_dir().await.unwrap(), ".");
        assert_eq!(config.get_timestamp_format().await.unwrap(), "%Y-%m-%d %H:%M:%S");
        assert_eq!(config.get_default_plc_type().await.unwrap(), "Generic PLC");
    }

    #[tokio::test]
    async fn test_set_overrides_and_snapshot() {
        let config = setup();
        config.set_config_value(config_keys::OUTPUT_DIR, "/tmp/out").unwrap();
        config.set_config_value(config_keys::OUTPUT_DIR, "/tmp/out2").unwrap();

        assert_eq!(config.get_output_dir().await.unwrap(), "/tmp/out2");

        let snapshot: BTreeMap<String, String> =
            serde_json::from_str(&config.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot[config_keys::OUTPUT_DIR], "/tmp/out2");
        assert_eq!(snapshot[config_keys::DEFAULT_PLC_TYPE], "Generic PLC");
    }

    #[test]
    fn test_invalid_timestamp_format_rejected() {
        let config = setup();
        let result = config.set_config_value(config_keys::TIMESTAMP_FORMAT, "%Y %");
        assert!(matches!(result, Err(RepositoryError::FieldValueError { .. })));
        assert!(is_valid_timestamp_format("%d/%m/%Y %H:%M"));
    }
}
