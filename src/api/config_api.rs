// ==========================================
// 控制工程文档系统 - 配置管理 API
// ==========================================
// 职责: 配置查询、更新、快照
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{config_keys, ConfigManager};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// 配置项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub key: String,
    pub value: String,
}

pub struct ConfigApi {
    config_manager: Arc<ConfigManager>,
}

impl ConfigApi {
    pub fn new(config_manager: Arc<ConfigManager>) -> Self {
        Self { config_manager }
    }

    /// 查询所有配置（已知项含默认值，按键排序）
    pub fn list_configs(&self) -> ApiResult<Vec<ConfigItem>> {
        let snapshot = self.config_manager.get_config_snapshot()?;
        let map: BTreeMap<String, String> = serde_json::from_str(&snapshot)
            .map_err(|e| ApiError::InternalError(format!("配置快照解析失败: {}", e)))?;

        Ok(map
            .into_iter()
            .map(|(key, value)| ConfigItem { key, value })
            .collect())
    }

    /// 查询单个配置（未写入的已知项返回默认值）
    pub fn get_config(&self, key: &str) -> ApiResult<ConfigItem> {
        let default = config_keys::DEFAULTS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v);

        let value = match (self.config_manager.get_global_config_value(key)?, default) {
            (Some(value), _) => value,
            (None, Some(default)) => default.to_string(),
            (None, None) => return Err(ApiError::NotFound(format!("配置项不存在: {}", key))),
        };

        Ok(ConfigItem {
            key: key.to_string(),
            value,
        })
    }

    pub fn update_config(&self, key: &str, value: &str) -> ApiResult<()> {
        if key.trim().is_empty() {
            return Err(ApiError::InvalidInput("配置键不能为空".to_string()));
        }
        self.config_manager.set_config_value(key, value)?;
        info!(key = %key, "配置已更新");
        Ok(())
    }
}
