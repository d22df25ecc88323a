// ==========================================
// 控制工程文档系统 - 项目领域模型
// ==========================================
// 对齐: project 表
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Project - 项目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub plc_type: String, // 控制器类型，生成物抬头使用
    pub hmi_type: String,
    pub hmi_details: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub plc_type: String,
    pub hmi_type: String,
    pub hmi_details: String,
}

// ==========================================
// ProjectMetadata - 生成物抬头信息
// ==========================================
// generated_at 由调用方预先渲染，生成器本身不读取时钟
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub project_name: String,
    pub controller_type: String,
    pub generated_at: String,
}

impl ProjectMetadata {
    pub fn new(
        project_name: impl Into<String>,
        controller_type: impl Into<String>,
        generated_at: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            controller_type: controller_type.into(),
            generated_at: generated_at.into(),
        }
    }
}
