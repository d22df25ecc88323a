// ==========================================
// 控制工程文档系统 - I/O 点领域模型
// ==========================================
// 对齐: io_points 表
// 约束: tag_name 在项目内唯一，作为生成逻辑中的符号操作数
// ==========================================

use crate::domain::types::IoType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 导入/新建时的默认量程下限
pub const DEFAULT_RANGE_MIN: f64 = 0.0;

/// 导入/新建时的默认量程上限
pub const DEFAULT_RANGE_MAX: f64 = 100.0;

// ==========================================
// IoPoint - 已落库的 I/O 点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IoPoint {
    pub id: String,
    pub project_id: String,

    pub tag_name: String,
    pub description: String,
    pub io_type: IoType,
    pub address: String,         // 控制器地址（自由文本，如 I0.0 / %IW10）
    pub modbus_register: String, // 通讯寄存器（空串 = 未设置）
    pub normal_state: String,    // Normally Open / Normally Closed / 空串

    // ===== 模拟量属性 =====
    pub engineering_units: String,
    pub range_min: f64,
    pub range_max: f64,

    pub created_at: DateTime<Utc>,
}

// ==========================================
// NewIoPoint - 候选记录（导入映射结果 / 人工录入）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIoPoint {
    pub tag_name: String,
    pub description: String,
    pub io_type: IoType,
    pub address: String,
    pub modbus_register: String,
    pub normal_state: String,
    pub engineering_units: String,
    pub range_min: f64,
    pub range_max: f64,
}

impl NewIoPoint {
    /// 以位号创建候选记录，其余字段取默认值
    pub fn new(tag_name: impl Into<String>, io_type: IoType) -> Self {
        Self {
            tag_name: tag_name.into(),
            description: String::new(),
            io_type,
            address: String::new(),
            modbus_register: String::new(),
            normal_state: String::new(),
            engineering_units: String::new(),
            range_min: DEFAULT_RANGE_MIN,
            range_max: DEFAULT_RANGE_MAX,
        }
    }
}
