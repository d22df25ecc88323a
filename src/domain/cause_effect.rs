// ==========================================
// 控制工程文档系统 - 因果规则领域模型
// ==========================================
// 对齐: cause_effect_matrix 表
// 说明: 每条规则只引用一个原因点和一个结果点（允许悬空引用）
// ==========================================

use crate::domain::types::LogicType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// CauseEffectRule - 因果规则
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauseEffectRule {
    pub id: String,
    pub project_id: String,

    pub cause_id: String,  // 原因 I/O 点 ID
    pub effect_id: String, // 结果 I/O 点 ID

    pub logic_type: LogicType,
    pub time_delay: f64, // 秒，0 表示无定时器
    pub priority: i32,   // 数值越小优先级越高，仅用于展示
    pub description: String,

    pub created_at: DateTime<Utc>,
}

impl CauseEffectRule {
    /// 是否需要生成延时定时器
    pub fn has_delay(&self) -> bool {
        self.time_delay > 0.0
    }
}

// ==========================================
// NewCauseEffectRule - 新建规则
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCauseEffectRule {
    pub cause_id: String,
    pub effect_id: String,
    pub logic_type: LogicType,
    pub time_delay: f64,
    pub priority: i32,
    pub description: String,
}
