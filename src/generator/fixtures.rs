// 生成器单元测试共用的快照构造

use crate::domain::{CauseEffectRule, IoPoint, IoType, LogicType, ProjectMetadata};
use chrono::{TimeZone, Utc};

pub(crate) fn metadata() -> ProjectMetadata {
    ProjectMetadata::new("Pump Station", "Siemens S7-1500", "2024-05-01 08:30:00")
}

pub(crate) fn point(id: &str, tag: &str, description: &str, io_type: IoType, address: &str) -> IoPoint {
    IoPoint {
        id: id.to_string(),
        project_id: "p1".to_string(),
        tag_name: tag.to_string(),
        description: description.to_string(),
        io_type,
        address: address.to_string(),
        modbus_register: String::new(),
        normal_state: String::new(),
        engineering_units: String::new(),
        range_min: 0.0,
        range_max: 100.0,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
    }
}

pub(crate) fn rule(id: &str, cause: &str, effect: &str, logic: &str, delay: f64) -> CauseEffectRule {
    CauseEffectRule {
        id: id.to_string(),
        project_id: "p1".to_string(),
        cause_id: cause.to_string(),
        effect_id: effect.to_string(),
        logic_type: LogicType::from(logic),
        time_delay: delay,
        priority: 1,
        description: format!("rule {}", id),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
    }
}
