// ==========================================
// 控制工程文档系统 - I/O 点索引
// ==========================================
// 规则引用按 id 查找 I/O 点；找不到时渲染为空串
// ==========================================

use crate::domain::IoPoint;
use std::collections::HashMap;

pub struct IoPointIndex<'a> {
    by_id: HashMap<&'a str, &'a IoPoint>,
}

impl<'a> IoPointIndex<'a> {
    pub fn new(points: &'a [IoPoint]) -> Self {
        let by_id = points.iter().map(|p| (p.id.as_str(), p)).collect();
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a IoPoint> {
        self.by_id.get(id).copied()
    }

    /// 位号（悬空引用为空串）
    pub fn tag_of(&self, id: &str) -> &'a str {
        self.get(id).map(|p| p.tag_name.as_str()).unwrap_or("")
    }

    /// 描述（悬空引用为空串）
    pub fn description_of(&self, id: &str) -> &'a str {
        self.get(id).map(|p| p.description.as_str()).unwrap_or("")
    }
}
