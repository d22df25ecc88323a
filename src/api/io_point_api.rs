// ==========================================
// 控制工程文档系统 - I/O 点与因果规则 API
// ==========================================
// 职责: I/O 点、因果规则的人工维护；网络设备查询
// 说明: 规则按位号录入，落库时保存 I/O 点 id
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{
    CauseEffectRule, IoPoint, IoType, LogicType, NetworkDevice, NewCauseEffectRule, NewIoPoint,
};
use crate::repository::{CauseEffectRepository, IoPointRepository, NetworkDeviceRepository};
use std::sync::Arc;
use tracing::info;

/// 按位号录入的规则请求
#[derive(Debug, Clone)]
pub struct RuleByTags {
    pub cause_tag: String,
    pub effect_tag: String,
    pub logic_type: LogicType,
    pub time_delay: f64,
    pub priority: i32,
    pub description: String,
}

/// I/O 点局部修改（None = 保持原值）
#[derive(Debug, Clone, Default)]
pub struct IoPointPatch {
    pub tag_name: Option<String>,
    pub description: Option<String>,
    pub io_type: Option<IoType>,
    pub address: Option<String>,
    pub modbus_register: Option<String>,
    pub normal_state: Option<String>,
    pub engineering_units: Option<String>,
    pub range_min: Option<f64>,
    pub range_max: Option<f64>,
}

impl IoPointPatch {
    /// 在现有 I/O 点上叠加修改
    pub fn apply(self, current: &IoPoint) -> NewIoPoint {
        NewIoPoint {
            tag_name: self.tag_name.unwrap_or_else(|| current.tag_name.clone()),
            description: self.description.unwrap_or_else(|| current.description.clone()),
            io_type: self.io_type.unwrap_or(current.io_type),
            address: self.address.unwrap_or_else(|| current.address.clone()),
            modbus_register: self
                .modbus_register
                .unwrap_or_else(|| current.modbus_register.clone()),
            normal_state: self.normal_state.unwrap_or_else(|| current.normal_state.clone()),
            engineering_units: self
                .engineering_units
                .unwrap_or_else(|| current.engineering_units.clone()),
            range_min: self.range_min.unwrap_or(current.range_min),
            range_max: self.range_max.unwrap_or(current.range_max),
        }
    }
}

/// 因果规则局部修改（位号在规则所属项目内解析）
#[derive(Debug, Clone, Default)]
pub struct RulePatch {
    pub cause_tag: Option<String>,
    pub effect_tag: Option<String>,
    pub logic_type: Option<LogicType>,
    pub time_delay: Option<f64>,
    pub priority: Option<i32>,
    pub description: Option<String>,
}

pub struct IoPointApi {
    io_point_repo: Arc<IoPointRepository>,
    rule_repo: Arc<CauseEffectRepository>,
    device_repo: Arc<NetworkDeviceRepository>,
}

impl IoPointApi {
    pub fn new(
        io_point_repo: Arc<IoPointRepository>,
        rule_repo: Arc<CauseEffectRepository>,
        device_repo: Arc<NetworkDeviceRepository>,
    ) -> Self {
        Self {
            io_point_repo,
            rule_repo,
            device_repo,
        }
    }

    // ===== I/O 点 =====

    pub fn add_io_point(&self, project_id: &str, point: NewIoPoint) -> ApiResult<IoPoint> {
        let created = self.io_point_repo.insert(project_id, &point)?;
        info!(project_id = %project_id, tag = %created.tag_name, "I/O 点已新增");
        Ok(created)
    }

    /// 按位号修改 I/O 点
    ///
    /// 规则按 id 引用 I/O 点，改位号后规则仍指向该点
    pub fn update_io_point_by_tag(
        &self,
        project_id: &str,
        tag_name: &str,
        patch: IoPointPatch,
    ) -> ApiResult<IoPoint> {
        let current = self.find_point(project_id, tag_name)?;
        let updated = patch.apply(&current);
        self.io_point_repo.update(&current.id, &updated)?;
        info!(project_id = %project_id, tag = %tag_name, new_tag = %updated.tag_name, "I/O 点已修改");

        self.find_point(project_id, updated.tag_name.trim())
    }

    pub fn list_io_points(&self, project_id: &str) -> ApiResult<Vec<IoPoint>> {
        Ok(self.io_point_repo.find_by_project(project_id)?)
    }

    /// 按位号删除 I/O 点
    ///
    /// 引用该点的规则保留，生成物中显示为空白
    pub fn delete_io_point_by_tag(&self, project_id: &str, tag_name: &str) -> ApiResult<()> {
        let point = self.find_point(project_id, tag_name)?;
        self.io_point_repo.delete(&point.id)?;
        info!(project_id = %project_id, tag = %tag_name, "I/O 点已删除");
        Ok(())
    }

    fn find_point(&self, project_id: &str, tag_name: &str) -> ApiResult<IoPoint> {
        self.io_point_repo
            .find_by_tag(project_id, tag_name)?
            .ok_or_else(|| ApiError::NotFound(format!("位号不存在: {}", tag_name)))
    }

    // ===== 因果规则 =====

    pub fn add_rule(&self, project_id: &str, request: RuleByTags) -> ApiResult<CauseEffectRule> {
        let cause = self.find_point(project_id, &request.cause_tag)?;
        let effect = self.find_point(project_id, &request.effect_tag)?;

        let rule = self.rule_repo.insert(
            project_id,
            &NewCauseEffectRule {
                cause_id: cause.id,
                effect_id: effect.id,
                logic_type: request.logic_type,
                time_delay: request.time_delay,
                priority: request.priority,
                description: request.description,
            },
        )?;
        info!(project_id = %project_id, rule_id = %rule.id, "因果规则已新增");
        Ok(rule)
    }

    pub fn update_rule(&self, rule_id: &str, patch: RulePatch) -> ApiResult<CauseEffectRule> {
        let current = self
            .rule_repo
            .find_by_id(rule_id)?
            .ok_or_else(|| ApiError::NotFound(format!("规则不存在: {}", rule_id)))?;

        let cause_id = match &patch.cause_tag {
            Some(tag) => self.find_point(&current.project_id, tag)?.id,
            None => current.cause_id.clone(),
        };
        let effect_id = match &patch.effect_tag {
            Some(tag) => self.find_point(&current.project_id, tag)?.id,
            None => current.effect_id.clone(),
        };

        self.rule_repo.update(
            rule_id,
            &NewCauseEffectRule {
                cause_id,
                effect_id,
                logic_type: patch.logic_type.unwrap_or_else(|| current.logic_type.clone()),
                time_delay: patch.time_delay.unwrap_or(current.time_delay),
                priority: patch.priority.unwrap_or(current.priority),
                description: patch.description.unwrap_or_else(|| current.description.clone()),
            },
        )?;
        info!(rule_id = %rule_id, "因果规则已修改");

        self.rule_repo
            .find_by_id(rule_id)?
            .ok_or_else(|| ApiError::NotFound(format!("规则不存在: {}", rule_id)))
    }

    pub fn list_rules(&self, project_id: &str) -> ApiResult<Vec<CauseEffectRule>> {
        Ok(self.rule_repo.find_by_project(project_id)?)
    }

    pub fn delete_rule(&self, rule_id: &str) -> ApiResult<()> {
        Ok(self.rule_repo.delete(rule_id)?)
    }

    // ===== 网络设备 =====

    pub fn list_devices(&self, project_id: &str) -> ApiResult<Vec<NetworkDevice>> {
        Ok(self.device_repo.find_by_project(project_id)?)
    }
}
