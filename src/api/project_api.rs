// ==========================================
// 控制工程文档系统 - 项目 API
// ==========================================
// 职责: 项目增删查、按名称或 id 定位项目
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{NewProject, Project};
use crate::repository::ProjectRepository;
use std::sync::Arc;
use tracing::info;

pub struct ProjectApi {
    project_repo: Arc<ProjectRepository>,
}

impl ProjectApi {
    pub fn new(project_repo: Arc<ProjectRepository>) -> Self {
        Self { project_repo }
    }

    pub fn create_project(&self, project: NewProject) -> ApiResult<Project> {
        let created = self.project_repo.create(&project)?;
        info!(project_id = %created.id, name = %created.name, "项目已创建");
        Ok(created)
    }

    pub fn list_projects(&self) -> ApiResult<Vec<Project>> {
        Ok(self.project_repo.list_all()?)
    }

    pub fn delete_project(&self, project_id: &str) -> ApiResult<()> {
        self.project_repo.delete(project_id)?;
        info!(project_id = %project_id, "项目已删除（子记录级联删除）");
        Ok(())
    }

    /// 按 id 或名称定位项目（id 优先）
    pub fn resolve_project(&self, id_or_name: &str) -> ApiResult<Project> {
        if let Some(project) = self.project_repo.find_by_id(id_or_name)? {
            return Ok(project);
        }
        self.project_repo
            .find_by_name(id_or_name)?
            .ok_or_else(|| ApiError::NotFound(format!("项目不存在: {}", id_or_name)))
    }
}
