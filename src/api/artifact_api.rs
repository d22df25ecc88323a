// ==========================================
// 控制工程文档系统 - 生成物 API
// ==========================================
// 职责: 读取项目快照 → 调用生成器 → 写出文件
// 文件: {项目名}_theory.txt / {项目名}_ladder.st / {项目名}_export.csv / network_topology.csv
// ==========================================

use crate::api::error::ApiResult;
use crate::config::ArtifactConfigReader;
use crate::domain::{CauseEffectRule, IoPoint, NetworkDevice, Project, ProjectMetadata};
use crate::generator::{
    export_network_topology, export_project_tables, generate_control_theory, generate_ladder_logic,
};
use crate::repository::{CauseEffectRepository, IoPointRepository, NetworkDeviceRepository};
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

// ==========================================
// ArtifactKind - 生成物种类
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArtifactKind {
    ControlTheory,
    LadderLogic,
    ProjectExport,
    NetworkTopology,
}

impl ArtifactKind {
    pub fn file_name(&self, project_name: &str) -> String {
        let name = sanitize_file_stem(project_name);
        match self {
            ArtifactKind::ControlTheory => format!("{}_theory.txt", name),
            ArtifactKind::LadderLogic => format!("{}_ladder.st", name),
            ArtifactKind::ProjectExport => format!("{}_export.csv", name),
            ArtifactKind::NetworkTopology => "network_topology.csv".to_string(),
        }
    }
}

/// 文件名中不允许出现的字符替换为下划线
fn sanitize_file_stem(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// 项目快照（生成器输入）
#[derive(Debug, Clone)]
pub struct ProjectSnapshot {
    pub project: Project,
    pub points: Vec<IoPoint>,
    pub rules: Vec<CauseEffectRule>,
    pub devices: Vec<NetworkDevice>,
}

/// 已写出的生成物
#[derive(Debug, Clone, Serialize)]
pub struct WrittenArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub bytes: usize,
}

pub struct ArtifactApi {
    io_point_repo: Arc<IoPointRepository>,
    rule_repo: Arc<CauseEffectRepository>,
    device_repo: Arc<NetworkDeviceRepository>,
    config: Arc<dyn ArtifactConfigReader>,
}

impl ArtifactApi {
    pub fn new(
        io_point_repo: Arc<IoPointRepository>,
        rule_repo: Arc<CauseEffectRepository>,
        device_repo: Arc<NetworkDeviceRepository>,
        config: Arc<dyn ArtifactConfigReader>,
    ) -> Self {
        Self {
            io_point_repo,
            rule_repo,
            device_repo,
            config,
        }
    }

    /// 读取项目快照（I/O 点按位号排序，规则按创建顺序，设备按名称排序）
    pub fn load_snapshot(&self, project: &Project) -> ApiResult<ProjectSnapshot> {
        Ok(ProjectSnapshot {
            project: project.clone(),
            points: self.io_point_repo.find_by_project(&project.id)?,
            rules: self.rule_repo.find_by_project(&project.id)?,
            devices: self.device_repo.find_by_project(&project.id)?,
        })
    }

    /// 生成抬头信息（生成时间按配置格式渲染为本地时间）
    pub async fn build_metadata(&self, project: &Project) -> ApiResult<ProjectMetadata> {
        let controller_type = if project.plc_type.trim().is_empty() {
            self.config.get_default_plc_type().await?
        } else {
            project.plc_type.clone()
        };
        let timestamp_format = self.config.get_timestamp_format().await?;
        let generated_at = Local::now().format(&timestamp_format).to_string();

        Ok(ProjectMetadata::new(
            project.name.clone(),
            controller_type,
            generated_at,
        ))
    }

    /// 渲染生成物内容（不落盘）
    pub async fn render(&self, kind: ArtifactKind, snapshot: &ProjectSnapshot) -> ApiResult<String> {
        let content = match kind {
            ArtifactKind::ControlTheory => {
                let meta = self.build_metadata(&snapshot.project).await?;
                generate_control_theory(&meta, &snapshot.points, &snapshot.rules)
            }
            ArtifactKind::LadderLogic => {
                let meta = self.build_metadata(&snapshot.project).await?;
                generate_ladder_logic(&meta, &snapshot.points, &snapshot.rules)
            }
            ArtifactKind::ProjectExport => export_project_tables(&snapshot.points, &snapshot.rules)?,
            ArtifactKind::NetworkTopology => export_network_topology(&snapshot.devices)?,
        };
        Ok(content)
    }

    /// 生成并写出生成物
    ///
    /// # 参数
    /// - output_dir: 覆盖配置中的输出目录（None 时读取 artifact.output_dir）
    #[instrument(skip(self, project, output_dir), fields(project = %project.name))]
    pub async fn generate(
        &self,
        kind: ArtifactKind,
        project: &Project,
        output_dir: Option<&Path>,
    ) -> ApiResult<WrittenArtifact> {
        let snapshot = self.load_snapshot(project)?;
        let content = self.render(kind, &snapshot).await?;

        let dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from(self.config.get_output_dir().await?),
        };
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(kind.file_name(&project.name));
        tokio::fs::write(&path, content.as_bytes()).await?;

        info!(kind = ?kind, path = %path.display(), bytes = content.len(), "生成物已写出");
        Ok(WrittenArtifact {
            kind,
            path,
            bytes: content.len(),
        })
    }
}
