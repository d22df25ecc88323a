use crate::domain::{NewProject, Project};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_utc;
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// ProjectRepository - 项目仓储
// ==========================================
/// 项目仓储
/// 职责: 管理 project 表的 CRUD 操作
/// 说明: 删除项目时 I/O 点、因果规则、网络设备随外键级联删除
pub struct ProjectRepository {
    conn: Arc<Mutex<Connection>>,
}

const SELECT_COLUMNS: &str =
    "id, name, description, plc_type, hmi_type, hmi_details, created_at, updated_at";

impl ProjectRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> rusqlite::Result<Project> {
        Ok(Project {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            plc_type: row.get(3)?,
            hmi_type: row.get(4)?,
            hmi_details: row.get(5)?,
            created_at: parse_utc(6, &row.get::<_, String>(6)?)?,
            updated_at: parse_utc(7, &row.get::<_, String>(7)?)?,
        })
    }

    /// 创建项目
    ///
    /// # 返回
    /// - Ok(Project): 新建的项目（含生成的 id）
    pub fn create(&self, project: &NewProject) -> RepositoryResult<Project> {
        if project.name.trim().is_empty() {
            return Err(RepositoryError::FieldValueError {
                field: "name".to_string(),
                message: "项目名称不能为空".to_string(),
            });
        }

        let now = Utc::now();
        let created = Project {
            id: Uuid::new_v4().to_string(),
            name: project.name.trim().to_string(),
            description: project.description.clone(),
            plc_type: project.plc_type.clone(),
            hmi_type: project.hmi_type.clone(),
            hmi_details: project.hmi_details.clone(),
            created_at: now,
            updated_at: now,
        };

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO project (
                id, name, description, plc_type, hmi_type, hmi_details, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                created.id,
                created.name,
                created.description,
                created.plc_type,
                created.hmi_type,
                created.hmi_details,
                created.created_at.to_rfc3339(),
                created.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(created)
    }

    /// 按 id 查询项目
    ///
    /// # 返回
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, project_id: &str) -> RepositoryResult<Option<Project>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM project WHERE id = ?1", SELECT_COLUMNS);

        match conn.query_row(&sql, params![project_id], Self::map_row) {
            Ok(project) => Ok(Some(project)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 按名称查询项目（同名时取最新创建的一个）
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Project>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM project WHERE name = ?1 ORDER BY created_at DESC LIMIT 1",
            SELECT_COLUMNS
        );

        match conn.query_row(&sql, params![name], Self::map_row) {
            Ok(project) => Ok(Some(project)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 列出全部项目（最新创建在前）
    pub fn list_all(&self) -> RepositoryResult<Vec<Project>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM project ORDER BY created_at DESC, rowid DESC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let projects = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    /// 删除项目（级联删除子记录）
    pub fn delete(&self, project_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM project WHERE id = ?1", params![project_id])?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Project".to_string(),
                id: project_id.to_string(),
            });
        }
        Ok(())
    }
}
