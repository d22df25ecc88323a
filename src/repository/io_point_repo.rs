use crate::domain::{IoPoint, IoType, NewIoPoint};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::import_repo::IoPointImportRepository;
use crate::repository::parse_utc;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row, Transaction};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// IoPointRepository - I/O 点仓储
// ==========================================
/// I/O 点仓储
/// 职责: 管理 io_points 表的 CRUD 操作
/// 约束: (project_id, tag_name) 唯一，查询按 tag_name 排序
pub struct IoPointRepository {
    conn: Arc<Mutex<Connection>>,
}

const SELECT_COLUMNS: &str = r#"
    id, project_id, tag_name, description, io_type, address, modbus_register,
    normal_state, engineering_units, range_min, range_max, created_at
"#;

impl IoPointRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> rusqlite::Result<IoPoint> {
        let raw_type: String = row.get(4)?;
        let io_type = IoType::parse(&raw_type).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                Type::Text,
                format!("unknown io_type: {}", raw_type).into(),
            )
        })?;

        Ok(IoPoint {
            id: row.get(0)?,
            project_id: row.get(1)?,
            tag_name: row.get(2)?,
            description: row.get(3)?,
            io_type,
            address: row.get(5)?,
            modbus_register: row.get(6)?,
            normal_state: row.get(7)?,
            engineering_units: row.get(8)?,
            range_min: row.get(9)?,
            range_max: row.get(10)?,
            created_at: parse_utc(11, &row.get::<_, String>(11)?)?,
        })
    }

    fn validate(point: &NewIoPoint) -> RepositoryResult<()> {
        if point.tag_name.trim().is_empty() {
            return Err(RepositoryError::FieldValueError {
                field: "tag_name".to_string(),
                message: "位号不能为空".to_string(),
            });
        }
        Ok(())
    }

    /// 在事务中插入单条 I/O 点
    fn insert_tx(tx: &Transaction, project_id: &str, point: &NewIoPoint) -> RepositoryResult<IoPoint> {
        Self::validate(point)?;

        let created = IoPoint {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            tag_name: point.tag_name.trim().to_string(),
            description: point.description.clone(),
            io_type: point.io_type,
            address: point.address.clone(),
            modbus_register: point.modbus_register.clone(),
            normal_state: point.normal_state.clone(),
            engineering_units: point.engineering_units.clone(),
            range_min: point.range_min,
            range_max: point.range_max,
            created_at: Utc::now(),
        };

        tx.execute(
            r#"
            INSERT INTO io_points (
                id, project_id, tag_name, description, io_type, address, modbus_register,
                normal_state, engineering_units, range_min, range_max, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                created.id,
                created.project_id,
                created.tag_name,
                created.description,
                created.io_type.as_str(),
                created.address,
                created.modbus_register,
                created.normal_state,
                created.engineering_units,
                created.range_min,
                created.range_max,
                created.created_at.to_rfc3339(),
            ],
        )?;

        Ok(created)
    }

    /// 新增单个 I/O 点
    pub fn insert(&self, project_id: &str, point: &NewIoPoint) -> RepositoryResult<IoPoint> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let created = Self::insert_tx(&tx, project_id, point)?;
        tx.commit()?;
        Ok(created)
    }

    /// 批量插入 I/O 点
    ///
    /// # 返回
    /// - Ok(usize): 插入数量
    /// - Err: 任一行失败则整批回滚
    pub fn batch_insert(&self, project_id: &str, points: &[NewIoPoint]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for point in points {
            Self::insert_tx(&tx, project_id, point)?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 更新 I/O 点（按 id 覆盖全部可编辑字段）
    pub fn update(&self, id: &str, point: &NewIoPoint) -> RepositoryResult<()> {
        Self::validate(point)?;

        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE io_points SET
                tag_name = ?2, description = ?3, io_type = ?4, address = ?5,
                modbus_register = ?6, normal_state = ?7, engineering_units = ?8,
                range_min = ?9, range_max = ?10
            WHERE id = ?1
            "#,
            params![
                id,
                point.tag_name.trim(),
                point.description,
                point.io_type.as_str(),
                point.address,
                point.modbus_register,
                point.normal_state,
                point.engineering_units,
                point.range_min,
                point.range_max,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "IoPoint".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 删除 I/O 点（引用它的因果规则保留，成为悬空引用）
    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM io_points WHERE id = ?1", params![id])?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "IoPoint".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 查询项目下全部 I/O 点（按 tag_name 排序）
    pub fn find_by_project(&self, project_id: &str) -> RepositoryResult<Vec<IoPoint>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM io_points WHERE project_id = ?1 ORDER BY tag_name",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let points = stmt
            .query_map(params![project_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(points)
    }

    /// 按位号查询
    pub fn find_by_tag(&self, project_id: &str, tag_name: &str) -> RepositoryResult<Option<IoPoint>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM io_points WHERE project_id = ?1 AND tag_name = ?2",
            SELECT_COLUMNS
        );

        match conn.query_row(&sql, params![project_id, tag_name], Self::map_row) {
            Ok(point) => Ok(Some(point)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl IoPointImportRepository for IoPointRepository {
    async fn batch_insert_io_points(
        &self,
        project_id: &str,
        points: Vec<NewIoPoint>,
    ) -> RepositoryResult<usize> {
        self.batch_insert(project_id, &points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use crate::domain::NewProject;
    use crate::repository::ProjectRepository;

    fn setup() -> (IoPointRepository, String) {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));

        let project = ProjectRepository::from_connection(conn.clone())
            .create(&NewProject {
                name: "P".to_string(),
                ..Default::default()
            })
            .unwrap();

        (IoPointRepository::from_connection(conn), project.id)
    }

    #[test]
    fn test_find_by_project_orders_by_tag() {
        let (repo, project_id) = setup();
        repo.batch_insert(
            &project_id,
            &[
                NewIoPoint::new("PT-200", IoType::Ai),
                NewIoPoint::new("FV-100", IoType::Do),
            ],
        )
        .unwrap();

        let tags: Vec<String> = repo
            .find_by_project(&project_id)
            .unwrap()
            .into_iter()
            .map(|p| p.tag_name)
            .collect();
        assert_eq!(tags, vec!["FV-100", "PT-200"]);
    }

    #[test]
    fn test_duplicate_tag_rolls_back_whole_batch() {
        let (repo, project_id) = setup();
        let result = repo.batch_insert(
            &project_id,
            &[
                NewIoPoint::new("T1", IoType::Di),
                NewIoPoint::new("T2", IoType::Di),
                NewIoPoint::new("T1", IoType::Do),
            ],
        );

        assert!(matches!(result, Err(RepositoryError::UniqueConstraintViolation(_))));
        assert!(repo.find_by_project(&project_id).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_project_is_foreign_key_violation() {
        let (repo, _) = setup();
        let result = repo.insert("missing-project", &NewIoPoint::new("T1", IoType::Di));
        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
    }

    #[test]
    fn test_update_and_delete() {
        let (repo, project_id) = setup();
        let point = repo.insert(&project_id, &NewIoPoint::new("T1", IoType::Di)).unwrap();

        let mut edited = NewIoPoint::new("T1", IoType::Ai);
        edited.engineering_units = "bar".to_string();
        repo.update(&point.id, &edited).unwrap();

        let reloaded = repo.find_by_tag(&project_id, "T1").unwrap().unwrap();
        assert_eq!(reloaded.io_type, IoType::Ai);
        assert_eq!(reloaded.engineering_units, "bar");

        repo.delete(&point.id).unwrap();
        assert!(repo.find_by_tag(&project_id, "T1").unwrap().is_none());
        assert!(matches!(repo.delete(&point.id), Err(RepositoryError::NotFound { .. })));
    }
}
