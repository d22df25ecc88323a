use crate::domain::{CauseEffectRule, LogicType, NewCauseEffectRule};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_utc;
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// CauseEffectRepository - 因果规则仓储
// ==========================================
/// 因果规则仓储
/// 职责: 管理 cause_effect_matrix 表的 CRUD 操作
/// 说明: cause_id/effect_id 不校验存在性；查询按创建顺序返回
pub struct CauseEffectRepository {
    conn: Arc<Mutex<Connection>>,
}

const SELECT_COLUMNS: &str = r#"
    id, project_id, cause_id, effect_id, logic_type, time_delay, priority, description, created_at
"#;

impl CauseEffectRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> rusqlite::Result<CauseEffectRule> {
        Ok(CauseEffectRule {
            id: row.get(0)?,
            project_id: row.get(1)?,
            cause_id: row.get(2)?,
            effect_id: row.get(3)?,
            logic_type: LogicType::from(row.get::<_, String>(4)?),
            time_delay: row.get(5)?,
            priority: row.get(6)?,
            description: row.get(7)?,
            created_at: parse_utc(8, &row.get::<_, String>(8)?)?,
        })
    }

    fn validate(rule: &NewCauseEffectRule) -> RepositoryResult<()> {
        if !rule.time_delay.is_finite() || rule.time_delay < 0.0 {
            return Err(RepositoryError::FieldValueError {
                field: "time_delay".to_string(),
                message: format!("延时必须为非负数: {}", rule.time_delay),
            });
        }
        Ok(())
    }

    /// 新增因果规则
    ///
    /// # 返回
    /// - Err(FieldValueError): time_delay 为负数或非有限值
    pub fn insert(&self, project_id: &str, rule: &NewCauseEffectRule) -> RepositoryResult<CauseEffectRule> {
        Self::validate(rule)?;

        let created = CauseEffectRule {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            cause_id: rule.cause_id.clone(),
            effect_id: rule.effect_id.clone(),
            logic_type: rule.logic_type.clone(),
            time_delay: rule.time_delay,
            priority: rule.priority,
            description: rule.description.clone(),
            created_at: Utc::now(),
        };

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO cause_effect_matrix (
                id, project_id, cause_id, effect_id, logic_type, time_delay,
                priority, description, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                created.id,
                created.project_id,
                created.cause_id,
                created.effect_id,
                created.logic_type.as_str(),
                created.time_delay,
                created.priority,
                created.description,
                created.created_at.to_rfc3339(),
            ],
        )?;

        Ok(created)
    }

    /// 更新因果规则（按 id 覆盖全部可编辑字段，创建时间不变）
    pub fn update(&self, id: &str, rule: &NewCauseEffectRule) -> RepositoryResult<()> {
        Self::validate(rule)?;

        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE cause_effect_matrix SET
                cause_id = ?2, effect_id = ?3, logic_type = ?4, time_delay = ?5,
                priority = ?6, description = ?7
            WHERE id = ?1
            "#,
            params![
                id,
                rule.cause_id,
                rule.effect_id,
                rule.logic_type.as_str(),
                rule.time_delay,
                rule.priority,
                rule.description,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "CauseEffectRule".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<CauseEffectRule>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM cause_effect_matrix WHERE id = ?1", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id], Self::map_row)?;
        let rule = rows.next().transpose()?;
        Ok(rule)
    }

    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM cause_effect_matrix WHERE id = ?1", params![id])?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "CauseEffectRule".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 查询项目下全部规则（按创建顺序）
    pub fn find_by_project(&self, project_id: &str) -> RepositoryResult<Vec<CauseEffectRule>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM cause_effect_matrix WHERE project_id = ?1 ORDER BY created_at, rowid",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rules = stmt
            .query_map(params![project_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use crate::domain::NewProject;
    use crate::repository::ProjectRepository;

    fn setup() -> (CauseEffectRepository, String) {
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

        (CauseEffectRepository::from_connection(conn), project.id)
    }

    fn rule(cause: &str, effect: &str, logic: &str) -> NewCauseEffectRule {
        NewCauseEffectRule {
            cause_id: cause.to_string(),
            effect_id: effect.to_string(),
            logic_type: LogicType::from(logic),
            time_delay: 0.0,
            priority: 1,
            description: String::new(),
        }
    }

    #[test]
    fn test_rules_keep_insertion_order_and_dangling_ids() {
        let (repo, project_id) = setup();
        repo.insert(&project_id, &rule("c2", "e2", "NOT")).unwrap();
        repo.insert(&project_id, &rule("c1", "missing", "DIRECT")).unwrap();

        let rules = repo.find_by_project(&project_id).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].cause_id, "c2");
        assert_eq!(rules[0].logic_type, LogicType::Not);
        assert_eq!(rules[1].effect_id, "missing");
    }

    #[test]
    fn test_unknown_logic_type_round_trips_verbatim() {
        let (repo, project_id) = setup();
        repo.insert(&project_id, &rule("c", "e", "XOR")).unwrap();

        let rules = repo.find_by_project(&project_id).unwrap();
        assert_eq!(rules[0].logic_type, LogicType::Other("XOR".to_string()));
    }

    #[test]
    fn test_negative_delay_rejected() {
        let (repo, project_id) = setup();
        let mut bad = rule("c", "e", "DIRECT");
        bad.time_delay = -1.0;
        assert!(matches!(
            repo.insert(&project_id, &bad),
            Err(RepositoryError::FieldValueError { .. })
        ));
    }

    #[test]
    fn test_update_keeps_position_and_rewrites_fields() {
        let (repo, project_id) = setup();
        let first = repo.insert(&project_id, &rule("c1", "e1", "DIRECT")).unwrap();
        repo.insert(&project_id, &rule("c2", "e2", "DIRECT")).unwrap();

        let mut changed = rule("c3", "e1", "NOT");
        changed.time_delay = 2.5;
        changed.description = "edited".to_string();
        repo.update(&first.id, &changed).unwrap();

        let rules = repo.find_by_project(&project_id).unwrap();
        assert_eq!(rules[0].id, first.id);
        assert_eq!(rules[0].cause_id, "c3");
        assert_eq!(rules[0].logic_type, LogicType::Not);
        assert_eq!(rules[0].time_delay, 2.5);
        assert_eq!(rules[0].description, "edited");
        assert_eq!(rules[0].created_at, first.created_at);

        assert!(matches!(
            repo.update("missing", &changed),
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
