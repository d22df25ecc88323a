use crate::domain::{NetworkDevice, NewNetworkDevice};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::import_repo::NetworkDeviceImportRepository;
use async_trait::async_trait;
use rusqlite::{params, Connection, Row, Transaction};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// NetworkDeviceRepository - 网络拓扑设备仓储
// ==========================================
/// 职责: 管理 network_topology 表
/// 查询按 device_name 排序；画布坐标新建时为 0
pub struct NetworkDeviceRepository {
    conn: Arc<Mutex<Connection>>,
}

const SELECT_COLUMNS: &str = r#"
    id, project_id, device_name, device_type, ip_address, subnet_mask, gateway,
    mac_address, port, protocol, description, position_x, position_y
"#;

impl NetworkDeviceRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> rusqlite::Result<NetworkDevice> {
        Ok(NetworkDevice {
            id: row.get(0)?,
            project_id: row.get(1)?,
            device_name: row.get(2)?,
            device_type: row.get(3)?,
            ip_address: row.get(4)?,
            subnet_mask: row.get(5)?,
            gateway: row.get(6)?,
            mac_address: row.get(7)?,
            port: row.get(8)?,
            protocol: row.get(9)?,
            description: row.get(10)?,
            position_x: row.get(11)?,
            position_y: row.get(12)?,
        })
    }

    fn insert_tx(tx: &Transaction, project_id: &str, device: &NewNetworkDevice) -> RepositoryResult<()> {
        if device.device_name.trim().is_empty() {
            return Err(RepositoryError::FieldValueError {
                field: "device_name".to_string(),
                message: "设备名称不能为空".to_string(),
            });
        }

        tx.execute(
            r#"
            INSERT INTO network_topology (
                id, project_id, device_name, device_type, ip_address, subnet_mask,
                gateway, mac_address, port, protocol, description, position_x, position_y
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0, 0)
            "#,
            params![
                Uuid::new_v4().to_string(),
                project_id,
                device.device_name.trim(),
                device.device_type,
                device.ip_address,
                device.subnet_mask,
                device.gateway,
                device.mac_address,
                device.port,
                device.protocol,
                device.description,
            ],
        )?;
        Ok(())
    }

    /// 批量插入设备（单事务）
    pub fn batch_insert(&self, project_id: &str, devices: &[NewNetworkDevice]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for device in devices {
            Self::insert_tx(&tx, project_id, device)?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 查询项目下全部设备（按 device_name 排序）
    pub fn find_by_project(&self, project_id: &str) -> RepositoryResult<Vec<NetworkDevice>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM network_topology WHERE project_id = ?1 ORDER BY device_name",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let devices = stmt
            .query_map(params![project_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(devices)
    }
}

#[async_trait]
impl NetworkDeviceImportRepository for NetworkDeviceRepository {
    async fn batch_insert_devices(
        &self,
        project_id: &str,
        devices: Vec<NewNetworkDevice>,
    ) -> RepositoryResult<usize> {
        self.batch_insert(project_id, &devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use crate::domain::NewProject;
    use crate::repository::ProjectRepository;

    fn device(name: &str) -> NewNetworkDevice {
        NewNetworkDevice {
            device_name: name.to_string(),
            device_type: "PLC".to_string(),
            ip_address: "192.168.0.10".to_string(),
            subnet_mask: "255.255.255.0".to_string(),
            gateway: String::new(),
            mac_address: String::new(),
            port: "502".to_string(),
            protocol: "Modbus TCP".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_devices_sorted_by_name() {
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
        let repo = NetworkDeviceRepository::from_connection(conn);

        let count = repo
            .batch_insert(&project.id, &[device("Switch-01"), device("HMI-01")])
            .unwrap();
        assert_eq!(count, 2);

        let devices = repo.find_by_project(&project.id).unwrap();
        assert_eq!(devices[0].device_name, "HMI-01");
        assert_eq!(devices[1].device_name, "Switch-01");
        assert_eq!(devices[0].position_x, 0.0);
    }
}
