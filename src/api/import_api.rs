// ==========================================
// 控制工程文档系统 - 导入 API
// ==========================================
// 职责: 封装 I/O 清单与网络设备导入
// 说明: 导入失败不抛错，结果统一为 ImportOutcome
// ==========================================

use crate::importer::{
    ImportOutcome, IoPointImporter, IoPointImporterImpl, NetworkDeviceImporter,
    NetworkDeviceImporterImpl,
};
use crate::repository::{IoPointRepository, NetworkDeviceRepository};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub struct ImportApi {
    io_importer: IoPointImporterImpl<IoPointRepository>,
    device_importer: NetworkDeviceImporterImpl<NetworkDeviceRepository>,
}

impl ImportApi {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            io_importer: IoPointImporterImpl::with_defaults(IoPointRepository::from_connection(
                conn.clone(),
            )),
            device_importer: NetworkDeviceImporterImpl::with_defaults(
                NetworkDeviceRepository::from_connection(conn),
            ),
        }
    }

    pub async fn import_io_points(&self, project_id: &str, file_path: &Path) -> ImportOutcome {
        self.io_importer.import_file(file_path, project_id).await
    }

    pub async fn import_io_points_text(&self, project_id: &str, text: &str) -> ImportOutcome {
        self.io_importer.import_text(text, project_id).await
    }

    pub async fn import_devices(&self, project_id: &str, file_path: &Path) -> ImportOutcome {
        self.device_importer.import_file(file_path, project_id).await
    }
}
