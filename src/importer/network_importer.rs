// ==========================================
// 控制工程文档系统 - 网络设备导入器实现
// ==========================================
// 与 I/O 清单共用解析器；列按位置映射，不做表头识别
// ==========================================

use crate::domain::NewNetworkDevice;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::NetworkDeviceMapper;
use crate::importer::file_parser::{parse_rows, UniversalRowSource};
use crate::importer::import_outcome::{prepare_records, ImportOutcome};
use crate::importer::importer_trait::{NetworkDeviceImporter, RecordMapper, RowSource};
use crate::repository::NetworkDeviceImportRepository;
use async_trait::async_trait;
use std::path::Path;
use tracing::{info, instrument, warn};

pub struct NetworkDeviceImporterImpl<R>
where
    R: NetworkDeviceImportRepository,
{
    import_repo: R,
    row_source: Box<dyn RowSource>,
    mapper: Box<dyn RecordMapper<NewNetworkDevice>>,
}

impl<R> NetworkDeviceImporterImpl<R>
where
    R: NetworkDeviceImportRepository,
{
    pub fn new(
        import_repo: R,
        row_source: Box<dyn RowSource>,
        mapper: Box<dyn RecordMapper<NewNetworkDevice>>,
    ) -> Self {
        Self {
            import_repo,
            row_source,
            mapper,
        }
    }

    pub fn with_defaults(import_repo: R) -> Self {
        Self::new(
            import_repo,
            Box::new(UniversalRowSource),
            Box::new(NetworkDeviceMapper),
        )
    }

    async fn store_rows(&self, rows: Vec<Vec<String>>, project_id: &str) -> ImportResult<usize> {
        let devices = prepare_records(&rows, self.mapper.as_ref())?;
        let count = self
            .import_repo
            .batch_insert_devices(project_id, devices)
            .await?;
        info!(count = count, "网络设备落库完成");
        Ok(count)
    }
}

#[async_trait]
impl<R> NetworkDeviceImporter for NetworkDeviceImporterImpl<R>
where
    R: NetworkDeviceImportRepository,
{
    #[instrument(skip(self, file_path), fields(file = %file_path.display()))]
    async fn import_file(&self, file_path: &Path, project_id: &str) -> ImportOutcome {
        let result = match self.row_source.read_rows(file_path).await {
            Ok(rows) => self.store_rows(rows, project_id).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            warn!(error = %e, "网络设备导入失败");
        }
        ImportOutcome::from(result)
    }

    #[instrument(skip(self, text))]
    async fn import_text(&self, text: &str, project_id: &str) -> ImportOutcome {
        let result = self.store_rows(parse_rows(text), project_id).await;

        if let Err(e) = &result {
            warn!(error = %e, "网络设备导入失败");
        }
        ImportOutcome::from(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryResult;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRepo {
        inserted: Mutex<Vec<NewNetworkDevice>>,
    }

    #[async_trait]
    impl NetworkDeviceImportRepository for RecordingRepo {
        async fn batch_insert_devices(
            &self,
            _project_id: &str,
            devices: Vec<NewNetworkDevice>,
        ) -> RepositoryResult<usize> {
            let count = devices.len();
            self.inserted.lock().unwrap().extend(devices);
            Ok(count)
        }
    }

    #[tokio::test]
    async fn test_positional_import_with_quoted_fields() {
        let importer = NetworkDeviceImporterImpl::with_defaults(RecordingRepo::default());
        let text = "Device Name,Device Type,IP Address,Subnet Mask,Gateway,MAC Address,Port,Protocol,Description\n\
                    \"PLC-01\",\"PLC\",\"192.168.1.10\",\"\",\"192.168.1.1\",\"\",\"502\",\"Modbus TCP\",\"Main, rack 1\"\n";

        let outcome = importer.import_text(text, "p1").await;

        assert_eq!(outcome, ImportOutcome::succeeded(1));
        let inserted = importer.import_repo.inserted.lock().unwrap();
        assert_eq!(inserted[0].device_name, "PLC-01");
        assert_eq!(inserted[0].subnet_mask, "255.255.255.0");
        assert_eq!(inserted[0].description, "Main, rack 1");
    }

    #[tokio::test]
    async fn test_rows_without_name_give_no_valid_data() {
        let importer = NetworkDeviceImporterImpl::with_defaults(RecordingRepo::default());

        let outcome = importer.import_text("Device Name,Type\n,PLC\n", "p1").await;

        assert_eq!(outcome, ImportOutcome::failed("No valid data found in file"));
    }
}
