// ==========================================
// 控制工程文档系统 - I/O 清单导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 读取 → 解析 → 表头映射 → 形态校验 → 单事务落库
// 约定: 失败不返回 Err，以 ImportOutcome 上报；失败时不落任何数据
// ==========================================

use crate::domain::NewIoPoint;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::HeaderMapper;
use crate::importer::file_parser::{parse_rows, UniversalRowSource};
use crate::importer::import_outcome::{prepare_records, ImportOutcome};
use crate::importer::importer_trait::{IoPointImporter, RecordMapper, RowSource};
use crate::repository::IoPointImportRepository;
use async_trait::async_trait;
use std::path::Path;
use tracing::{error, info, instrument};

// ==========================================
// IoPointImporterImpl
// ==========================================
pub struct IoPointImporterImpl<R>
where
    R: IoPointImportRepository,
{
    // 数据访问层
    import_repo: R,

    // 导入组件
    row_source: Box<dyn RowSource>,
    mapper: Box<dyn RecordMapper<NewIoPoint>>,
}

impl<R> IoPointImporterImpl<R>
where
    R: IoPointImportRepository,
{
    /// 创建导入器
    ///
    /// # 参数
    /// - import_repo: 导入数据仓储
    /// - row_source: 文件 → 行序列
    /// - mapper: 行序列 → I/O 点候选记录
    pub fn new(
        import_repo: R,
        row_source: Box<dyn RowSource>,
        mapper: Box<dyn RecordMapper<NewIoPoint>>,
    ) -> Self {
        Self {
            import_repo,
            row_source,
            mapper,
        }
    }

    /// 默认组件: 按扩展名分派的读取器 + 表头关键字映射
    pub fn with_defaults(import_repo: R) -> Self {
        Self::new(
            import_repo,
            Box::new(UniversalRowSource),
            Box::new(HeaderMapper),
        )
    }

    async fn store_rows(&self, rows: Vec<Vec<String>>, project_id: &str) -> ImportResult<usize> {
        info!(total_rows = rows.len(), "文件解析完成");

        let records = prepare_records(&rows, self.mapper.as_ref())?;
        info!(valid_records = records.len(), "表头映射完成");

        let count = self
            .import_repo
            .batch_insert_io_points(project_id, records)
            .await?;
        info!(count = count, "I/O 点落库完成");
        Ok(count)
    }
}

#[async_trait]
impl<R> IoPointImporter for IoPointImporterImpl<R>
where
    R: IoPointImportRepository,
{
    #[instrument(skip(self, file_path), fields(file = %file_path.display()))]
    async fn import_file(&self, file_path: &Path, project_id: &str) -> ImportOutcome {
        info!("开始导入 I/O 清单");

        let result = match self.row_source.read_rows(file_path).await {
            Ok(rows) => self.store_rows(rows, project_id).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            error!(error = %e, "I/O 清单导入失败");
        }
        ImportOutcome::from(result)
    }

    #[instrument(skip(self, text))]
    async fn import_text(&self, text: &str, project_id: &str) -> ImportOutcome {
        let result = self.store_rows(parse_rows(text), project_id).await;

        if let Err(e) = &result {
            error!(error = %e, "I/O 清单导入失败");
        }
        ImportOutcome::from(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IoType;
    use crate::repository::{RepositoryError, RepositoryResult};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRepo {
        inserted: Mutex<Vec<(String, NewIoPoint)>>,
        fail_with: Option<String>,
    }

    #[async_trait]
    impl IoPointImportRepository for RecordingRepo {
        async fn batch_insert_io_points(
            &self,
            project_id: &str,
            points: Vec<NewIoPoint>,
        ) -> RepositoryResult<usize> {
            if let Some(msg) = &self.fail_with {
                return Err(RepositoryError::UniqueConstraintViolation(msg.clone()));
            }
            let count = points.len();
            let mut inserted = self.inserted.lock().unwrap();
            inserted.extend(points.into_iter().map(|p| (project_id.to_string(), p)));
            Ok(count)
        }
    }

    #[tokio::test]
    async fn test_import_text_success() {
        let importer = IoPointImporterImpl::with_defaults(RecordingRepo::default());

        let outcome = importer
            .import_text("Tag,Desc,Type,Min,Max\nT1,desc1,DI,0,10\n", "p1")
            .await;

        assert_eq!(outcome, ImportOutcome::succeeded(1));
        let inserted = importer.import_repo.inserted.lock().unwrap();
        assert_eq!(inserted[0].0, "p1");
        assert_eq!(inserted[0].1.tag_name, "T1");
        assert_eq!(inserted[0].1.io_type, IoType::Di);
        assert_eq!(inserted[0].1.range_max, 10.0);
    }

    #[tokio::test]
    async fn test_header_only_input_fails_without_insert() {
        let importer = IoPointImporterImpl::with_defaults(RecordingRepo::default());

        let outcome = importer.import_text("Tag,Desc,Type\n", "p1").await;

        assert_eq!(outcome, ImportOutcome::failed("File is empty or invalid"));
        assert!(importer.import_repo.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_tag_column_reports_no_valid_data() {
        let importer = IoPointImporterImpl::with_defaults(RecordingRepo::default());

        let outcome = importer.import_text("Name,Desc\nT1,x\n", "p1").await;

        assert_eq!(outcome, ImportOutcome::failed("No valid data found in file"));
    }

    #[tokio::test]
    async fn test_storage_error_message_is_surfaced() {
        let repo = RecordingRepo {
            fail_with: Some("UNIQUE constraint failed: io_points.project_id, io_points.tag_name".to_string()),
            ..Default::default()
        };
        let importer = IoPointImporterImpl::with_defaults(repo);

        let outcome = importer.import_text("Tag\nT1\nT1\n", "p1").await;

        assert!(!outcome.success);
        assert_eq!(outcome.count, 0);
        assert_eq!(
            outcome.error.as_deref(),
            Some("UNIQUE constraint failed: io_points.project_id, io_points.tag_name")
        );
    }

    #[tokio::test]
    async fn test_missing_file_reports_failure() {
        let importer = IoPointImporterImpl::with_defaults(RecordingRepo::default());

        let outcome = importer
            .import_file(Path::new("/nonexistent/io_list.csv"), "p1")
            .await;

        assert!(!outcome.success);
        assert!(outcome.error.is_some());
    }
}
