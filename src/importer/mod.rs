// ==========================================
// 控制工程文档系统 - 导入层
// ==========================================
// 职责: 外部 I/O 清单 / 网络设备表 → 项目数据
// 支持: 分隔文本 (.csv / .txt), Excel (.xlsx / .xls)
// ==========================================

// 模块声明
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod import_outcome;
pub mod importer_trait;
pub mod io_point_importer;
pub mod network_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::{CanonicalField, ColumnMap, HeaderMapper, NetworkDeviceMapper};
pub use file_parser::{
    parse_line, parse_rows, DelimitedTextSource, ExcelSource, TabularText, UniversalRowSource,
};
pub use import_outcome::ImportOutcome;
pub use io_point_importer::IoPointImporterImpl;
pub use network_importer::NetworkDeviceImporterImpl;

// 重导出 Trait 接口
pub use importer_trait::{IoPointImporter, NetworkDeviceImporter, RecordMapper, RowSource};
