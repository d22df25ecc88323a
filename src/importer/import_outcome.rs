// ==========================================
// 控制工程文档系统 - 导入结果
// ==========================================
// 约定: 导入入口从不返回 Err，一律以 {success, count, error} 结构上报
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::RecordMapper;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub success: bool,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportOutcome {
    pub fn succeeded(count: usize) -> Self {
        Self {
            success: true,
            count,
            error: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            count: 0,
            error: Some(reason.into()),
        }
    }
}

impl From<ImportResult<usize>> for ImportOutcome {
    fn from(result: ImportResult<usize>) -> Self {
        match result {
            Ok(count) => ImportOutcome::succeeded(count),
            Err(err) => ImportOutcome::failed(err.to_string()),
        }
    }
}

/// 形态校验 + 映射（导入器共用）
///
/// - 少于 2 行 → EmptyOrInvalid
/// - 映射结果为空 → NoValidData
pub(crate) fn prepare_records<T, M>(rows: &[Vec<String>], mapper: &M) -> ImportResult<Vec<T>>
where
    M: RecordMapper<T> + ?Sized,
{
    if rows.len() < 2 {
        return Err(ImportError::EmptyOrInvalid);
    }

    let records = mapper.map_rows(rows);
    if records.is_empty() {
        return Err(ImportError::NoValidData);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewIoPoint;
    use crate::importer::field_mapper::HeaderMapper;

    #[test]
    fn test_header_only_is_empty_or_invalid() {
        let rows = vec![vec!["Tag".to_string(), "Type".to_string()]];
        let result = prepare_records::<NewIoPoint, _>(&rows, &HeaderMapper);
        assert!(matches!(result, Err(ImportError::EmptyOrInvalid)));
    }

    #[test]
    fn test_failed_outcome_has_zero_count() {
        let outcome = ImportOutcome::from(Err::<usize, _>(ImportError::NoValidData));
        assert!(!outcome.success);
        assert_eq!(outcome.count, 0);
        assert_eq!(outcome.error.as_deref(), Some("No valid data found in file"));
    }

    #[test]
    fn test_outcome_json_omits_missing_error() {
        let json = serde_json::to_value(ImportOutcome::succeeded(3)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "count": 3}));
    }
}
