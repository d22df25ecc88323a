// ==========================================
// 控制工程文档系统 - 表格文本解析器
// ==========================================
// 阶段 0: 原始文本 → 行序列（每行为字段序列）
// 规则:
// - 按 '\n' 切行，去空白后为空的行丢弃
// - 双引号只切换"引号内"状态，本身不入字段，不支持转义引号
// - 引号外的逗号结束当前字段，字段去除两端空白
// 支持: 分隔文本 / Excel (.xlsx/.xls)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::RowSource;
use async_trait::async_trait;
use calamine::{open_workbook_auto, Reader};
use std::path::{Path, PathBuf};
use tracing::debug;

const FIELD_DELIMITER: char = ',';
const QUOTE: char = '"';

// ==========================================
// TabularText - 惰性、可重复遍历的行序列
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct TabularText<'a> {
    text: &'a str,
}

impl<'a> TabularText<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// 每次调用返回一个从头开始的新迭代器
    pub fn rows(&self) -> TabularRows<'a> {
        TabularRows {
            lines: self.text.split('\n'),
        }
    }
}

impl<'a> IntoIterator for &TabularText<'a> {
    type Item = Vec<String>;
    type IntoIter = TabularRows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}

pub struct TabularRows<'a> {
    lines: std::str::Split<'a, char>,
}

impl<'a> Iterator for TabularRows<'a> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            if line.trim().is_empty() {
                continue;
            }
            return Some(parse_line(line));
        }
    }
}

/// 解析单行为字段序列
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            QUOTE => in_quotes = !in_quotes,
            FIELD_DELIMITER if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// 一次性解析全部行
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    TabularText::new(text).rows().collect()
}

// ==========================================
// DelimitedTextSource - 分隔文本文件
// ==========================================
pub struct DelimitedTextSource;

#[async_trait]
impl RowSource for DelimitedTextSource {
    async fn read_rows(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let text = tokio::fs::read_to_string(file_path).await?;
        let rows = parse_rows(&text);
        debug!(path = %file_path.display(), rows = rows.len(), "分隔文本解析完成");
        Ok(rows)
    }
}

// ==========================================
// ExcelSource - Excel 第一个工作表
// ==========================================
pub struct ExcelSource;

impl ExcelSource {
    fn read_first_sheet(path: &Path) -> ImportResult<Vec<Vec<String>>> {
        let mut workbook = open_workbook_auto(path)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("workbook has no worksheet".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = Vec::new();
        for data_row in range.rows() {
            let cells: Vec<String> = data_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect();

            // 全空白行等同于文本中的空行
            if cells.iter().all(|c| c.is_empty()) {
                continue;
            }
            rows.push(cells);
        }

        Ok(rows)
    }
}

#[async_trait]
impl RowSource for ExcelSource {
    async fn read_rows(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let ext = file_extension(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let path: PathBuf = file_path.to_path_buf();
        let rows = tokio::task::spawn_blocking(move || Self::read_first_sheet(&path))
            .await
            .map_err(|e| ImportError::InternalError(e.to_string()))??;

        debug!(path = %file_path.display(), rows = rows.len(), "Excel 解析完成");
        Ok(rows)
    }
}

// ==========================================
// 通用行数据源（根据扩展名自动选择）
// ==========================================
pub struct UniversalRowSource;

#[async_trait]
impl RowSource for UniversalRowSource {
    async fn read_rows(&self, file_path: &Path) -> ImportResult<Vec<Vec<String>>> {
        match file_extension(file_path).as_str() {
            "xlsx" | "xls" => ExcelSource.read_rows(file_path).await,
            _ => DelimitedTextSource.read_rows(file_path).await,
        }
    }
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_row_count_matches_non_blank_lines() {
        let text = "Tag,Desc\nT1,one\n\n   \nT2,two\nT3,three\n";
        let rows = parse_rows(text);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3], vec!["T3", "three"]);
    }

    #[test]
    fn test_quoted_comma_stays_in_one_field() {
        let rows = parse_rows("T1,\"Pump, main\",DI");
        assert_eq!(rows[0], vec!["T1", "Pump, main", "DI"]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        assert_eq!(parse_line("  T1 ,  desc  ,DI\r"), vec!["T1", "desc", "DI"]);
    }

    #[test]
    fn test_trailing_delimiter_yields_empty_field() {
        assert_eq!(parse_line("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_doubled_quote_is_not_an_escape() {
        // "" 只是切换两次状态，引号字符本身被丢弃
        assert_eq!(parse_line("\"say \"\"hi\"\"\",x"), vec!["say hi", "x"]);
    }

    #[test]
    fn test_unbalanced_quote_swallows_rest_of_line() {
        assert_eq!(parse_line("a,\"b,c"), vec!["a", "b,c"]);
    }

    #[test]
    fn test_rows_are_restartable() {
        let table = TabularText::new("a,b\nc,d");
        let first: Vec<_> = table.rows().collect();
        let second: Vec<_> = (&table).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn test_delimited_source_reads_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Tag,Type").unwrap();
        writeln!(temp_file, "T1,DI").unwrap();

        let rows = DelimitedTextSource.read_rows(temp_file.path()).await.unwrap();
        assert_eq!(rows, vec![vec!["Tag", "Type"], vec!["T1", "DI"]]);
    }

    #[tokio::test]
    async fn test_source_file_not_found() {
        let result = UniversalRowSource
            .read_rows(Path::new("non_existent_io_list.csv"))
            .await;
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_excel_source_rejects_other_extension() {
        let temp_file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let result = ExcelSource.read_rows(temp_file.path()).await;
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[tokio::test]
    async fn test_universal_source_reads_first_worksheet() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/io_list.xlsx");

        let rows = UniversalRowSource.read_rows(&path).await.unwrap();

        // 表头 + 3 行数据；空行与仅含空串的行被丢弃，第二个工作表不读取
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0][0], "Tag Name");
        assert_eq!(rows[1][1], "Tank T-101 high level, alarm");
        assert_eq!(rows[1][4], "10001");
        assert_eq!(rows[2][7], "-1.5");
        assert_eq!(rows[2][8], "16");
        assert_eq!(rows[3][0], "TT-201");
    }
}
