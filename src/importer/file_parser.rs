// ==========================================
// 销售分析与采购建议系统 - 文件解析器实现
// ==========================================
// 职责: 文件 → 原始行（列名 → 文本值）
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 原始行：列名 → 去除首尾空白后的文本值
pub type RawRow = HashMap<String, String>;

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser / ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录（完全空白的行被跳过）
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 只读第一个工作表，首行为表头
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for data_row in rows {
            let mut row_map = HashMap::new();

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }

            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRow>> {
        let path = file_path.as_ref();

        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_to_raw_records(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(temp_file, "{}", line).unwrap();
        }
        temp_file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let temp_file = csv_file(&[
            "ID_LOJA,CODIGO_SUBGRUPO,QUANTIDADE_VENDIDA",
            "1,211604,2100000",
            "2,410204,1500",
        ]);

        let records = CsvParser.parse_to_raw_records(temp_file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("ID_LOJA"), Some(&"1".to_string()));
        assert_eq!(records[0].get("QUANTIDADE_VENDIDA"), Some(&"2100000".to_string()));
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_to_raw_records(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let temp_file = csv_file(&["store_id,group_id", "1,211604", ",", "2,211604"]);

        let records = CsvParser.parse_to_raw_records(temp_file.path()).unwrap();

        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let temp_file = Builder::new().suffix(".json").tempfile().unwrap();
        let result = UniversalFileParser.parse(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "json"));
    }
}
