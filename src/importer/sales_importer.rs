// ==========================================
// 销售分析与采购建议系统 - 销售数据导入
// ==========================================
// 流程:
// 1. 文件读取与解析（CSV / Excel）
// 2. 表头校验
// 3. 字段映射与类型转换
// 4. 品类白名单校验（默认报错；可配置为跳过并告警）
// 说明: 数量保持原始单位，归一化由投影引擎完成
//       报错中的行号为数据行序号（从 1 开始，不含表头与空行）
// ==========================================

use crate::config::projection_config::ProjectionConfig;
use crate::domain::sales::SalesRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::SalesFieldMapper;
use crate::importer::file_parser::{RawRow, UniversalFileParser};
use std::path::Path;

// ==========================================
// SalesImporter - 销售数据导入器
// ==========================================
#[derive(Debug, Clone)]
pub struct SalesImporter {
    parser: UniversalFileParser,
    mapper: SalesFieldMapper,
    skip_disallowed_groups: bool,
}

impl Default for SalesImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SalesImporter {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: SalesFieldMapper,
            skip_disallowed_groups: false,
        }
    }

    /// 白名单外品类的行：true 跳过并告警，false（默认）中止导入
    pub fn skip_disallowed_groups(mut self, enabled: bool) -> Self {
        self.skip_disallowed_groups = enabled;
        self
    }

    /// 从文件导入销售行
    ///
    /// # 参数
    /// - file_path: .csv / .xlsx / .xls
    /// - config: 提供品类白名单
    ///
    /// # 返回
    /// - Ok(Vec<SalesRecord>): 原始单位的销售行（空文件返回空列表）
    /// - Err(ImportError): 文件/格式/映射/白名单错误
    pub fn import_file<P: AsRef<Path>>(
        &self,
        file_path: P,
        config: &ProjectionConfig,
    ) -> ImportResult<Vec<SalesRecord>> {
        let path = file_path.as_ref();
        tracing::info!(path = %path.display(), "开始导入销售数据");

        let raw_rows = self.parser.parse(path)?;
        let records = self.import_rows(&raw_rows, config)?;

        tracing::info!(
            path = %path.display(),
            row_count = records.len(),
            "销售数据导入完成"
        );
        Ok(records)
    }

    /// 从已解析的原始行导入（供内存数据源复用）
    pub fn import_rows(
        &self,
        raw_rows: &[RawRow],
        config: &ProjectionConfig,
    ) -> ImportResult<Vec<SalesRecord>> {
        let Some(first) = raw_rows.first() else {
            return Ok(Vec::new());
        };
        self.mapper.check_required_columns(first)?;

        let mut records = Vec::with_capacity(raw_rows.len());
        let mut skipped = 0usize;
        for (idx, raw) in raw_rows.iter().enumerate() {
            let row_number = idx + 1;
            let record = self.mapper.map_to_sales_record(raw, row_number)?;

            if !config.is_group_allowed(record.group_id) {
                if !self.skip_disallowed_groups {
                    return Err(ImportError::GroupNotAllowed {
                        row: row_number,
                        group_id: record.group_id,
                    });
                }
                tracing::warn!(row = row_number, group_id = record.group_id, "品类不在白名单内，跳过");
                skipped += 1;
                continue;
            }

            records.push(record);
        }

        if skipped > 0 {
            tracing::warn!(skipped, kept = records.len(), "已跳过白名单外品类的行");
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_import_csv_file() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "ID_LOJA,CODIGO_SUBGRUPO,IDSUBPRODUTO,QUANTIDADE_VENDIDA,ESTOQUE_ATUAL").unwrap();
        writeln!(file, "1,211604,10,2100000,500000").unwrap();
        writeln!(file, "1,211604,11,42000,").unwrap();

        let records = SalesImporter::new()
            .import_file(file.path(), &ProjectionConfig::default())
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].current_stock, 0.0);
    }

    #[test]
    fn test_group_outside_allow_list_rejected() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "store_id,group_id,quantity_sold").unwrap();
        writeln!(file, "1,211604,10").unwrap();
        writeln!(file, "1,999999,10").unwrap();

        let err = SalesImporter::new()
            .import_file(file.path(), &ProjectionConfig::default())
            .unwrap_err();

        assert!(matches!(err, ImportError::GroupNotAllowed { row: 2, group_id: 999999 }));
    }

    #[test]
    fn test_group_outside_allow_list_skipped_when_enabled() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "store_id,group_id,quantity_sold").unwrap();
        writeln!(file, "1,999999,10").unwrap();
        writeln!(file, "1,211604,10").unwrap();
        writeln!(file, "2,123456,5").unwrap();

        let records = SalesImporter::new()
            .skip_disallowed_groups(true)
            .import_file(file.path(), &ProjectionConfig::default())
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].group_id, 211604);
    }

    #[test]
    fn test_header_only_file_yields_no_rows() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "store_id,group_id,quantity_sold").unwrap();

        let records = SalesImporter::new()
            .import_file(file.path(), &ProjectionConfig::default())
            .unwrap();
        assert!(records.is_empty());
    }
}
