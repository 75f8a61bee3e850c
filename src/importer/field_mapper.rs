// ==========================================
// 销售分析与采购建议系统 - 字段映射器实现
// ==========================================
// 职责: 源列名 → 标准字段映射 + 类型转换
// 列名别名: 源库列名（ID_LOJA 等）与英文标准名均可
// ==========================================

use crate::domain::sales::SalesRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;

// ==========================================
// 标准字段
// ==========================================
pub mod fields {
    pub const STORE_ID: &str = "store_id";
    pub const GROUP_ID: &str = "group_id";
    pub const PRODUCT_ID: &str = "product_id";
    pub const QUANTITY_SOLD: &str = "quantity_sold";
    pub const CURRENT_STOCK: &str = "current_stock";
}

/// 标准字段 → 可接受的列名
fn aliases(field: &str) -> &'static [&'static str] {
    match field {
        fields::STORE_ID => &["store_id", "ID_LOJA", "IDEMPRESA"],
        fields::GROUP_ID => &["group_id", "CODIGO_SUBGRUPO", "IDSUBGRUPO"],
        fields::PRODUCT_ID => &["product_id", "IDSUBPRODUTO", "ID_PRODUTO"],
        fields::QUANTITY_SOLD => &["quantity_sold", "QUANTIDADE_VENDIDA", "QTDPRODUTO"],
        fields::CURRENT_STOCK => &["current_stock", "ESTOQUE_ATUAL", "QTDATUALESTOQUE"],
        _ => &[],
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SalesFieldMapper;

impl SalesFieldMapper {
    /// 校验表头是否包含全部必需列（product_id / current_stock 可缺省）
    pub fn check_required_columns(&self, row: &RawRow) -> ImportResult<()> {
        for field in [fields::STORE_ID, fields::GROUP_ID, fields::QUANTITY_SOLD] {
            let present = aliases(field)
                .iter()
                .any(|alias| self.find_key(row, alias).is_some());
            if !present {
                return Err(ImportError::MissingColumn(field.to_string()));
            }
        }
        Ok(())
    }

    /// 映射一行
    ///
    /// # 参数
    /// - row: 原始行
    /// - row_number: 数据行号（从 1 开始，用于报错）
    ///
    /// # 规则
    /// - 库存为空 → 0（无库存记录）
    /// - 商品ID为空 → None（品类级行）
    /// - 数量为负 → NegativeQuantity
    pub fn map_to_sales_record(&self, row: &RawRow, row_number: usize) -> ImportResult<SalesRecord> {
        let store_id = self.require_i64(row, fields::STORE_ID, row_number)?;
        let group_id = self.require_i64(row, fields::GROUP_ID, row_number)?;
        let product_id = self.parse_i64(row, fields::PRODUCT_ID, row_number)?;

        let quantity_sold = self
            .parse_f64(row, fields::QUANTITY_SOLD, row_number)?
            .ok_or_else(|| ImportError::MissingValue {
                row: row_number,
                field: fields::QUANTITY_SOLD.to_string(),
            })?;
        let current_stock = self
            .parse_f64(row, fields::CURRENT_STOCK, row_number)?
            .unwrap_or(0.0);

        for (field, value) in [
            (fields::QUANTITY_SOLD, quantity_sold),
            (fields::CURRENT_STOCK, current_stock),
        ] {
            if value < 0.0 {
                return Err(ImportError::NegativeQuantity {
                    row: row_number,
                    field: field.to_string(),
                    value,
                });
            }
        }

        Ok(SalesRecord {
            store_id,
            group_id,
            product_id,
            quantity_sold,
            current_stock,
        })
    }

    /// 按列名查找（大小写不敏感）
    fn find_key<'a>(&self, row: &'a RawRow, alias: &str) -> Option<&'a String> {
        row.iter()
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(alias))
            .map(|(_, v)| v)
    }

    /// 提取字符串字段，尝试所有别名
    fn get_string(&self, row: &RawRow, field: &str) -> Option<String> {
        for alias in aliases(field) {
            if let Some(v) = self.find_key(row, alias) {
                let trimmed = v.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }

    /// 解析浮点数
    fn parse_f64(&self, row: &RawRow, field: &str, row_number: usize) -> ImportResult<Option<f64>> {
        match self.get_string(row, field) {
            None => Ok(None),
            Some(value) => value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| ImportError::TypeConversionError {
                    row: row_number,
                    field: field.to_string(),
                    message: format!("无法解析为数值: {}", value),
                }),
        }
    }

    /// 解析整数（Excel 数值单元格可能带 ".0"）
    fn parse_i64(&self, row: &RawRow, field: &str, row_number: usize) -> ImportResult<Option<i64>> {
        match self.get_string(row, field) {
            None => Ok(None),
            Some(value) => {
                if let Ok(v) = value.parse::<i64>() {
                    return Ok(Some(v));
                }
                match value.parse::<f64>() {
                    Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(Some(v as i64)),
                    _ => Err(ImportError::TypeConversionError {
                        row: row_number,
                        field: field.to_string(),
                        message: format!("无法解析为整数: {}", value),
                    }),
                }
            }
        }
    }

    fn require_i64(&self, row: &RawRow, field: &str, row_number: usize) -> ImportResult<i64> {
        self.parse_i64(row, field, row_number)?
            .ok_or_else(|| ImportError::MissingValue {
                row: row_number,
                field: field.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_map_source_column_names() {
        let raw = row(&[
            ("ID_LOJA", "3"),
            ("CODIGO_SUBGRUPO", "211604"),
            ("IDSUBPRODUTO", "778"),
            ("QUANTIDADE_VENDIDA", "2100000"),
            ("ESTOQUE_ATUAL", "500000"),
        ]);

        let record = SalesFieldMapper.map_to_sales_record(&raw, 1).unwrap();

        assert_eq!(record.store_id, 3);
        assert_eq!(record.group_id, 211604);
        assert_eq!(record.product_id, Some(778));
        assert_eq!(record.quantity_sold, 2_100_000.0);
        assert_eq!(record.current_stock, 500_000.0);
    }

    #[test]
    fn test_missing_stock_defaults_to_zero() {
        let raw = row(&[
            ("store_id", "1"),
            ("group_id", "410204.0"),
            ("quantity_sold", "12.5"),
            ("current_stock", ""),
        ]);

        let record = SalesFieldMapper.map_to_sales_record(&raw, 1).unwrap();

        assert_eq!(record.group_id, 410204);
        assert_eq!(record.current_stock, 0.0);
        assert!(record.product_id.is_none());
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let raw = row(&[("store_id", "1"), ("group_id", "1"), ("quantity_sold", "-1")]);

        let err = SalesFieldMapper.map_to_sales_record(&raw, 4).unwrap_err();
        assert!(matches!(err, ImportError::NegativeQuantity { row: 4, .. }));
    }

    #[test]
    fn test_bad_number_reports_row_and_field() {
        let raw = row(&[("store_id", "abc"), ("group_id", "1"), ("quantity_sold", "1")]);

        match SalesFieldMapper.map_to_sales_record(&raw, 7).unwrap_err() {
            ImportError::TypeConversionError { row, field, .. } => {
                assert_eq!(row, 7);
                assert_eq!(field, "store_id");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_required_columns() {
        let ok = row(&[("id_loja", "1"), ("group_id", "1"), ("quantity_sold", "1")]);
        assert!(SalesFieldMapper.check_required_columns(&ok).is_ok());

        let missing = row(&[("store_id", "1"), ("quantity_sold", "1")]);
        assert!(matches!(
            SalesFieldMapper.check_required_columns(&missing),
            Err(ImportError::MissingColumn(field)) if field == "group_id"
        ));
    }
}
