// ==========================================
// 餐厅库存批量导入系统 - CSV 行数据源
// ==========================================
// 依据: Import_Engine_Design_v0.4.md - 分隔文本适配器
// 约定: 整个字节载荷一次性解析;首行编号恒为 1(表头)
// ==========================================

use crate::engine::error::ImportError;
use crate::source::{CellValue, RowSource};
use csv::ReaderBuilder;

// ==========================================
// CsvRowSource
// ==========================================
pub struct CsvRowSource {
    rows: Vec<Vec<String>>,
}

impl CsvRowSource {
    /// 从原始字节解析 CSV
    ///
    /// # 说明
    /// - flexible: 允许行与行之间字段数不一致(缺失的尾部字段按缺失单元格处理)
    /// - 表头不在本层剥离,由引擎按"跳过首行"统一处理
    pub fn from_bytes(data: &[u8]) -> Result<Self, ImportError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| ImportError::SourceParseError(e.to_string()))?;
            rows.push(record.iter().map(|field| field.to_string()).collect());
        }

        Ok(Self { rows })
    }
}

impl RowSource for CsvRowSource {
    fn first_row_index(&self) -> usize {
        1
    }

    fn last_row_index(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, row_index: usize, column_index: usize) -> Option<CellValue> {
        let row = self.rows.get(row_index.checked_sub(1)?)?;
        let field = row.get(column_index.checked_sub(1)?)?;

        // 空字段按缺失单元格处理("必填"校验与"必须留空"校验因此口径一致)
        if field.is_empty() {
            None
        } else {
            Some(CellValue::Text(field.clone()))
        }
    }
}
