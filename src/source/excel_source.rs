// ==========================================
// 餐厅库存批量导入系统 - Excel 行数据源
// ==========================================
// 依据: Import_Engine_Design_v0.4.md - 电子表格适配器
// 约定: 只读取第一个工作表;首/末行取工作表原生已用区间
// 红线: 数字/日期/布尔单元格保留原生类型,不做字符串化
// ==========================================

use crate::engine::error::ImportError;
use crate::source::{CellValue, RowSource};
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use chrono::NaiveDateTime;
use std::io::Cursor;

// ==========================================
// ExcelRowSource
// ==========================================
pub struct ExcelRowSource {
    range: Range<Data>,
}

impl ExcelRowSource {
    /// 从原始字节打开工作簿（首个工作表）
    pub fn from_bytes(data: &[u8]) -> Result<Self, ImportError> {
        let cursor = Cursor::new(data.to_vec());
        let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor)
            .map_err(|e: calamine::XlsxError| ImportError::SourceParseError(e.to_string()))?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::SourceParseError(
                "工作簿不含任何工作表".to_string(),
            ));
        }

        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::SourceParseError(e.to_string()))?;

        Ok(Self { range })
    }
}

impl RowSource for ExcelRowSource {
    fn first_row_index(&self) -> usize {
        // 内容整体下移的工作表会报告大于 1 的首行;契约只保证"首行即表头"
        self.range
            .start()
            .map(|(row, _)| row as usize + 1)
            .unwrap_or(1)
    }

    fn last_row_index(&self) -> usize {
        self.range
            .end()
            .map(|(row, _)| row as usize + 1)
            .unwrap_or(0)
    }

    fn cell(&self, row_index: usize, column_index: usize) -> Option<CellValue> {
        let row = row_index.checked_sub(1)?;
        let column = column_index.checked_sub(1)?;
        let data = self.range.get_value((row as u32, column as u32))?;
        convert_cell(data)
    }
}

// calamine 原生值 → CellValue；空单元格与空字符串按缺失处理
fn convert_cell(data: &Data) -> Option<CellValue> {
    match data {
        Data::Empty => None,
        Data::String(s) => {
            if s.is_empty() {
                None
            } else {
                Some(CellValue::Text(s.clone()))
            }
        }
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(dt) => dt.as_datetime().map(CellValue::DateTime),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .map(CellValue::DateTime)
            .or_else(|| Some(CellValue::Text(s.clone()))),
        Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cell_preserves_native_types() {
        assert_eq!(convert_cell(&Data::Empty), None);
        assert_eq!(convert_cell(&Data::String(String::new())), None);
        assert_eq!(
            convert_cell(&Data::String("Each".to_string())),
            Some(CellValue::Text("Each".to_string()))
        );
        assert_eq!(convert_cell(&Data::Float(2.5)), Some(CellValue::Number(2.5)));
        assert_eq!(convert_cell(&Data::Int(7)), Some(CellValue::Number(7.0)));
        assert_eq!(convert_cell(&Data::Bool(true)), Some(CellValue::Bool(true)));
    }

    #[test]
    fn test_garbage_bytes_are_a_parse_error() {
        let result = ExcelRowSource::from_bytes(b"not a zip archive");
        assert!(result.is_err());
    }
}
