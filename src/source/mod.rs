// ==========================================
// 餐厅库存批量导入系统 - 行数据源层
// ==========================================
// 依据: Import_Engine_Design_v0.4.md - 格式适配器契约
// 职责: 把 CSV/Excel 统一为 {首行, 末行, 单元格} 三元访问
// 红线: 本层不做字符串化强转,Excel 原生类型原样保留
// ==========================================

pub mod csv_source;
pub mod excel_source;

pub use csv_source::CsvRowSource;
pub use excel_source::ExcelRowSource;

use crate::domain::types::ContentType;
use crate::engine::error::ImportError;
use chrono::NaiveDateTime;

// ==========================================
// CellValue - 单元格值
// ==========================================
// 缺失单元格以 Option::None 表达,不进入本枚举
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// 错误消息中的原始值回显（文本带引号，数字/布尔裸写）
    pub fn repr(&self) -> String {
        match self {
            CellValue::Text(s) => format!("{:?}", s),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => format!("{:?}", dt.to_string()),
        }
    }

    /// 文本渲染（名称/编码等按文本消费的列）
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// 整数读取（Excel 数字向零截断；文本按十进制解析）
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Number(n) => Some(*n as i64),
            CellValue::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

// Excel 整数单元格经 f64 中转,渲染时去掉无意义的 ".0"
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ==========================================
// RowSource Trait - 行数据源契约
// ==========================================
// 约定:
// - first_row_index / last_row_index 双端含闭,均为 1 起始
// - 首个报告的行是表头行,由引擎负责跳过
//   (Excel 表格内容整体下移时,首行编号可能大于 1,契约只保证"首行即表头")
// - cell 对缺失单元格返回 None
pub trait RowSource {
    fn first_row_index(&self) -> usize;
    fn last_row_index(&self) -> usize;
    fn cell(&self, row_index: usize, column_index: usize) -> Option<CellValue>;
}

/// 按声明的内容类型构建对应的行数据源
pub fn build_row_source(
    content_type: ContentType,
    data: &[u8],
) -> Result<Box<dyn RowSource>, ImportError> {
    match content_type {
        ContentType::Csv => Ok(Box::new(CsvRowSource::from_bytes(data)?)),
        ContentType::Excel => Ok(Box::new(ExcelRowSource::from_bytes(data)?)),
    }
}
