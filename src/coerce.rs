// ==========================================
// 餐厅库存批量导入系统 - 类型转换库
// ==========================================
// 依据: Import_Engine_Design_v0.4.md - 单元格类型口径
// 职责: 把弱类型单元格值转换为布尔/日期,以及整数/小数字面量形状检查
// 红线: 三态语义: Some(true)/Some(false) 与 None("无法解析")不可混同,
//       调用方只能把 None 当作类型错误,不得当作 false
// ==========================================

use crate::source::CellValue;
use chrono::NaiveDate;

/// 识别为 true 的字符串（小写比较）
pub const TRUE_STRINGS: [&str; 4] = ["true", "yes", "t", "y"];

/// 识别为 false 的字符串（小写比较）
pub const FALSE_STRINGS: [&str; 4] = ["false", "no", "f", "n"];

// ==========================================
// 布尔转换
// ==========================================

/// 单元格值 → 布尔
///
/// - 原生布尔直接透传
/// - 字符串去首尾空白、转小写后查表
/// - 其余情况（数字/日期/无法识别的字符串）返回 None
pub fn coerce_boolean(value: &CellValue) -> Option<bool> {
    match value {
        CellValue::Bool(b) => Some(*b),
        CellValue::Text(s) => {
            let normalized = s.trim().to_lowercase();
            if TRUE_STRINGS.contains(&normalized.as_str()) {
                Some(true)
            } else if FALSE_STRINGS.contains(&normalized.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

// ==========================================
// 日期转换
// ==========================================

/// 单元格值 → 日期
///
/// 字符串按序匹配三种格式,先中先得:
/// 1. M/D/YY   （两位年份按 chrono `%y` 的世纪规则: 00-68 → 20xx, 69-99 → 19xx）
/// 2. M/D/YYYY
/// 3. YYYY-MM-DD
///
/// 形状不符（如 "1/2"、"01-02-19"）或类型不符一律返回 None
pub fn coerce_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Text(s) => {
            let normalized = s.trim();
            if is_short_slash_date(normalized) {
                NaiveDate::parse_from_str(normalized, "%m/%d/%y").ok()
            } else if is_long_slash_date(normalized) {
                NaiveDate::parse_from_str(normalized, "%m/%d/%Y").ok()
            } else if is_iso_date(normalized) {
                NaiveDate::parse_from_str(normalized, "%Y-%m-%d").ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

// ==========================================
// 数字字面量形状检查
// ==========================================

/// 整数字面量: 可选负号 + 一位以上数字
pub fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// 小数字面量: 可选负号,数字串中最多一个小数点,
/// 允许裸点开头（".5"）或结尾（"5."），但至少要有一位数字
pub fn is_decimal_literal(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    if body.is_empty() {
        return false;
    }

    let mut digit_seen = false;
    let mut dot_seen = false;
    for ch in body.chars() {
        match ch {
            '0'..='9' => digit_seen = true,
            '.' if !dot_seen => dot_seen = true,
            _ => return false,
        }
    }
    digit_seen
}

/// 单元格值是否可作为整数消费（原生数字一律放行）
pub fn is_integer_value(value: &CellValue) -> bool {
    match value {
        CellValue::Number(_) => true,
        CellValue::Text(s) => is_integer_literal(s.trim()),
        _ => false,
    }
}

/// 单元格值是否可作为小数消费（原生数字一律放行）
pub fn is_decimal_value(value: &CellValue) -> bool {
    match value {
        CellValue::Number(_) => true,
        CellValue::Text(s) => is_decimal_literal(s.trim()),
        _ => false,
    }
}

/// 数值读取,用于大小比较与落库
///
/// 调用方必须先通过整数/小数检查;未通过检查的字符串按 0.0 读取
pub fn numeric_value(value: &CellValue) -> f64 {
    match value {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

// ===== 日期形状辅助 =====

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

// "a/b/c" → 各段均为数字时返回 (a 位数, b 位数, c 位数)
fn slash_parts(s: &str) -> Option<(usize, usize, usize)> {
    let mut parts = s.split('/');
    let (a, b, c) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    if is_digits(a) && is_digits(b) && is_digits(c) {
        Some((a.len(), b.len(), c.len()))
    } else {
        None
    }
}

fn is_short_slash_date(s: &str) -> bool {
    matches!(slash_parts(s), Some((m, d, 2)) if m <= 2 && d <= 2)
}

fn is_long_slash_date(s: &str) -> bool {
    matches!(slash_parts(s), Some((m, d, 4)) if m <= 2 && d <= 2)
}

fn is_iso_date(s: &str) -> bool {
    let mut parts = s.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(y), Some(m), Some(d), None) => {
            is_digits(y) && y.len() == 4 && is_digits(m) && m.len() == 2 && is_digits(d) && d.len() == 2
        }
        _ => false,
    }
}
