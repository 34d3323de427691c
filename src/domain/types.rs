// ==========================================
// 餐厅库存批量导入系统 - 领域类型定义
// ==========================================
// 依据: Import_Engine_Design_v0.4.md - 任务生命周期与格式选择
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 任务状态 (Job Status)
// ==========================================
// 生命周期: PENDING → PROCESSING → PROCESSED
// 红线: 状态只由流水线推进,不可回退
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,    // 已提交,等待处理
    Processing, // 流水线处理中
    Processed,  // 处理完毕(无论有无行错误)
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Processing => "PROCESSING",
            JobStatus::Processed => "PROCESSED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PENDING" => Some(JobStatus::Pending),
            "PROCESSING" => Some(JobStatus::Processing),
            "PROCESSED" => Some(JobStatus::Processed),
            _ => None,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 文件内容类型 (Content Type)
// ==========================================
// 仅识别两种 MIME 标记,其余一律拒绝
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Csv,   // text/csv
    Excel, // application/vnd.openxmlformats-officedocument.spreadsheetml.sheet
}

impl ContentType {
    pub const CSV_MIME: &'static str = "text/csv";
    pub const EXCEL_MIME: &'static str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

    pub fn from_mime(tag: &str) -> Option<Self> {
        match tag {
            Self::CSV_MIME => Some(ContentType::Csv),
            Self::EXCEL_MIME => Some(ContentType::Excel),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            ContentType::Csv => Self::CSV_MIME,
            ContentType::Excel => Self::EXCEL_MIME,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_mime())
    }
}

// ==========================================
// 导入操作 (Import Operation)
// ==========================================
// 决定使用哪个列处理器;在流水线构造时一次性选定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportOperation {
    PurchaseItems,  // 采购物品(14 列)
    HousemadeItems, // 自制物品(7 列)
    BeginningCosts, // 期初成本更新(6 列)
}

impl ImportOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportOperation::PurchaseItems => "PURCHASE_ITEMS",
            ImportOperation::HousemadeItems => "HOUSEMADE_ITEMS",
            ImportOperation::BeginningCosts => "BEGINNING_COSTS",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PURCHASE_ITEMS" | "purchase-items" => Some(ImportOperation::PurchaseItems),
            "HOUSEMADE_ITEMS" | "housemade-items" => Some(ImportOperation::HousemadeItems),
            "BEGINNING_COSTS" | "beginning-costs" => Some(ImportOperation::BeginningCosts),
            _ => None,
        }
    }
}

impl fmt::Display for ImportOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 库存物品类别 (Item Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Purchase,  // 采购物品
    Housemade, // 自制物品
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Purchase => "PURCHASE",
            ItemKind::Housemade => "HOUSEMADE",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PURCHASE" => Some(ItemKind::Purchase),
            "HOUSEMADE" => Some(ItemKind::Housemade),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_round_trip() {
        for status in [JobStatus::Pending, JobStatus::Processing, JobStatus::Processed] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("DONE"), None);
    }

    #[test]
    fn test_content_type_recognizes_exactly_two_tags() {
        assert_eq!(ContentType::from_mime("text/csv"), Some(ContentType::Csv));
        assert_eq!(
            ContentType::from_mime(
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            ),
            Some(ContentType::Excel)
        );
        assert_eq!(ContentType::from_mime("application/pdf"), None);
        assert_eq!(ContentType::from_mime("TEXT/CSV"), None);
    }

    #[test]
    fn test_operation_parse_accepts_cli_aliases() {
        assert_eq!(
            ImportOperation::parse("purchase-items"),
            Some(ImportOperation::PurchaseItems)
        );
        assert_eq!(
            ImportOperation::parse("BEGINNING_COSTS"),
            Some(ImportOperation::BeginningCosts)
        );
        assert_eq!(ImportOperation::parse("recipes"), None);
    }
}
