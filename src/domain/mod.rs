// ==========================================
// 餐厅库存批量导入系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod inventory;
pub mod job;
pub mod types;

// 重导出核心类型
pub use inventory::{
    AccountingCategory, InventoryItem, MeasureUnit, NewInventoryItem, NewVendorInventoryItem,
    Tenant, Vendor, VendorInventoryItem,
};
pub use job::{ImportJob, ImportRowError, NewImportRowError};
pub use types::{ContentType, ImportOperation, ItemKind, JobStatus};
