// ==========================================
// 餐厅库存批量导入系统 - 库存领域模型
// ==========================================
// 依据: Import_Engine_Design_v0.4.md - 租户数据口径
// 红线: 领域结构不含数据访问逻辑
// ==========================================

use crate::domain::types::ItemKind;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Tenant - 租户（餐厅）
// ==========================================
// 所有查询与写入都以租户为作用域
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub utc_offset_minutes: i32, // 本地时区相对 UTC 的固定偏移（分钟）
}

impl Tenant {
    /// 把一个日历日期换算为该租户本地时区的当日零点（UTC 时刻）
    pub fn beginning_of_day_local(&self, date: NaiveDate) -> DateTime<Utc> {
        let local_midnight = date.and_time(NaiveTime::MIN);
        (local_midnight - Duration::minutes(self.utc_offset_minutes as i64)).and_utc()
    }
}

// ==========================================
// AccountingCategory - 会计分类
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountingCategory {
    pub id: i64,
    pub tenant_id: String,
    pub name: String,
}

// ==========================================
// MeasureUnit - 计量单位
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasureUnit {
    pub id: i64,
    pub tenant_id: String,
    pub name: String,
}

// ==========================================
// Vendor - 供应商
// ==========================================
// allowed_order_unit_ids 为 None 表示不限制订货单位
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: i64,
    pub tenant_id: String,
    pub key: String, // 对外供应商编码（导入表里的 Vendor key 列）
    pub name: String,
    pub allowed_order_unit_ids: Option<Vec<i64>>,
}

// ==========================================
// InventoryItem - 库存物品
// ==========================================
// 采购物品与自制物品共用一张表,以 kind 区分
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub tenant_id: String,
    pub name: String,
    pub description: String,
    pub tenant_item_identifier: Option<String>, // 餐厅自有编号
    pub kind: ItemKind,
    pub accounting_category_id: Option<i64>,
    pub item_unit_id: Option<i64>,

    // ===== 采购物品标志 =====
    pub taxable: bool,   // 含税
    pub ordering: bool,  // 参与订货
    pub inventory: bool, // 参与盘点

    // ===== 成本 =====
    pub starting_average_cost: Option<f64>, // 期初平均成本
    pub recipe_cost_per_unit: Option<f64>,  // 配方单位成本（自制物品）
    pub recipe_cost_timestamp: Option<DateTime<Utc>>, // 配方成本生效时刻

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 待插入的库存物品（无 ID，由数据库分配）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub tenant_id: String,
    pub name: String,
    pub description: String,
    pub tenant_item_identifier: Option<String>,
    pub kind: ItemKind,
    pub accounting_category_id: Option<i64>,
    pub item_unit_id: Option<i64>,
    pub taxable: bool,
    pub ordering: bool,
    pub inventory: bool,
    pub starting_average_cost: Option<f64>,
    pub recipe_cost_per_unit: Option<f64>,
    pub recipe_cost_timestamp: Option<DateTime<Utc>>,
}

// ==========================================
// VendorInventoryItem - 供应商-物品关联
// ==========================================
// 唯一键: (vendor, item, vendor_specific_identifier, order_unit)
// 同一供应商+物品允许多条关联,只要编号/单位组合不同
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorInventoryItem {
    pub id: i64,
    pub tenant_id: String,
    pub vendor_id: i64,
    pub inventory_item_id: i64,
    pub order_unit_id: Option<i64>,
    pub pack_value: Option<f64>,
    pub vendor_specific_identifier: Option<String>,
    pub is_primary_vendor: bool,
    pub created_at: DateTime<Utc>,
}

/// 待插入的供应商-物品关联（无 ID，由数据库分配）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVendorInventoryItem {
    pub tenant_id: String,
    pub vendor_id: i64,
    pub inventory_item_id: i64,
    pub order_unit_id: Option<i64>,
    pub pack_value: Option<f64>,
    pub vendor_specific_identifier: Option<String>,
    pub is_primary_vendor: bool,
}
