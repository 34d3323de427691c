// ==========================================
// 餐厅库存批量导入系统 - 租户数据 Repository Trait
// ==========================================
// 职责: 定义导入流水线所需的租户数据窄契约（查询 + 少量写入）
// 红线: Repository 不含业务规则，只做数据 CRUD
// 口径: 名称/编码查询一律大小写不敏感，且以租户为作用域
// ==========================================

use crate::domain::inventory::{
    AccountingCategory, InventoryItem, MeasureUnit, NewInventoryItem, NewVendorInventoryItem,
    Tenant, Vendor, VendorInventoryItem,
};
use crate::repository::error::RepositoryResult;

// ==========================================
// TenantRepository Trait
// ==========================================
// 用途: 租户主数据解析与库存物品写入
// 实现者: TenantRepositoryImpl（使用 rusqlite）
pub trait TenantRepository: Send + Sync {
    // ===== 租户 =====

    /// 按 ID 查询租户
    fn find_tenant(&self, tenant_id: &str) -> RepositoryResult<Option<Tenant>>;

    // ===== 主数据解析（大小写不敏感）=====

    /// 按供应商编码查询供应商
    fn find_vendor_by_key(&self, tenant_id: &str, key: &str)
        -> RepositoryResult<Option<Vendor>>;

    /// 按名称查询会计分类
    fn find_category_by_name(
        &self,
        tenant_id: &str,
        name: &str,
    ) -> RepositoryResult<Option<AccountingCategory>>;

    /// 按名称查询计量单位
    fn find_unit_by_name(
        &self,
        tenant_id: &str,
        name: &str,
    ) -> RepositoryResult<Option<MeasureUnit>>;

    /// 按 ID 查询库存物品
    fn find_item_by_id(
        &self,
        tenant_id: &str,
        item_id: i64,
    ) -> RepositoryResult<Option<InventoryItem>>;

    /// 按名称查询库存物品
    fn find_item_by_name(
        &self,
        tenant_id: &str,
        name: &str,
    ) -> RepositoryResult<Option<InventoryItem>>;

    // ===== 写入 =====

    /// 插入库存物品
    ///
    /// # 返回
    /// - Ok(i64): 新物品 ID
    fn insert_item(&self, item: &NewInventoryItem) -> RepositoryResult<i64>;

    /// 覆写物品的期初平均成本
    fn update_item_starting_cost(
        &self,
        tenant_id: &str,
        item_id: i64,
        cost: f64,
    ) -> RepositoryResult<()>;

    /// 按四元唯一键查询供应商-物品关联
    ///
    /// 唯一键: (vendor, item, vendor_specific_identifier, order_unit)；
    /// 编号与单位允许为 NULL，NULL 与 NULL 视为相等
    fn find_vendor_item(
        &self,
        vendor_id: i64,
        inventory_item_id: i64,
        vendor_specific_identifier: Option<&str>,
        order_unit_id: Option<i64>,
    ) -> RepositoryResult<Option<VendorInventoryItem>>;

    /// 插入供应商-物品关联
    ///
    /// # 返回
    /// - Ok(i64): 新关联 ID
    fn insert_vendor_item(&self, link: &NewVendorInventoryItem) -> RepositoryResult<i64>;
}
