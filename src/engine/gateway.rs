// ==========================================
// 餐厅库存批量导入系统 - 租户查询网关
// ==========================================
// 依据: Import_Engine_Design_v0.4.md - 主数据解析口径
// 职责: 绑定已解析的租户,向处理器提供大小写不敏感的主数据
//       解析与少量写入;处理器因此无需逐调用传递租户
// ==========================================

use crate::domain::inventory::{
    AccountingCategory, InventoryItem, MeasureUnit, NewInventoryItem, NewVendorInventoryItem,
    Tenant, Vendor, VendorInventoryItem,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::tenant_repo::TenantRepository;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

// ==========================================
// TenantGateway
// ==========================================
pub struct TenantGateway {
    store: Arc<dyn TenantRepository>,
    tenant: Tenant,
}

impl TenantGateway {
    pub fn new(store: Arc<dyn TenantRepository>, tenant: Tenant) -> Self {
        Self { store, tenant }
    }

    pub fn tenant(&self) -> &Tenant {
        &self.tenant
    }

    // ===== 主数据解析（大小写不敏感,租户作用域）=====

    pub fn inventory_item_by_id(&self, item_id: i64) -> RepositoryResult<Option<InventoryItem>> {
        self.store.find_item_by_id(&self.tenant.id, item_id)
    }

    pub fn inventory_item_by_name(&self, name: &str) -> RepositoryResult<Option<InventoryItem>> {
        self.store.find_item_by_name(&self.tenant.id, name)
    }

    pub fn vendor_by_key(&self, key: &str) -> RepositoryResult<Option<Vendor>> {
        self.store.find_vendor_by_key(&self.tenant.id, key)
    }

    pub fn accounting_category_by_name(
        &self,
        name: &str,
    ) -> RepositoryResult<Option<AccountingCategory>> {
        self.store.find_category_by_name(&self.tenant.id, name)
    }

    pub fn unit_by_name(&self, name: &str) -> RepositoryResult<Option<MeasureUnit>> {
        self.store.find_unit_by_name(&self.tenant.id, name)
    }

    // ===== 写入 =====

    /// 插入库存物品并回读完整记录
    pub fn create_inventory_item(
        &self,
        item: &NewInventoryItem,
    ) -> RepositoryResult<InventoryItem> {
        let item_id = self.store.insert_item(item)?;
        self.store
            .find_item_by_id(&self.tenant.id, item_id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "inventory_item".to_string(),
                id: item_id.to_string(),
            })
    }

    pub fn update_item_starting_cost(&self, item_id: i64, cost: f64) -> RepositoryResult<()> {
        self.store
            .update_item_starting_cost(&self.tenant.id, item_id, cost)
    }

    pub fn find_vendor_inventory_item(
        &self,
        vendor_id: i64,
        inventory_item_id: i64,
        vendor_specific_identifier: Option<&str>,
        order_unit_id: Option<i64>,
    ) -> RepositoryResult<Option<VendorInventoryItem>> {
        self.store.find_vendor_item(
            vendor_id,
            inventory_item_id,
            vendor_specific_identifier,
            order_unit_id,
        )
    }

    pub fn create_vendor_inventory_item(
        &self,
        link: &NewVendorInventoryItem,
    ) -> RepositoryResult<i64> {
        self.store.insert_vendor_item(link)
    }

    // ===== 时间口径 =====

    /// 日历日期 → 租户本地当日零点（UTC 时刻）
    pub fn beginning_of_day_local(&self, date: NaiveDate) -> DateTime<Utc> {
        self.tenant.beginning_of_day_local(date)
    }
}
