// ==========================================
// 餐厅库存批量导入系统 - 租户数据 Repository 实现
// ==========================================
// 存储: SQLite（rusqlite）
// 表: tenants / accounting_categories / measure_units / vendors /
//     inventory_items / vendor_inventory_items
// 口径: 名称/编码匹配使用 COLLATE NOCASE
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::inventory::{
    AccountingCategory, InventoryItem, MeasureUnit, NewInventoryItem, NewVendorInventoryItem,
    Tenant, Vendor, VendorInventoryItem,
};
use crate::domain::types::ItemKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::tenant_repo::TenantRepository;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// TenantRepositoryImpl
// ==========================================
pub struct TenantRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl TenantRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::LockError("连接互斥锁中毒".to_string()))
    }
}

// inventory_items 行 → InventoryItem
fn row_to_item(row: &Row<'_>) -> rusqlite::Result<InventoryItem> {
    let kind_raw: String = row.get("kind")?;
    let kind = ItemKind::parse(&kind_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("未知物品类别: {kind_raw}").into(),
        )
    })?;

    Ok(InventoryItem {
        id: row.get("item_id")?,
        tenant_id: row.get("tenant_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        tenant_item_identifier: row.get("tenant_item_identifier")?,
        kind,
        accounting_category_id: row.get("accounting_category_id")?,
        item_unit_id: row.get("item_unit_id")?,
        taxable: row.get("taxable")?,
        ordering: row.get("ordering")?,
        inventory: row.get("inventory")?,
        starting_average_cost: row.get("starting_average_cost")?,
        recipe_cost_per_unit: row.get("recipe_cost_per_unit")?,
        recipe_cost_timestamp: row.get("recipe_cost_timestamp")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

// vendors 行 → Vendor；allowed_order_unit_ids 以 JSON 数组存储,NULL 表示不限制
fn row_to_vendor(row: &Row<'_>) -> rusqlite::Result<Vendor> {
    let allowed_raw: Option<String> = row.get("allowed_order_unit_ids")?;
    let allowed_order_unit_ids = match allowed_raw {
        None => None,
        Some(raw) => Some(serde_json::from_str::<Vec<i64>>(&raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                format!("allowed_order_unit_ids 解析失败: {e}").into(),
            )
        })?),
    };

    Ok(Vendor {
        id: row.get("vendor_id")?,
        tenant_id: row.get("tenant_id")?,
        key: row.get("vendor_key")?,
        name: row.get("name")?,
        allowed_order_unit_ids,
    })
}

fn row_to_link(row: &Row<'_>) -> rusqlite::Result<VendorInventoryItem> {
    Ok(VendorInventoryItem {
        id: row.get("link_id")?,
        tenant_id: row.get("tenant_id")?,
        vendor_id: row.get("vendor_id")?,
        inventory_item_id: row.get("inventory_item_id")?,
        order_unit_id: row.get("order_unit_id")?,
        pack_value: row.get("pack_value")?,
        vendor_specific_identifier: row.get("vendor_specific_identifier")?,
        is_primary_vendor: row.get("is_primary_vendor")?,
        created_at: row.get("created_at")?,
    })
}

impl TenantRepository for TenantRepositoryImpl {
    fn find_tenant(&self, tenant_id: &str) -> RepositoryResult<Option<Tenant>> {
        let conn = self.lock()?;
        let tenant = conn
            .query_row(
                "SELECT tenant_id, name, utc_offset_minutes FROM tenants WHERE tenant_id = ?1",
                params![tenant_id],
                |row| {
                    Ok(Tenant {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        utc_offset_minutes: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(tenant)
    }

    fn find_vendor_by_key(
        &self,
        tenant_id: &str,
        key: &str,
    ) -> RepositoryResult<Option<Vendor>> {
        let conn = self.lock()?;
        let vendor = conn
            .query_row(
                r#"
                SELECT * FROM vendors
                WHERE tenant_id = ?1 AND vendor_key = ?2 COLLATE NOCASE
                "#,
                params![tenant_id, key],
                row_to_vendor,
            )
            .optional()?;
        Ok(vendor)
    }

    fn find_category_by_name(
        &self,
        tenant_id: &str,
        name: &str,
    ) -> RepositoryResult<Option<AccountingCategory>> {
        let conn = self.lock()?;
        let category = conn
            .query_row(
                r#"
                SELECT category_id, tenant_id, name FROM accounting_categories
                WHERE tenant_id = ?1 AND name = ?2 COLLATE NOCASE
                "#,
                params![tenant_id, name],
                |row| {
                    Ok(AccountingCategory {
                        id: row.get(0)?,
                        tenant_id: row.get(1)?,
                        name: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(category)
    }

    fn find_unit_by_name(
        &self,
        tenant_id: &str,
        name: &str,
    ) -> RepositoryResult<Option<MeasureUnit>> {
        let conn = self.lock()?;
        let unit = conn
            .query_row(
                r#"
                SELECT unit_id, tenant_id, name FROM measure_units
                WHERE tenant_id = ?1 AND name = ?2 COLLATE NOCASE
                "#,
                params![tenant_id, name],
                |row| {
                    Ok(MeasureUnit {
                        id: row.get(0)?,
                        tenant_id: row.get(1)?,
                        name: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(unit)
    }

    fn find_item_by_id(
        &self,
        tenant_id: &str,
        item_id: i64,
    ) -> RepositoryResult<Option<InventoryItem>> {
        let conn = self.lock()?;
        let item = conn
            .query_row(
                "SELECT * FROM inventory_items WHERE tenant_id = ?1 AND item_id = ?2",
                params![tenant_id, item_id],
                row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    fn find_item_by_name(
        &self,
        tenant_id: &str,
        name: &str,
    ) -> RepositoryResult<Option<InventoryItem>> {
        let conn = self.lock()?;
        let item = conn
            .query_row(
                r#"
                SELECT * FROM inventory_items
                WHERE tenant_id = ?1 AND name = ?2 COLLATE NOCASE
                "#,
                params![tenant_id, name],
                row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    fn insert_item(&self, item: &NewInventoryItem) -> RepositoryResult<i64> {
        let conn = self.lock()?;
        let now = Utc::now();
        conn.execute(
            r#"
            INSERT INTO inventory_items (
                tenant_id, name, description, tenant_item_identifier, kind,
                accounting_category_id, item_unit_id,
                taxable, ordering, inventory,
                starting_average_cost, recipe_cost_per_unit, recipe_cost_timestamp,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                item.tenant_id,
                item.name,
                item.description,
                item.tenant_item_identifier,
                item.kind.as_str(),
                item.accounting_category_id,
                item.item_unit_id,
                item.taxable,
                item.ordering,
                item.inventory,
                item.starting_average_cost,
                item.recipe_cost_per_unit,
                item.recipe_cost_timestamp,
                now,
                now,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update_item_starting_cost(
        &self,
        tenant_id: &str,
        item_id: i64,
        cost: f64,
    ) -> RepositoryResult<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            r#"
            UPDATE inventory_items
            SET starting_average_cost = ?1, updated_at = ?2
            WHERE tenant_id = ?3 AND item_id = ?4
            "#,
            params![cost, Utc::now(), tenant_id, item_id],
        )?;

        if updated == 0 {
            return Err(RepositoryError::NotFound {
                entity: "inventory_item".to_string(),
                id: item_id.to_string(),
            });
        }
        Ok(())
    }

    fn find_vendor_item(
        &self,
        vendor_id: i64,
        inventory_item_id: i64,
        vendor_specific_identifier: Option<&str>,
        order_unit_id: Option<i64>,
    ) -> RepositoryResult<Option<VendorInventoryItem>> {
        let conn = self.lock()?;
        // IS 比较让 NULL 与 NULL 相等,四元键因此完整生效
        let link = conn
            .query_row(
                r#"
                SELECT * FROM vendor_inventory_items
                WHERE vendor_id = ?1
                  AND inventory_item_id = ?2
                  AND vendor_specific_identifier IS ?3
                  AND order_unit_id IS ?4
                "#,
                params![
                    vendor_id,
                    inventory_item_id,
                    vendor_specific_identifier,
                    order_unit_id
                ],
                row_to_link,
            )
            .optional()?;
        Ok(link)
    }

    fn insert_vendor_item(&self, link: &NewVendorInventoryItem) -> RepositoryResult<i64> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO vendor_inventory_items (
                tenant_id, vendor_id, inventory_item_id, order_unit_id,
                pack_value, vendor_specific_identifier, is_primary_vendor, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                link.tenant_id,
                link.vendor_id,
                link.inventory_item_id,
                link.order_unit_id,
                link.pack_value,
                link.vendor_specific_identifier,
                link.is_primary_vendor,
                Utc::now(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}
