// ==========================================
// 餐厅库存批量导入系统 - 采购物品处理器
// ==========================================
// 依据: Column_Layout_Spec_v0.4.md - 采购物品列布局(14 列)
// 跨行不变量: 本次运行新引入且参与订货的物品,必须至少有一行
//             把某个供应商标为主供应商;违规错误挂在该物品
//             首次出现的行上
// ==========================================

use crate::coerce::{coerce_boolean, numeric_value};
use crate::domain::inventory::{NewInventoryItem, NewVendorInventoryItem};
use crate::domain::types::ItemKind;
use crate::engine::error::ImportError;
use crate::engine::handlers::ImportHandler;
use crate::engine::load::LoadContext;
use crate::engine::verify::RowChecker;
use crate::source::CellValue;
use std::collections::HashMap;

// ===== 列布局（1 起始）=====
pub const ITEM_NAME_COLUMN: usize = 1;
pub const ITEM_UNIT_COLUMN: usize = 2;
pub const TENANT_ITEM_ID_COLUMN: usize = 3;
pub const ITEM_DESC_COLUMN: usize = 4;
pub const ACCT_CATEGORY_COLUMN: usize = 5;
pub const TAXABLE_COLUMN: usize = 6;
pub const ORDERING_COLUMN: usize = 7;
pub const INVENTORY_COLUMN: usize = 8;
pub const BEGINNING_COST_COLUMN: usize = 9;
pub const PRIMARY_VENDOR_COLUMN: usize = 10;
pub const VENDOR_KEY_COLUMN: usize = 11;
pub const VENDOR_ITEM_ID_COLUMN: usize = 12;
pub const ORDER_UNIT_COLUMN: usize = 13;
pub const PACK_VALUE_COLUMN: usize = 14;

// 本次运行内"新引入的订货物品"的追踪条目
struct NewOrderingItemEntry {
    row_index: usize,
    primary_vendor_set: bool,
}

// ==========================================
// PurchaseItemsHandler
// ==========================================
pub struct PurchaseItemsHandler {
    // 物品名 → 首次引入行与主供应商标志;一次校验遍历的作用域,
    // 每次运行在 before_verify_all_rows 重置
    primary_vendor_tracker: HashMap<String, NewOrderingItemEntry>,
}

impl PurchaseItemsHandler {
    pub fn new() -> Self {
        Self {
            primary_vendor_tracker: HashMap::new(),
        }
    }

    fn track_new_ordering_item(&mut self, item_name: &str, row_index: usize) {
        self.primary_vendor_tracker
            .entry(item_name.to_string())
            .or_insert(NewOrderingItemEntry {
                row_index,
                primary_vendor_set: false,
            });
    }

    fn track_primary_vendor_seen(&mut self, item_name: &str) {
        if let Some(entry) = self.primary_vendor_tracker.get_mut(item_name) {
            entry.primary_vendor_set = true;
        }
    }
}

impl Default for PurchaseItemsHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportHandler for PurchaseItemsHandler {
    fn column_names(&self) -> Vec<&'static str> {
        vec![
            "",
            "Item name",
            "Item unit",
            "Restaurant identifier",
            "Item description",
            "Accounting category",
            "Taxable",
            "Ordering",
            "Inventory",
            "Begining inventory cost",
            "Primary vendor flag",
            "Vendor key",
            "Vendor identifier",
            "Order unit",
            "Pack value",
        ]
    }

    fn before_verify_all_rows(&mut self) {
        self.primary_vendor_tracker.clear();
    }

    fn verify_row(&mut self, row_index: usize, cx: &RowChecker<'_>) -> Result<(), ImportError> {
        let name_value = cx.require_cell(row_index, ITEM_NAME_COLUMN)?;
        let item_name = name_value.as_ref().map(CellValue::to_text);
        let existing_item = match item_name.as_deref() {
            Some(name) => cx.gateway().inventory_item_by_name(name)?,
            None => None,
        };
        let item_is_new = existing_item.is_none();

        let unit_value = cx.require_cell(row_index, ITEM_UNIT_COLUMN)?;
        if let Some(value) = &unit_value {
            cx.require_unit_by_name(value, row_index, ITEM_UNIT_COLUMN)?;
        }

        cx.optional_cell(row_index, TENANT_ITEM_ID_COLUMN);
        cx.optional_cell(row_index, ITEM_DESC_COLUMN);

        let category_value = cx.require_cell(row_index, ACCT_CATEGORY_COLUMN)?;
        if let Some(value) = &category_value {
            cx.require_category_by_name(value, row_index, ACCT_CATEGORY_COLUMN)?;
        }

        let taxable_value = cx.require_cell(row_index, TAXABLE_COLUMN)?;
        if let Some(value) = &taxable_value {
            cx.restrict_boolean(value, row_index, TAXABLE_COLUMN)?;
        }

        let ordering_value = cx.require_cell(row_index, ORDERING_COLUMN)?;
        if let Some(value) = &ordering_value {
            cx.restrict_boolean(value, row_index, ORDERING_COLUMN)?;
        }
        let used_for_ordering = ordering_value
            .as_ref()
            .and_then(coerce_boolean)
            .unwrap_or(false);

        let inventory_value = cx.require_cell(row_index, INVENTORY_COLUMN)?;
        if let Some(value) = &inventory_value {
            cx.restrict_boolean(value, row_index, INVENTORY_COLUMN)?;
        }

        if let Some(value) = cx.optional_cell(row_index, BEGINNING_COST_COLUMN) {
            cx.restrict_decimal(&value, row_index, BEGINNING_COST_COLUMN)?;
            cx.restrict_non_negative(&value, row_index, BEGINNING_COST_COLUMN)?;
        }

        if used_for_ordering {
            // 订货行: 五个供应商相关列全部必填且需解析通过
            if item_is_new {
                if let Some(name) = &item_name {
                    self.track_new_ordering_item(name, row_index);
                }
            }

            let primary_value = cx.require_cell(row_index, PRIMARY_VENDOR_COLUMN)?;
            if let Some(value) = &primary_value {
                cx.restrict_boolean(value, row_index, PRIMARY_VENDOR_COLUMN)?;
            }
            let is_primary_vendor = primary_value
                .as_ref()
                .and_then(coerce_boolean)
                .unwrap_or(false);
            if is_primary_vendor && item_is_new {
                if let Some(name) = &item_name {
                    self.track_primary_vendor_seen(name);
                }
            }

            let vendor_key_value = cx.require_cell(row_index, VENDOR_KEY_COLUMN)?;
            let vendor = match &vendor_key_value {
                Some(value) => cx.require_vendor_by_key(value, row_index, VENDOR_KEY_COLUMN)?,
                None => None,
            };

            cx.optional_cell(row_index, VENDOR_ITEM_ID_COLUMN);

            let order_unit_value = cx.require_cell(row_index, ORDER_UNIT_COLUMN)?;
            let order_unit = match &order_unit_value {
                Some(value) => cx.require_unit_by_name(value, row_index, ORDER_UNIT_COLUMN)?,
                None => None,
            };
            if let (Some(vendor), Some(order_unit)) = (&vendor, &order_unit) {
                cx.restrict_unit_allowed_for_vendor(
                    order_unit,
                    vendor,
                    row_index,
                    ORDER_UNIT_COLUMN,
                )?;
            }

            let pack_value = cx.require_cell(row_index, PACK_VALUE_COLUMN)?;
            if let Some(value) = &pack_value {
                let is_decimal = cx.restrict_decimal(value, row_index, PACK_VALUE_COLUMN)?;
                if is_decimal {
                    cx.restrict_non_negative(value, row_index, PACK_VALUE_COLUMN)?;
                }
            }
        } else {
            // 非订货行: 五个供应商相关列必须留空
            let explanation = "Item is not used for ordering.";
            cx.require_blank(row_index, PRIMARY_VENDOR_COLUMN, explanation)?;
            cx.require_blank(row_index, VENDOR_KEY_COLUMN, explanation)?;
            cx.require_blank(row_index, VENDOR_ITEM_ID_COLUMN, explanation)?;
            cx.require_blank(row_index, ORDER_UNIT_COLUMN, explanation)?;
            cx.require_blank(row_index, PACK_VALUE_COLUMN, explanation)?;
        }

        Ok(())
    }

    fn after_verify_all_rows(&mut self, cx: &RowChecker<'_>) -> Result<(), ImportError> {
        // 按首次出现的行号排序,错误输出确定有序
        let mut entries: Vec<(&String, &NewOrderingItemEntry)> =
            self.primary_vendor_tracker.iter().collect();
        entries.sort_by_key(|(_, entry)| entry.row_index);

        for (item_name, entry) in entries {
            if !entry.primary_vendor_set {
                let message = format!(
                    "New inventory item {:?} introduced on row #{} is flagged for Ordering (column #{}) but does not have a vendor flagged as Primary (column #{}).",
                    item_name, entry.row_index, ORDERING_COLUMN, PRIMARY_VENDOR_COLUMN
                );
                cx.create_error(entry.row_index, PRIMARY_VENDOR_COLUMN, &message)?;
            }
        }

        Ok(())
    }

    fn process_row(
        &mut self,
        row_index: usize,
        cx: &mut LoadContext<'_>,
    ) -> Result<(), ImportError> {
        let item_name = cx.cell(row_index, ITEM_NAME_COLUMN).map(|v| v.to_text());
        let item_unit_name = cx.cell(row_index, ITEM_UNIT_COLUMN).map(|v| v.to_text());
        let tenant_item_identifier = cx
            .cell(row_index, TENANT_ITEM_ID_COLUMN)
            .map(|v| v.to_text());
        let item_description = cx.cell(row_index, ITEM_DESC_COLUMN).map(|v| v.to_text());
        let category_name = cx.cell(row_index, ACCT_CATEGORY_COLUMN).map(|v| v.to_text());
        let taxable = cx
            .cell(row_index, TAXABLE_COLUMN)
            .as_ref()
            .and_then(coerce_boolean)
            .unwrap_or(false);
        let used_for_ordering = cx
            .cell(row_index, ORDERING_COLUMN)
            .as_ref()
            .and_then(coerce_boolean)
            .unwrap_or(false);
        let used_for_inventory = cx
            .cell(row_index, INVENTORY_COLUMN)
            .as_ref()
            .and_then(coerce_boolean)
            .unwrap_or(false);
        let beginning_cost = cx
            .cell(row_index, BEGINNING_COST_COLUMN)
            .map(|v| numeric_value(&v));
        let is_primary_vendor = cx
            .cell(row_index, PRIMARY_VENDOR_COLUMN)
            .as_ref()
            .and_then(coerce_boolean)
            .unwrap_or(false);
        let vendor_key = cx.cell(row_index, VENDOR_KEY_COLUMN).map(|v| v.to_text());
        let vendor_specific_identifier = cx
            .cell(row_index, VENDOR_ITEM_ID_COLUMN)
            .map(|v| v.to_text());
        let order_unit_name = cx.cell(row_index, ORDER_UNIT_COLUMN).map(|v| v.to_text());
        let pack_value = cx
            .cell(row_index, PACK_VALUE_COLUMN)
            .map(|v| numeric_value(&v));

        // 名称/描述/分类缺一的行不构成可装载记录,不产生计数
        let (item_name, item_description, category_name) =
            match (item_name, item_description, category_name) {
                (Some(name), Some(description), Some(category)) => (name, description, category),
                _ => return Ok(()),
            };

        let accounting_category = cx.gateway().accounting_category_by_name(&category_name)?;
        let item_unit = match &item_unit_name {
            Some(name) => cx.gateway().unit_by_name(name)?,
            None => None,
        };
        let order_unit = match &order_unit_name {
            Some(name) => cx.gateway().unit_by_name(name)?,
            None => None,
        };

        // 物品按 (name, tenant) 幂等插入;已存在时不改动其静态属性
        let mut inventory_item_added = false;
        let purchased_item = match cx.gateway().inventory_item_by_name(&item_name)? {
            Some(item) => item,
            None => {
                let item = cx.gateway().create_inventory_item(&NewInventoryItem {
                    tenant_id: cx.gateway().tenant().id.clone(),
                    name: item_name.clone(),
                    description: item_description.clone(),
                    tenant_item_identifier: tenant_item_identifier.clone(),
                    kind: ItemKind::Purchase,
                    accounting_category_id: accounting_category.as_ref().map(|c| c.id),
                    item_unit_id: item_unit.as_ref().map(|u| u.id),
                    taxable,
                    ordering: used_for_ordering,
                    inventory: used_for_inventory,
                    starting_average_cost: beginning_cost,
                    recipe_cost_per_unit: None,
                    recipe_cost_timestamp: None,
                })?;
                tracing::info!(item_id = item.id, actor_id = %cx.actor_id(), "Inventory item created");
                inventory_item_added = true;
                item
            }
        };

        // 供应商关联按 (vendor, item, vendor_specific_identifier, order_unit)
        // 幂等插入;完全相同的键静默跳过,不同的编号/单位组合追加新关联
        let mut vendor_item_added = false;
        let vendor = match &vendor_key {
            Some(key) => cx.gateway().vendor_by_key(key)?,
            None => None,
        };
        if let Some(vendor) = vendor {
            if used_for_ordering {
                let existing_link = cx.gateway().find_vendor_inventory_item(
                    vendor.id,
                    purchased_item.id,
                    vendor_specific_identifier.as_deref(),
                    order_unit.as_ref().map(|u| u.id),
                )?;

                if existing_link.is_none() {
                    let link_id =
                        cx.gateway()
                            .create_vendor_inventory_item(&NewVendorInventoryItem {
                                tenant_id: cx.gateway().tenant().id.clone(),
                                vendor_id: vendor.id,
                                inventory_item_id: purchased_item.id,
                                order_unit_id: order_unit.as_ref().map(|u| u.id),
                                pack_value,
                                vendor_specific_identifier: vendor_specific_identifier.clone(),
                                is_primary_vendor,
                            })?;
                    tracing::info!(
                        vendor_inventory_item_id = link_id,
                        actor_id = %cx.actor_id(),
                        "Vendor inventory item created"
                    );
                    vendor_item_added = true;
                }
            }
        }

        if inventory_item_added || vendor_item_added {
            cx.count_added()?;
        } else {
            cx.count_skipped()?;
        }

        Ok(())
    }
}
