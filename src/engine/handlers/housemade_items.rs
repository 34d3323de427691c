// ==========================================
// 餐厅库存批量导入系统 - 自制物品处理器
// ==========================================
// 依据: Column_Layout_Spec_v0.4.md - 自制物品列布局(7 列)
// 装载默认值: 描述缺省为空串,配方成本缺省为 0,
//             日期缺失或不可解析时不写成本时间戳
// ==========================================

use crate::coerce::{coerce_date, numeric_value};
use crate::domain::inventory::NewInventoryItem;
use crate::domain::types::ItemKind;
use crate::engine::error::ImportError;
use crate::engine::handlers::ImportHandler;
use crate::engine::load::LoadContext;
use crate::engine::verify::RowChecker;

// ===== 列布局（1 起始）=====
pub const ITEM_NAME_COLUMN: usize = 1;
pub const ITEM_UNIT_COLUMN: usize = 2;
pub const TENANT_ITEM_ID_COLUMN: usize = 3;
pub const ITEM_DESC_COLUMN: usize = 4;
pub const ACCT_CATEGORY_COLUMN: usize = 5;
pub const RECIPE_COST_COLUMN: usize = 6;
pub const RECIPE_DATE_COLUMN: usize = 7;

// ==========================================
// HousemadeItemsHandler
// ==========================================
pub struct HousemadeItemsHandler;

impl HousemadeItemsHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HousemadeItemsHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportHandler for HousemadeItemsHandler {
    fn column_names(&self) -> Vec<&'static str> {
        vec![
            "",
            "Item name",
            "Item unit",
            "Restaurant identifier",
            "Item description",
            "Accounting category",
            "Recipe cost per unit",
            "Recipe cost date",
        ]
    }

    fn verify_row(&mut self, row_index: usize, cx: &RowChecker<'_>) -> Result<(), ImportError> {
        cx.require_cell(row_index, ITEM_NAME_COLUMN)?;

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

        if let Some(value) = cx.optional_cell(row_index, RECIPE_COST_COLUMN) {
            cx.restrict_decimal(&value, row_index, RECIPE_COST_COLUMN)?;
        }

        if let Some(value) = cx.optional_cell(row_index, RECIPE_DATE_COLUMN) {
            cx.restrict_date(&value, row_index, RECIPE_DATE_COLUMN)?;
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
        let recipe_cost_value = cx.cell(row_index, RECIPE_COST_COLUMN);
        let recipe_date_value = cx.cell(row_index, RECIPE_DATE_COLUMN);

        // 装载默认值
        let item_description = item_description.unwrap_or_default();
        let recipe_cost_per_unit = recipe_cost_value
            .map(|v| numeric_value(&v))
            .unwrap_or(0.0);

        let recipe_cost_date = recipe_date_value.as_ref().and_then(coerce_date);
        let recipe_cost_timestamp =
            recipe_cost_date.map(|date| cx.gateway().beginning_of_day_local(date));

        let (item_name, category_name) = match (item_name, category_name) {
            (Some(name), Some(category)) => (name, category),
            _ => return Ok(()),
        };

        let accounting_category = cx.gateway().accounting_category_by_name(&category_name)?;
        let item_unit = match &item_unit_name {
            Some(name) => cx.gateway().unit_by_name(name)?,
            None => None,
        };

        // 物品按 (name, tenant) 幂等插入
        match cx.gateway().inventory_item_by_name(&item_name)? {
            Some(_) => {
                cx.count_skipped()?;
            }
            None => {
                let item = cx.gateway().create_inventory_item(&NewInventoryItem {
                    tenant_id: cx.gateway().tenant().id.clone(),
                    name: item_name.clone(),
                    description: item_description,
                    tenant_item_identifier,
                    kind: ItemKind::Housemade,
                    accounting_category_id: accounting_category.as_ref().map(|c| c.id),
                    item_unit_id: item_unit.as_ref().map(|u| u.id),
                    taxable: false,
                    ordering: false,
                    inventory: false,
                    starting_average_cost: None,
                    recipe_cost_per_unit: Some(recipe_cost_per_unit),
                    recipe_cost_timestamp,
                })?;
                tracing::info!(item_id = item.id, actor_id = %cx.actor_id(), "Inventory item created");
                cx.count_added()?;
            }
        }

        Ok(())
    }
}
