// ==========================================
// 餐厅库存批量导入系统 - 期初成本处理器
// ==========================================
// 依据: Column_Layout_Spec_v0.4.md - 期初成本列布局(6 列)
// 说明: 物品名/餐厅编号/描述三列仅为人工核对保留,取值被忽略;
//       单位列需解析通过但更新本身不使用
// ==========================================

use crate::coerce::numeric_value;
use crate::engine::error::ImportError;
use crate::engine::handlers::ImportHandler;
use crate::engine::load::LoadContext;
use crate::engine::verify::RowChecker;

// ===== 列布局（1 起始）=====
pub const ITEM_ID_COLUMN: usize = 1;
pub const ITEM_NAME_COLUMN: usize = 2;
pub const ITEM_UNIT_COLUMN: usize = 3;
pub const TENANT_ITEM_ID_COLUMN: usize = 4;
pub const ITEM_DESC_COLUMN: usize = 5;
pub const BEGINNING_COST_COLUMN: usize = 6;

// ==========================================
// BeginningCostsHandler
// ==========================================
pub struct BeginningCostsHandler;

impl BeginningCostsHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BeginningCostsHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportHandler for BeginningCostsHandler {
    fn column_names(&self) -> Vec<&'static str> {
        vec![
            "",
            "Purchase item id",
            "Item name",
            "Item unit",
            "Restaurant identifier",
            "Item description",
            "Beginning cost",
        ]
    }

    fn verify_row(&mut self, row_index: usize, cx: &RowChecker<'_>) -> Result<(), ImportError> {
        let item_id_value = cx.require_cell(row_index, ITEM_ID_COLUMN)?;
        if let Some(value) = &item_id_value {
            let is_integer = cx.restrict_integer(value, row_index, ITEM_ID_COLUMN)?;
            if is_integer {
                cx.require_inventory_item_by_id(value, row_index, ITEM_ID_COLUMN)?;
            }
        }

        // Item name 列取值被忽略

        let unit_value = cx.require_cell(row_index, ITEM_UNIT_COLUMN)?;
        if let Some(value) = &unit_value {
            cx.require_unit_by_name(value, row_index, ITEM_UNIT_COLUMN)?;
        }

        // Restaurant identifier / Item description 列取值被忽略

        let cost_value = cx.require_cell(row_index, BEGINNING_COST_COLUMN)?;
        if let Some(value) = &cost_value {
            cx.restrict_decimal(value, row_index, BEGINNING_COST_COLUMN)?;
            cx.restrict_non_negative(value, row_index, BEGINNING_COST_COLUMN)?;
        }

        Ok(())
    }

    fn process_row(
        &mut self,
        row_index: usize,
        cx: &mut LoadContext<'_>,
    ) -> Result<(), ImportError> {
        let item_id_value = cx.cell(row_index, ITEM_ID_COLUMN);
        let cost_value = cx.cell(row_index, BEGINNING_COST_COLUMN);

        if let (Some(item_id_value), Some(cost_value)) = (item_id_value, cost_value) {
            let item = match item_id_value.as_i64() {
                Some(item_id) => cx.gateway().inventory_item_by_id(item_id)?,
                None => None,
            };

            match item {
                Some(item) => {
                    let beginning_cost = numeric_value(&cost_value);
                    cx.gateway()
                        .update_item_starting_cost(item.id, beginning_cost)?;
                    tracing::info!(
                        item_id = item.id,
                        actor_id = %cx.actor_id(),
                        "Inventory item beginning cost updated"
                    );
                    cx.count_added()?;
                }
                None => {
                    // 校验通过后不应出现;防御性计入跳过,不做任何写入
                    cx.count_skipped()?;
                }
            }
        }

        Ok(())
    }
}
