// ==========================================
// 餐厅库存批量导入系统 - 校验引擎
// ==========================================
// 依据: Import_Engine_Design_v0.4.md - 校验阶段
// 职责: 驱动逐行校验,累积定位到(行,列)的行错误,
//       执行跨行不变量钩子,落库数据行总数
// 红线: 校验阶段绝不改动租户数据,只写行错误与任务计数
// ==========================================

use crate::coerce::{coerce_boolean, coerce_date, is_decimal_value, is_integer_value, numeric_value};
use crate::domain::inventory::{AccountingCategory, InventoryItem, MeasureUnit, Vendor};
use crate::domain::job::NewImportRowError;
use crate::engine::context::ExecutionContext;
use crate::engine::error::ImportError;
use crate::engine::gateway::TenantGateway;
use crate::engine::handlers::ImportHandler;
use crate::repository::error::RepositoryResult;
use crate::repository::job_repo::ImportJobRepository;
use crate::source::{CellValue, RowSource};

/// 处理器未声明列名时的占位名
pub const COLUMN_NAME_UNKNOWN: &str = "(unknown)";

// ==========================================
// RowChecker - 单元格校验原语
// ==========================================
// 每个原语只针对一个单元格;失败时创建一条行错误并立即落库,
// 错误消息引用处理器声明的列名与 1 起始的列号
pub struct RowChecker<'a> {
    source: &'a dyn RowSource,
    gateway: &'a TenantGateway,
    job_repo: &'a dyn ImportJobRepository,
    job_id: String,
    column_names: Vec<&'static str>,
}

impl<'a> RowChecker<'a> {
    pub fn new(
        source: &'a dyn RowSource,
        gateway: &'a TenantGateway,
        job_repo: &'a dyn ImportJobRepository,
        job_id: String,
        column_names: Vec<&'static str>,
    ) -> Self {
        Self {
            source,
            gateway,
            job_repo,
            job_id,
            column_names,
        }
    }

    pub fn gateway(&self) -> &TenantGateway {
        self.gateway
    }

    fn column_name(&self, column_index: usize) -> &'static str {
        self.column_names
            .get(column_index)
            .copied()
            .filter(|name| !name.is_empty())
            .unwrap_or(COLUMN_NAME_UNKNOWN)
    }

    /// 创建一条行错误并落库
    pub fn create_error(
        &self,
        row_index: usize,
        column_index: usize,
        message: &str,
    ) -> RepositoryResult<()> {
        self.job_repo.insert_row_error(&NewImportRowError {
            job_id: self.job_id.clone(),
            row_index: row_index as i64,
            column_index: column_index as i64,
            message: message.to_string(),
        })
    }

    // ===== 取值原语 =====

    /// 必填单元格：缺失时报错,返回原始值（本原语不做类型校验）
    pub fn require_cell(
        &self,
        row_index: usize,
        column_index: usize,
    ) -> RepositoryResult<Option<CellValue>> {
        let value = self.source.cell(row_index, column_index);

        if value.is_none() {
            let message = format!(
                "The \"{}\" (column {}) is a required data item.",
                self.column_name(column_index),
                column_index
            );
            self.create_error(row_index, column_index, &message)?;
        }

        Ok(value)
    }

    /// 可选单元格：永不报错
    pub fn optional_cell(&self, row_index: usize, column_index: usize) -> Option<CellValue> {
        self.source.cell(row_index, column_index)
    }

    /// 必须留空：缺失与空串都算空白;其余值（含纯空格串）报错,
    /// 说明文字以括号追加在消息末尾
    pub fn require_blank(
        &self,
        row_index: usize,
        column_index: usize,
        explanation: &str,
    ) -> RepositoryResult<bool> {
        let cell_is_blank = match self.source.cell(row_index, column_index) {
            None => true,
            Some(CellValue::Text(ref s)) if s.is_empty() => true,
            Some(_) => false,
        };

        if !cell_is_blank {
            let mut message = format!(
                "The {} (column {}) must be blank.",
                self.column_name(column_index),
                column_index
            );
            if !explanation.is_empty() {
                message.push_str(&format!(" ({explanation})"));
            }
            self.create_error(row_index, column_index, &message)?;
        }

        Ok(cell_is_blank)
    }

    // ===== 基础类型限定 =====

    pub fn restrict_boolean(
        &self,
        value: &CellValue,
        row_index: usize,
        column_index: usize,
    ) -> RepositoryResult<bool> {
        let valid = coerce_boolean(value).is_some();

        if !valid {
            let message = format!(
                "The value {} for \"{}\" (column {}) must be a boolean value (true/false, yes/no).",
                value.repr(),
                self.column_name(column_index),
                column_index
            );
            self.create_error(row_index, column_index, &message)?;
        }

        Ok(valid)
    }

    pub fn restrict_date(
        &self,
        value: &CellValue,
        row_index: usize,
        column_index: usize,
    ) -> RepositoryResult<bool> {
        let valid = coerce_date(value).is_some();

        if !valid {
            let message = format!(
                "The value {} for \"{}\" (column {}) must be a date value (mm/dd/yy, mm/dd/yyyy, yyyy-mm-dd).",
                value.repr(),
                self.column_name(column_index),
                column_index
            );
            self.create_error(row_index, column_index, &message)?;
        }

        Ok(valid)
    }

    pub fn restrict_integer(
        &self,
        value: &CellValue,
        row_index: usize,
        column_index: usize,
    ) -> RepositoryResult<bool> {
        let valid = is_integer_value(value);

        if !valid {
            let message = format!(
                "The value {} for \"{}\" (column {}) must be an integer.",
                value.repr(),
                self.column_name(column_index),
                column_index
            );
            self.create_error(row_index, column_index, &message)?;
        }

        Ok(valid)
    }

    pub fn restrict_decimal(
        &self,
        value: &CellValue,
        row_index: usize,
        column_index: usize,
    ) -> RepositoryResult<bool> {
        let valid = is_decimal_value(value);

        if !valid {
            let message = format!(
                "The value {} for \"{}\" (column {}) must be a number.",
                value.repr(),
                self.column_name(column_index),
                column_index
            );
            self.create_error(row_index, column_index, &message)?;
        }

        Ok(valid)
    }

    // ===== 数值范围限定 =====

    /// 非负限定：调用方必须先通过类型限定,本原语假定值可按数字读取
    pub fn restrict_non_negative(
        &self,
        value: &CellValue,
        row_index: usize,
        column_index: usize,
    ) -> RepositoryResult<bool> {
        let non_negative = numeric_value(value) >= 0.0;

        if !non_negative {
            let message = format!(
                "The value {} for \"{}\" (column {}) cannot be negative.",
                value.repr(),
                self.column_name(column_index),
                column_index
            );
            self.create_error(row_index, column_index, &message)?;
        }

        Ok(non_negative)
    }

    // ===== 外部引用解析 =====

    pub fn require_inventory_item_by_id(
        &self,
        value: &CellValue,
        row_index: usize,
        column_index: usize,
    ) -> RepositoryResult<Option<InventoryItem>> {
        let item = match value.as_i64() {
            Some(item_id) => self.gateway.inventory_item_by_id(item_id)?,
            None => None,
        };

        if item.is_none() {
            let message = format!(
                "No inventory item with ID #{} (column {}) was found for this restaurant.",
                value.repr(),
                column_index
            );
            self.create_error(row_index, column_index, &message)?;
        }

        Ok(item)
    }

    pub fn require_vendor_by_key(
        &self,
        value: &CellValue,
        row_index: usize,
        column_index: usize,
    ) -> RepositoryResult<Option<Vendor>> {
        let vendor = self.gateway.vendor_by_key(&value.to_text())?;

        if vendor.is_none() {
            let message = format!(
                "No vendor with key {} (column {}) was found for this restaurant.",
                value.repr(),
                column_index
            );
            self.create_error(row_index, column_index, &message)?;
        }

        Ok(vendor)
    }

    pub fn require_category_by_name(
        &self,
        value: &CellValue,
        row_index: usize,
        column_index: usize,
    ) -> RepositoryResult<Option<AccountingCategory>> {
        let category = self.gateway.accounting_category_by_name(&value.to_text())?;

        if category.is_none() {
            let message = format!(
                "No accounting category with name {} (column {}) was found for this restaurant.",
                value.repr(),
                column_index
            );
            self.create_error(row_index, column_index, &message)?;
        }

        Ok(category)
    }

    pub fn require_unit_by_name(
        &self,
        value: &CellValue,
        row_index: usize,
        column_index: usize,
    ) -> RepositoryResult<Option<MeasureUnit>> {
        let unit = self.gateway.unit_by_name(&value.to_text())?;

        if unit.is_none() {
            let message = format!(
                "No unit with name {} (column {}) was found for this restaurant.",
                value.repr(),
                column_index
            );
            self.create_error(row_index, column_index, &message)?;
        }

        Ok(unit)
    }

    /// 订货单位必须在供应商允许清单内（供应商未声明清单则一律放行）
    pub fn restrict_unit_allowed_for_vendor(
        &self,
        unit: &MeasureUnit,
        vendor: &Vendor,
        row_index: usize,
        column_index: usize,
    ) -> RepositoryResult<bool> {
        let unit_allowed = match &vendor.allowed_order_unit_ids {
            None => true,
            Some(allowed) => allowed.contains(&unit.id),
        };

        if !unit_allowed {
            let message = format!(
                "Unit {:?} (column {}) is not a valid order unit for vendor ({}).",
                unit.name, column_index, vendor.name
            );
            self.create_error(row_index, column_index, &message)?;
        }

        Ok(unit_allowed)
    }
}

// ==========================================
// VerifyDataStep - 校验阶段驱动
// ==========================================
// 流程: beforeAll → 跳过首行(表头) → 逐行 verify_row →
//       afterAll(跨行不变量) → 落库数据行总数
pub struct VerifyDataStep<'a> {
    pub job_repo: &'a dyn ImportJobRepository,
}

impl<'a> VerifyDataStep<'a> {
    pub fn execute(
        &self,
        handler: &mut dyn ImportHandler,
        ctx: &mut ExecutionContext,
    ) -> Result<(), ImportError> {
        let first_row_index = ctx.source.first_row_index();
        let last_row_index = ctx.source.last_row_index();

        tracing::debug!(
            job_id = %ctx.job.id,
            first_row_index,
            last_row_index,
            "校验阶段开始"
        );

        handler.before_verify_all_rows();

        let checker = RowChecker::new(
            ctx.source.as_ref(),
            &ctx.gateway,
            self.job_repo,
            ctx.job.id.clone(),
            handler.column_names(),
        );

        let mut items_count: i64 = 0;
        let mut first_row_skipped = false;
        for row_index in first_row_index..=last_row_index {
            // 首个报告的行即表头,无条件跳过（数值本身可能不是 1）
            if !first_row_skipped {
                first_row_skipped = true;
                continue;
            }

            items_count += 1;
            handler.verify_row(row_index, &checker)?;
        }

        handler.after_verify_all_rows(&checker)?;
        drop(checker);

        ctx.job.total_row_count = items_count;
        self.job_repo.update_job(&ctx.job)?;

        tracing::debug!(job_id = %ctx.job.id, items_count, "校验阶段结束");
        Ok(())
    }
}
