// ==========================================
// 餐厅库存批量导入系统 - 列处理器
// ==========================================
// 依据: Import_Engine_Design_v0.4.md - 列处理器能力契约
// 三个处理器共用同一套校验/装载引擎与行数据源,
// 仅列语义与落库目标不同,这是系统唯一的扩展轴
// ==========================================

pub mod beginning_costs;
pub mod housemade_items;
pub mod purchase_items;

pub use beginning_costs::BeginningCostsHandler;
pub use housemade_items::HousemadeItemsHandler;
pub use purchase_items::PurchaseItemsHandler;

use crate::domain::types::ImportOperation;
use crate::engine::error::ImportError;
use crate::engine::load::LoadContext;
use crate::engine::verify::RowChecker;

// ==========================================
// ImportHandler Trait - 处理器能力契约
// ==========================================
// 实现者声明固定的 1 起始列布局与列名（用于错误消息）,
// 并提供逐行校验与逐行装载逻辑
//
// 红线: 处理器实例按次构造,跨行状态（如主供应商追踪）只活在
//       一次运行内,并发运行之间绝不共享
pub trait ImportHandler {
    /// 列名表;下标即列号（下标 0 置空串占位）
    fn column_names(&self) -> Vec<&'static str>;

    /// 校验阶段前置钩子（初始化跨行不变量状态）
    fn before_verify_all_rows(&mut self) {}

    /// 校验一个数据行
    fn verify_row(&mut self, row_index: usize, cx: &RowChecker<'_>) -> Result<(), ImportError>;

    /// 校验阶段后置钩子（执行跨行不变量,可对已处理过的行补报错误）
    fn after_verify_all_rows(&mut self, _cx: &RowChecker<'_>) -> Result<(), ImportError> {
        Ok(())
    }

    /// 装载一个数据行
    fn process_row(
        &mut self,
        row_index: usize,
        cx: &mut LoadContext<'_>,
    ) -> Result<(), ImportError>;
}

/// 按声明的操作选定处理器（每次运行返回全新实例）
pub fn handler_for(operation: ImportOperation) -> Box<dyn ImportHandler> {
    match operation {
        ImportOperation::PurchaseItems => Box::new(PurchaseItemsHandler::new()),
        ImportOperation::HousemadeItems => Box::new(HousemadeItemsHandler::new()),
        ImportOperation::BeginningCosts => Box::new(BeginningCostsHandler::new()),
    }
}
