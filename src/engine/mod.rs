// ==========================================
// 餐厅库存批量导入系统 - 引擎层
// ==========================================
// 职责: 两阶段校验/装载流水线与列处理器
// 红线: 校验阶段不改动租户数据;装载阶段被行错误或干跑门禁
// ==========================================

pub mod context;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod load;
pub mod pipeline;
pub mod verify;

// 重导出核心类型
pub use context::{ExecutionContext, ImportRequest};
pub use error::ImportError;
pub use gateway::TenantGateway;
pub use handlers::{
    handler_for, BeginningCostsHandler, HousemadeItemsHandler, ImportHandler,
    PurchaseItemsHandler,
};
pub use load::{LoadContext, LoadDataStep};
pub use pipeline::{BulkLoadPipeline, ImportOutcome};
pub use verify::{RowChecker, VerifyDataStep, COLUMN_NAME_UNKNOWN};
