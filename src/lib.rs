// ==========================================
// 餐厅库存批量导入系统 - 核心库
// ==========================================
// 依据: Import_Engine_Design_v0.4.md - 总体架构
// 技术栈: Rust + SQLite
// 系统定位: 两阶段（校验/装载）电子表格批量导入引擎
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 类型转换层 - 单元格值到领域类型
pub mod coerce;

// 行数据源层 - CSV/Excel 统一访问
pub mod source;

// 引擎层 - 校验/装载流水线
pub mod engine;

// 数据库基础设施（连接初始化/PRAGMA 统一/schema 引导）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ContentType, ImportOperation, ItemKind, JobStatus};

// 领域实体
pub use domain::{
    AccountingCategory, ImportJob, ImportRowError, InventoryItem, MeasureUnit,
    NewImportRowError, NewInventoryItem, NewVendorInventoryItem, Tenant, Vendor,
    VendorInventoryItem,
};

// 行数据源
pub use source::{build_row_source, CellValue, CsvRowSource, ExcelRowSource, RowSource};

// 引擎
pub use engine::{
    handler_for, BulkLoadPipeline, ExecutionContext, ImportError, ImportHandler,
    ImportOutcome, ImportRequest, LoadContext, LoadDataStep, RowChecker, TenantGateway,
    VerifyDataStep,
};

// 仓储
pub use repository::{
    ImportJobRepository, ImportJobRepositoryImpl, RepositoryError, RepositoryResult,
    TenantRepository, TenantRepositoryImpl,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "餐厅库存批量导入系统";
