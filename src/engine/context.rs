// ==========================================
// 餐厅库存批量导入系统 - 运行入参与执行上下文
// ==========================================
// 依据: Import_Engine_Design_v0.4.md - 流水线入口契约
// ==========================================

use crate::domain::job::ImportJob;
use crate::domain::types::ImportOperation;
use crate::engine::error::ImportError;
use crate::engine::gateway::TenantGateway;
use crate::source::RowSource;

// ==========================================
// ImportRequest - 一次导入运行的入参
// ==========================================
// 任务由调用方预创建;字节与内容类型随请求传入
// （与任务记录中保存的副本一致,由请求层负责保证）
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub job_id: String,
    pub tenant_id: String,
    pub actor_id: String,
    pub source: Vec<u8>,
    pub content_type: String, // MIME 标记,仅识别两种
    pub operation: ImportOperation,
    pub dry_run: bool, // 仅校验,跳过装载阶段
}

impl ImportRequest {
    /// 调用参数校验：三个标识缺一不可
    ///
    /// 在任何任务状态变更之前执行,失败即整体失败
    pub fn validate(&self) -> Result<(), ImportError> {
        if self.job_id.trim().is_empty() {
            return Err(ImportError::MissingParameter { field: "job_id" });
        }
        if self.tenant_id.trim().is_empty() {
            return Err(ImportError::MissingParameter { field: "tenant_id" });
        }
        if self.actor_id.trim().is_empty() {
            return Err(ImportError::MissingParameter { field: "actor_id" });
        }
        Ok(())
    }
}

// ==========================================
// ExecutionContext - 单次运行的执行上下文
// ==========================================
// 红线: 一次运行独占一个上下文;并发运行之间绝不共享
//       （跨行不变量追踪器同理,见各处理器）
pub struct ExecutionContext {
    pub job: ImportJob,
    pub source: Box<dyn RowSource>,
    pub gateway: TenantGateway,
    pub actor_id: String,
    pub dry_run: bool,
}
