// ==========================================
// 餐厅库存批量导入系统 - 导入任务 Repository Trait
// ==========================================
// 职责: 定义任务与行错误的数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::job::{ImportJob, ImportRowError, NewImportRowError};
use crate::repository::error::RepositoryResult;

// ==========================================
// ImportJobRepository Trait
// ==========================================
// 用途: 任务生命周期与行错误访问
// 实现者: ImportJobRepositoryImpl（使用 rusqlite）
pub trait ImportJobRepository: Send + Sync {
    // ===== 任务 =====

    /// 插入新任务（调用方预创建，状态 PENDING）
    fn insert_job(&self, job: &ImportJob) -> RepositoryResult<()>;

    /// 按 ID 查询任务
    ///
    /// # 返回
    /// - Ok(Some(job)): 找到任务
    /// - Ok(None): 未找到
    fn find_job(&self, job_id: &str) -> RepositoryResult<Option<ImportJob>>;

    /// 全量更新任务（状态、计数、时间戳）
    fn update_job(&self, job: &ImportJob) -> RepositoryResult<()>;

    // ===== 行错误 =====

    /// 追加一条行错误（只在校验阶段调用；错误一经写入不可变）
    fn insert_row_error(&self, error: &NewImportRowError) -> RepositoryResult<()>;

    /// 按任务列出全部行错误（按行号、列号排序）
    fn list_row_errors(&self, job_id: &str) -> RepositoryResult<Vec<ImportRowError>>;

    /// 统计任务的行错误数
    ///
    /// 装载阶段以"错误数 > 0"作为整体跳过的唯一依据
    fn count_row_errors(&self, job_id: &str) -> RepositoryResult<i64>;
}
