// ==========================================
// 餐厅库存批量导入系统 - 装载引擎
// ==========================================
// 依据: Import_Engine_Design_v0.4.md - 装载阶段
// 职责: 与校验循环同构地驱动逐行落库;每行的具体写入完全由
//       处理器定义,引擎本身不创建任何记录
// 门禁: 干跑运行或任务已有任意行错误时,整个阶段严格空转
// ==========================================

use crate::domain::job::ImportJob;
use crate::engine::context::ExecutionContext;
use crate::engine::error::ImportError;
use crate::engine::gateway::TenantGateway;
use crate::engine::handlers::ImportHandler;
use crate::repository::error::RepositoryResult;
use crate::repository::job_repo::ImportJobRepository;
use crate::source::{CellValue, RowSource};

// ==========================================
// LoadContext - 装载阶段的行级上下文
// ==========================================
// 处理器经由本结构读取单元格、访问网关并累加 added/skipped 计数;
// 计数变更即时落库（逐行推进,崩溃后计数反映已完成的部分）
pub struct LoadContext<'a> {
    source: &'a dyn RowSource,
    gateway: &'a TenantGateway,
    job_repo: &'a dyn ImportJobRepository,
    job: &'a mut ImportJob,
    actor_id: &'a str,
}

impl<'a> LoadContext<'a> {
    pub fn new(
        source: &'a dyn RowSource,
        gateway: &'a TenantGateway,
        job_repo: &'a dyn ImportJobRepository,
        job: &'a mut ImportJob,
        actor_id: &'a str,
    ) -> Self {
        Self {
            source,
            gateway,
            job_repo,
            job,
            actor_id,
        }
    }

    pub fn cell(&self, row_index: usize, column_index: usize) -> Option<CellValue> {
        self.source.cell(row_index, column_index)
    }

    pub fn gateway(&self) -> &TenantGateway {
        self.gateway
    }

    pub fn actor_id(&self) -> &str {
        self.actor_id
    }

    /// 本行产生了新记录（物品或供应商关联至少新建其一）
    pub fn count_added(&mut self) -> RepositoryResult<()> {
        self.job.added_count += 1;
        self.job_repo.update_job(self.job)
    }

    /// 本行对应的记录已存在,未做新建
    pub fn count_skipped(&mut self) -> RepositoryResult<()> {
        self.job.skipped_count += 1;
        self.job_repo.update_job(self.job)
    }
}

// ==========================================
// LoadDataStep - 装载阶段驱动
// ==========================================
pub struct LoadDataStep<'a> {
    pub job_repo: &'a dyn ImportJobRepository,
}

impl<'a> LoadDataStep<'a> {
    pub fn execute(
        &self,
        handler: &mut dyn ImportHandler,
        ctx: &mut ExecutionContext,
    ) -> Result<(), ImportError> {
        let mut skip_load = ctx.dry_run;
        if !skip_load {
            skip_load = self.job_repo.count_row_errors(&ctx.job.id)? > 0;
        }

        if skip_load {
            tracing::debug!(
                job_id = %ctx.job.id,
                dry_run = ctx.dry_run,
                "装载阶段跳过（干跑或存在行错误）"
            );
            return Ok(());
        }

        let first_row_index = ctx.source.first_row_index();
        let last_row_index = ctx.source.last_row_index();

        tracing::debug!(job_id = %ctx.job.id, "装载阶段开始");

        let mut items_count: i64 = 0;
        {
            let mut loader = LoadContext::new(
                ctx.source.as_ref(),
                &ctx.gateway,
                self.job_repo,
                &mut ctx.job,
                &ctx.actor_id,
            );

            let mut first_row_skipped = false;
            for row_index in first_row_index..=last_row_index {
                if !first_row_skipped {
                    first_row_skipped = true;
                    continue;
                }

                items_count += 1;
                handler.process_row(row_index, &mut loader)?;
            }
        }

        // 重算数据行总数,确保与校验阶段口径一致
        ctx.job.total_row_count = items_count;
        self.job_repo.update_job(&ctx.job)?;

        tracing::debug!(
            job_id = %ctx.job.id,
            items_count,
            added = ctx.job.added_count,
            skipped = ctx.job.skipped_count,
            "装载阶段结束"
        );
        Ok(())
    }
}
