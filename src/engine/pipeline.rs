// ==========================================
// 餐厅库存批量导入系统 - 导入流水线编排
// ==========================================
// 依据: Import_Engine_Design_v0.4.md - 流水线步骤序列
// 流程: 入参校验 → 任务置 PROCESSING → 校验阶段 → 装载阶段 →
//       任务置 PROCESSED,逐步失败即中止
// 红线: 已提交的逐行写入不回滚;中止后任务停留在当时的部分状态,
//       由调用方结合计数与行错误人工核查
// ==========================================

use crate::domain::types::{ContentType, JobStatus};
use crate::engine::context::{ExecutionContext, ImportRequest};
use crate::engine::error::ImportError;
use crate::engine::gateway::TenantGateway;
use crate::engine::handlers::handler_for;
use crate::engine::load::LoadDataStep;
use crate::engine::verify::VerifyDataStep;
use crate::repository::job_repo::ImportJobRepository;
use crate::repository::tenant_repo::TenantRepository;
use crate::source::build_row_source;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

// ==========================================
// ImportOutcome - 一次运行的结果摘要
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub job_id: String,
    pub dry_run: bool,
    pub total_row_count: i64,
    pub added_count: i64,
    pub skipped_count: i64,
    pub error_count: i64,
    pub elapsed_ms: i64,
}

// ==========================================
// BulkLoadPipeline
// ==========================================
// 处理器与数据源适配器在运行开始时依据声明的操作与内容类型
// 一次性选定（策略对象,不走继承链）
pub struct BulkLoadPipeline {
    job_repo: Arc<dyn ImportJobRepository>,
    tenant_repo: Arc<dyn TenantRepository>,
}

impl BulkLoadPipeline {
    pub fn new(
        job_repo: Arc<dyn ImportJobRepository>,
        tenant_repo: Arc<dyn TenantRepository>,
    ) -> Self {
        Self {
            job_repo,
            tenant_repo,
        }
    }

    /// 执行一次完整的导入运行
    ///
    /// # 参数
    /// - request: 运行入参（任务/租户/提交人标识、文件字节、内容类型、
    ///   操作选择、是否干跑）
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 运行完成（行错误不构成失败,体现在计数里）
    /// - Err: 调用错误或运行中断
    pub fn execute(&self, request: &ImportRequest) -> Result<ImportOutcome, ImportError> {
        let started = Instant::now();

        // === 步骤 0: 入参校验（任何任务状态变更之前）===
        request.validate()?;

        let content_type = ContentType::from_mime(&request.content_type)
            .ok_or_else(|| ImportError::UnsupportedContentType(request.content_type.clone()))?;

        let mut job = self
            .job_repo
            .find_job(&request.job_id)?
            .ok_or_else(|| ImportError::JobNotFound(request.job_id.clone()))?;

        let tenant = self
            .tenant_repo
            .find_tenant(&request.tenant_id)?
            .ok_or_else(|| ImportError::TenantNotFound(request.tenant_id.clone()))?;

        tracing::info!(
            job_id = %job.id,
            tenant_id = %tenant.id,
            operation = %request.operation,
            content_type = %content_type,
            dry_run = request.dry_run,
            "导入运行开始"
        );

        // === 步骤 1: 任务进入处理中 ===
        job.status = JobStatus::Processing;
        job.started_at = Some(Utc::now());
        self.job_repo.update_job(&job)?;

        // === 步骤 2: 构建行数据源与执行上下文 ===
        let source = build_row_source(content_type, &request.source)?;
        let gateway = TenantGateway::new(Arc::clone(&self.tenant_repo), tenant);
        let mut ctx = ExecutionContext {
            job,
            source,
            gateway,
            actor_id: request.actor_id.clone(),
            dry_run: request.dry_run,
        };

        // === 步骤 3: 选定列处理器（每次运行独立实例）===
        let mut handler = handler_for(request.operation);

        // === 步骤 4: 校验阶段 ===
        VerifyDataStep {
            job_repo: self.job_repo.as_ref(),
        }
        .execute(handler.as_mut(), &mut ctx)?;

        // === 步骤 5: 装载阶段（干跑或有行错误时空转）===
        LoadDataStep {
            job_repo: self.job_repo.as_ref(),
        }
        .execute(handler.as_mut(), &mut ctx)?;

        // === 步骤 6: 任务完成 ===
        ctx.job.status = JobStatus::Processed;
        ctx.job.finished_at = Some(Utc::now());
        self.job_repo.update_job(&ctx.job)?;

        let error_count = self.job_repo.count_row_errors(&ctx.job.id)?;
        let outcome = ImportOutcome {
            job_id: ctx.job.id.clone(),
            dry_run: ctx.dry_run,
            total_row_count: ctx.job.total_row_count,
            added_count: ctx.job.added_count,
            skipped_count: ctx.job.skipped_count,
            error_count,
            elapsed_ms: started.elapsed().as_millis() as i64,
        };

        tracing::info!(
            job_id = %outcome.job_id,
            total = outcome.total_row_count,
            added = outcome.added_count,
            skipped = outcome.skipped_count,
            errors = outcome.error_count,
            elapsed_ms = outcome.elapsed_ms,
            "导入运行结束"
        );

        Ok(outcome)
    }
}
