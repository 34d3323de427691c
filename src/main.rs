// ==========================================
// 餐厅库存批量导入系统 - 命令行入口
// ==========================================
// 用途: 在本地 SQLite 库上执行一次完整导入运行
//       （请求层的轻量替身,便于联调与验收）
//
// 用法:
//   inventory-bulk-load <db_path> <operation> <file_path> \
//       [--tenant <id>] [--actor <id>] [--dry-run]
//
//   operation: purchase-items | housemade-items | beginning-costs
//   文件内容类型按扩展名推断: .csv → text/csv, .xlsx → Excel MIME
// ==========================================

use anyhow::{anyhow, Context};
use inventory_bulk_load::db::{initialize_schema, open_sqlite_connection};
use inventory_bulk_load::{
    logging, BulkLoadPipeline, ContentType, ImportJob, ImportJobRepository,
    ImportJobRepositoryImpl, ImportOperation, ImportRequest, TenantRepositoryImpl,
};
use rusqlite::params;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let db_path = args.next().ok_or_else(usage)?;
    let operation_raw = args.next().ok_or_else(usage)?;
    let file_path = args.next().ok_or_else(usage)?;

    let mut tenant_id = "t-local".to_string();
    let mut actor_id = "cli".to_string();
    let mut dry_run = false;
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--tenant" => tenant_id = args.next().ok_or_else(usage)?,
            "--actor" => actor_id = args.next().ok_or_else(usage)?,
            "--dry-run" => dry_run = true,
            other => return Err(anyhow!("未知参数: {other}")),
        }
    }

    let operation = ImportOperation::parse(&operation_raw)
        .ok_or_else(|| anyhow!("未知操作: {operation_raw}"))?;
    let content_type = content_type_for(&file_path)?;
    let source =
        std::fs::read(&file_path).with_context(|| format!("读取文件失败: {file_path}"))?;

    // schema 引导与租户兜底(本地联调用;生产侧由请求层负责)
    let conn = open_sqlite_connection(&db_path)?;
    initialize_schema(&conn)?;
    conn.execute(
        "INSERT OR IGNORE INTO tenants (tenant_id, name, utc_offset_minutes) VALUES (?1, ?2, 0)",
        params![tenant_id, tenant_id],
    )?;
    drop(conn);

    let job_repo = Arc::new(ImportJobRepositoryImpl::new(&db_path)?);
    let tenant_repo = Arc::new(TenantRepositoryImpl::new(&db_path)?);

    // 任务由调用方预创建,这里扮演调用方
    let job = ImportJob::new(
        Uuid::new_v4().to_string(),
        tenant_id.clone(),
        actor_id.clone(),
        source.clone(),
        content_type,
        dry_run,
    );
    job_repo.insert_job(&job)?;

    let pipeline = BulkLoadPipeline::new(job_repo.clone(), tenant_repo);
    let outcome = pipeline.execute(&ImportRequest {
        job_id: job.id.clone(),
        tenant_id,
        actor_id,
        source,
        content_type: content_type.as_mime().to_string(),
        operation,
        dry_run,
    })?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    let errors = job_repo.list_row_errors(&job.id)?;
    for error in &errors {
        eprintln!(
            "row {} column {}: {}",
            error.row_index, error.column_index, error.message
        );
    }

    Ok(())
}

fn content_type_for(file_path: &str) -> anyhow::Result<ContentType> {
    let extension = Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => Ok(ContentType::Csv),
        "xlsx" => Ok(ContentType::Excel),
        other => Err(anyhow!("不支持的文件扩展名: {other}（仅支持 .csv/.xlsx）")),
    }
}

fn usage() -> anyhow::Error {
    anyhow!(
        "用法: inventory-bulk-load <db_path> <operation> <file_path> [--tenant <id>] [--actor <id>] [--dry-run]"
    )
}
