#![allow(dead_code)]

// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、租户主数据播种、
//       任务提交与流水线构建等功能
// ==========================================

use inventory_bulk_load::db::{initialize_schema, open_sqlite_connection};
use inventory_bulk_load::{
    BulkLoadPipeline, ContentType, ImportJob, ImportJobRepository, ImportJobRepositoryImpl,
    TenantRepositoryImpl,
};
use rusqlite::{params, Connection};
use std::sync::Arc;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// 默认测试租户
pub const TENANT_ID: &str = "t-001";

/// 默认测试提交人
pub const ACTOR_ID: &str = "u-100";

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> (NamedTempFile, String) {
    let temp_file = NamedTempFile::new().expect("创建临时数据库失败");
    let db_path = temp_file
        .path()
        .to_str()
        .expect("临时文件路径非法")
        .to_string();

    let conn = open_sqlite_connection(&db_path).expect("打开数据库失败");
    initialize_schema(&conn).expect("初始化 schema 失败");

    (temp_file, db_path)
}

/// 打开一条用于播种/断言的独立连接
pub fn open_conn(db_path: &str) -> Connection {
    open_sqlite_connection(db_path).expect("打开数据库失败")
}

// ==========================================
// 租户主数据播种
// ==========================================

pub fn seed_tenant(conn: &Connection, tenant_id: &str, name: &str, utc_offset_minutes: i32) {
    conn.execute(
        "INSERT INTO tenants (tenant_id, name, utc_offset_minutes) VALUES (?1, ?2, ?3)",
        params![tenant_id, name, utc_offset_minutes],
    )
    .expect("播种租户失败");
}

pub fn seed_category(conn: &Connection, tenant_id: &str, name: &str) -> i64 {
    conn.execute(
        "INSERT INTO accounting_categories (tenant_id, name) VALUES (?1, ?2)",
        params![tenant_id, name],
    )
    .expect("播种会计分类失败");
    conn.last_insert_rowid()
}

pub fn seed_unit(conn: &Connection, tenant_id: &str, name: &str) -> i64 {
    conn.execute(
        "INSERT INTO measure_units (tenant_id, name) VALUES (?1, ?2)",
        params![tenant_id, name],
    )
    .expect("播种计量单位失败");
    conn.last_insert_rowid()
}

pub fn seed_vendor(
    conn: &Connection,
    tenant_id: &str,
    key: &str,
    name: &str,
    allowed_order_unit_ids: Option<&[i64]>,
) -> i64 {
    let allowed_json = allowed_order_unit_ids
        .map(|ids| serde_json::to_string(ids).expect("序列化允许单位清单失败"));
    conn.execute(
        r#"
        INSERT INTO vendors (tenant_id, vendor_key, name, allowed_order_unit_ids)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![tenant_id, key, name, allowed_json],
    )
    .expect("播种供应商失败");
    conn.last_insert_rowid()
}

pub fn seed_purchase_item(conn: &Connection, tenant_id: &str, name: &str) -> i64 {
    conn.execute(
        r#"
        INSERT INTO inventory_items (
            tenant_id, name, description, kind, taxable, ordering, inventory,
            created_at, updated_at
        ) VALUES (?1, ?2, '', 'PURCHASE', 0, 0, 0, datetime('now'), datetime('now'))
        "#,
        params![tenant_id, name],
    )
    .expect("播种库存物品失败");
    conn.last_insert_rowid()
}

/// 播种默认测试场景: 租户 + Bakery/Produce 分类 + Each/Case/Pound 单位 +
/// ACME/BIRCH 供应商（均不限制订货单位）
pub fn seed_default_scenario(conn: &Connection) {
    seed_tenant(conn, TENANT_ID, "Main Street Diner", -300);
    seed_category(conn, TENANT_ID, "Bakery");
    seed_category(conn, TENANT_ID, "Produce");
    seed_unit(conn, TENANT_ID, "Each");
    seed_unit(conn, TENANT_ID, "Case");
    seed_unit(conn, TENANT_ID, "Pound");
    seed_vendor(conn, TENANT_ID, "ACME", "Acme Restaurant Supply", None);
    seed_vendor(conn, TENANT_ID, "BIRCH", "Birch Brothers Produce", None);
}

// ==========================================
// 任务与流水线
// ==========================================

/// 构建指向同一数据库的任务仓储、租户仓储与流水线
pub fn build_pipeline(
    db_path: &str,
) -> (
    Arc<ImportJobRepositoryImpl>,
    Arc<TenantRepositoryImpl>,
    BulkLoadPipeline,
) {
    let job_repo = Arc::new(ImportJobRepositoryImpl::new(db_path).expect("创建任务仓储失败"));
    let tenant_repo = Arc::new(TenantRepositoryImpl::new(db_path).expect("创建租户仓储失败"));
    let pipeline = BulkLoadPipeline::new(job_repo.clone(), tenant_repo.clone());
    (job_repo, tenant_repo, pipeline)
}

/// 以调用方身份预创建一个 PENDING 任务
pub fn submit_job(
    job_repo: &ImportJobRepositoryImpl,
    bytes: &[u8],
    content_type: ContentType,
    dry_run: bool,
) -> ImportJob {
    let job = ImportJob::new(
        Uuid::new_v4().to_string(),
        TENANT_ID.to_string(),
        ACTOR_ID.to_string(),
        bytes.to_vec(),
        content_type,
        dry_run,
    );
    job_repo.insert_job(&job).expect("插入任务失败");
    job
}

/// 按任务记录组装一份运行入参（字节与内容类型取任务中的副本）
pub fn request_for(
    job: &ImportJob,
    operation: inventory_bulk_load::ImportOperation,
) -> inventory_bulk_load::ImportRequest {
    inventory_bulk_load::ImportRequest {
        job_id: job.id.clone(),
        tenant_id: job.tenant_id.clone(),
        actor_id: job.actor_id.clone(),
        source: job.source_content.clone(),
        content_type: job.content_type.as_mime().to_string(),
        operation,
        dry_run: job.dry_run,
    }
}

// ==========================================
// 断言辅助
// ==========================================

pub fn count_items(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM inventory_items", [], |row| row.get(0))
        .expect("统计物品失败")
}

pub fn count_vendor_links(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM vendor_inventory_items", [], |row| {
        row.get(0)
    })
    .expect("统计供应商关联失败")
}
