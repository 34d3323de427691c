// ==========================================
// 餐厅库存批量导入系统 - 导入任务 Repository 实现
// ==========================================
// 存储: SQLite（rusqlite）
// 表: import_jobs / import_row_errors
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::job::{ImportJob, ImportRowError, NewImportRowError};
use crate::domain::types::{ContentType, JobStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::job_repo::ImportJobRepository;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ImportJobRepositoryImpl
// ==========================================
pub struct ImportJobRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ImportJobRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::LockError("连接互斥锁中毒".to_string()))
    }
}

// import_jobs 行 → ImportJob
fn row_to_job(row: &Row<'_>) -> rusqlite::Result<ImportJob> {
    let status_raw: String = row.get("status")?;
    let status = JobStatus::parse(&status_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("未知任务状态: {status_raw}").into(),
        )
    })?;

    let content_type_raw: String = row.get("content_type")?;
    let content_type = ContentType::from_mime(&content_type_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("未知内容类型: {content_type_raw}").into(),
        )
    })?;

    Ok(ImportJob {
        id: row.get("job_id")?,
        tenant_id: row.get("tenant_id")?,
        actor_id: row.get("actor_id")?,
        source_content: row.get("source_content")?,
        content_type,
        status,
        dry_run: row.get("dry_run")?,
        started_at: row.get("started_at")?,
        finished_at: row.get("finished_at")?,
        total_row_count: row.get("total_row_count")?,
        added_count: row.get("added_count")?,
        skipped_count: row.get("skipped_count")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

// import_row_errors 行 → ImportRowError
fn row_to_row_error(row: &Row<'_>) -> rusqlite::Result<ImportRowError> {
    Ok(ImportRowError {
        id: row.get("error_id")?,
        job_id: row.get("job_id")?,
        row_index: row.get("row_index")?,
        column_index: row.get("column_index")?,
        message: row.get("message")?,
        created_at: row.get("created_at")?,
    })
}

impl ImportJobRepository for ImportJobRepositoryImpl {
    fn insert_job(&self, job: &ImportJob) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO import_jobs (
                job_id, tenant_id, actor_id, source_content, content_type,
                status, dry_run, started_at, finished_at,
                total_row_count, added_count, skipped_count,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                job.id,
                job.tenant_id,
                job.actor_id,
                job.source_content,
                job.content_type.as_mime(),
                job.status.as_str(),
                job.dry_run,
                job.started_at,
                job.finished_at,
                job.total_row_count,
                job.added_count,
                job.skipped_count,
                job.created_at,
                job.updated_at,
            ],
        )?;
        Ok(())
    }

    fn find_job(&self, job_id: &str) -> RepositoryResult<Option<ImportJob>> {
        let conn = self.lock()?;
        let job = conn
            .query_row(
                "SELECT * FROM import_jobs WHERE job_id = ?1",
                params![job_id],
                row_to_job,
            )
            .optional()?;
        Ok(job)
    }

    fn update_job(&self, job: &ImportJob) -> RepositoryResult<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            r#"
            UPDATE import_jobs SET
                status = ?1,
                dry_run = ?2,
                started_at = ?3,
                finished_at = ?4,
                total_row_count = ?5,
                added_count = ?6,
                skipped_count = ?7,
                updated_at = ?8
            WHERE job_id = ?9
            "#,
            params![
                job.status.as_str(),
                job.dry_run,
                job.started_at,
                job.finished_at,
                job.total_row_count,
                job.added_count,
                job.skipped_count,
                Utc::now(),
                job.id,
            ],
        )?;

        if updated == 0 {
            return Err(RepositoryError::NotFound {
                entity: "import_job".to_string(),
                id: job.id.clone(),
            });
        }
        Ok(())
    }

    fn insert_row_error(&self, error: &NewImportRowError) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO import_row_errors (job_id, row_index, column_index, message, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                error.job_id,
                error.row_index,
                error.column_index,
                error.message,
                Utc::now(),
            ],
        )?;
        Ok(())
    }

    fn list_row_errors(&self, job_id: &str) -> RepositoryResult<Vec<ImportRowError>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM import_row_errors
            WHERE job_id = ?1
            ORDER BY row_index, column_index, error_id
            "#,
        )?;
        let errors = stmt
            .query_map(params![job_id], row_to_row_error)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(errors)
    }

    fn count_row_errors(&self, job_id: &str) -> RepositoryResult<i64> {
        let conn = self.lock()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM import_row_errors WHERE job_id = ?1",
            params![job_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
