// ==========================================
// 餐厅库存批量导入系统 - 导入任务领域模型
// ==========================================
// 依据: Import_Engine_Design_v0.4.md - 任务与行错误实体
// ==========================================

use crate::domain::types::{ContentType, JobStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ImportJob - 导入任务
// ==========================================
// 生命周期: 文件提交时创建为 PENDING;此后只由流水线推进
// 红线: 计数字段只增不减,状态不可回退,任务不删除
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJob {
    // ===== 主键与归属 =====
    pub id: String,        // 任务 ID（UUID，由调用方预创建）
    pub tenant_id: String, // 所属租户（餐厅）
    pub actor_id: String,  // 提交人

    // ===== 文件内容 =====
    pub source_content: Vec<u8>,   // 原始文件字节
    pub content_type: ContentType, // 决定使用 CSV 还是 Excel 适配器

    // ===== 运行状态 =====
    pub status: JobStatus, // PENDING / PROCESSING / PROCESSED
    pub dry_run: bool,     // 仅校验,不装载

    // ===== 运行时间 =====
    pub started_at: Option<DateTime<Utc>>,  // 进入 PROCESSING 的时间
    pub finished_at: Option<DateTime<Utc>>, // 进入 PROCESSED 的时间

    // ===== 计数 =====
    pub total_row_count: i64, // 数据行总数（不含表头行）
    pub added_count: i64,     // 装载阶段新建记录的行数
    pub skipped_count: i64,   // 装载阶段跳过的行数

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ImportJob {
    /// 创建一个 PENDING 状态的新任务（计数归零、时间戳取当前时刻）
    pub fn new(
        id: String,
        tenant_id: String,
        actor_id: String,
        source_content: Vec<u8>,
        content_type: ContentType,
        dry_run: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            tenant_id,
            actor_id,
            source_content,
            content_type,
            status: JobStatus::Pending,
            dry_run,
            started_at: None,
            finished_at: None,
            total_row_count: 0,
            added_count: 0,
            skipped_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

// ==========================================
// ImportRowError - 行错误
// ==========================================
// 只在校验阶段创建;创建后不可变
// 任务存在任意行错误时,装载阶段整体跳过
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRowError {
    pub id: i64,
    pub job_id: String,    // 所属任务
    pub row_index: i64,    // 1 起始的行号（与数据源适配器口径一致）
    pub column_index: i64, // 1 起始的列号（各处理器自定义含义）
    pub message: String,   // 面向用户的错误描述
    pub created_at: DateTime<Utc>,
}

/// 待插入的行错误（无 ID，由数据库分配）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewImportRowError {
    pub job_id: String,
    pub row_index: i64,
    pub column_index: i64,
    pub message: String,
}
