// ==========================================
// 餐厅库存批量导入系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 行错误(ImportRowError)不是本枚举的一部分。行错误
//       是面向用户的数据问题,累积落库而非抛出;本枚举只表达
//       调用错误与运行中断
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 调用错误（任何任务状态变更之前返回）=====
    #[error("导入参数缺失: {field}")]
    MissingParameter { field: &'static str },

    #[error("不支持的内容类型: {0}（仅识别 text/csv 与 xlsx 的 MIME 标记）")]
    UnsupportedContentType(String),

    #[error("导入任务不存在: {0}")]
    JobNotFound(String),

    #[error("租户不存在: {0}")]
    TenantNotFound(String),

    // ===== 运行中断（任务停留在当时的部分状态,不回滚）=====
    #[error("文件解析失败: {0}")]
    SourceParseError(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
