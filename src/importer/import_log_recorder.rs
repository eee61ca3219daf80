// ==========================================
// 配方导入系统 - 导入日志记录器
// ==========================================
// 职责: 把文件元信息 + 导入汇总写入审计日志
// 红线: 写日志失败只记录 warn，绝不影响返回给调用方的汇总
// ==========================================

use crate::domain::import::{ImportLog, ImportSummary};
use crate::repository::import_log_repo::ImportLogStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct ImportLogRecorder {
    store: Arc<dyn ImportLogStore>,
}

impl ImportLogRecorder {
    pub fn new(store: Arc<dyn ImportLogStore>) -> Self {
        Self { store }
    }

    /// 记录一次导入
    ///
    /// # 参数
    /// - file_name / file_size / file_type: 文件元信息
    /// - duration_ms: 导入耗时
    /// - summary: 导入汇总
    /// - error_detail: 附加错误说明（通常为第一条错误）
    pub async fn record(
        &self,
        file_name: &str,
        file_size: u64,
        file_type: &str,
        duration_ms: u64,
        summary: &ImportSummary,
        error_detail: Option<&str>,
    ) {
        let log = ImportLog {
            log_id: Uuid::new_v4().to_string(),
            file_name: file_name.to_string(),
            file_size,
            file_type: file_type.to_string(),
            duration_ms,
            total: summary.total,
            success: summary.success,
            failed: summary.failed,
            errors: summary.errors.clone(),
            error_detail: error_detail.map(str::to_string),
            imported_at: Utc::now(),
        };

        match self.store.insert_log(&log).await {
            Ok(()) => debug!(log_id = %log.log_id, file_name = %file_name, "导入日志已记录"),
            Err(e) => warn!(error = %e, file_name = %file_name, "导入日志写入失败，已忽略"),
        }
    }
}
