// ==========================================
// 配方导入系统 - 导入日志仓储
// ==========================================
// 职责: 导入审计记录的写入与查询
// 红线: Repository 不做业务逻辑,只做数据映射
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::import::ImportLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// ImportLogStore Trait
// ==========================================
#[async_trait]
pub trait ImportLogStore: Send + Sync {
    /// 写入一条导入日志
    async fn insert_log(&self, log: &ImportLog) -> RepositoryResult<()>;

    /// 最近的导入日志（按导入时间倒序）
    async fn recent_logs(&self, limit: usize) -> RepositoryResult<Vec<ImportLog>>;
}

#[async_trait]
impl<T: ImportLogStore + ?Sized> ImportLogStore for Arc<T> {
    async fn insert_log(&self, log: &ImportLog) -> RepositoryResult<()> {
        (**self).insert_log(log).await
    }

    async fn recent_logs(&self, limit: usize) -> RepositoryResult<Vec<ImportLog>> {
        (**self).recent_logs(limit).await
    }
}

// ==========================================
// SqliteImportLogRepository
// ==========================================
pub struct SqliteImportLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteImportLogRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl ImportLogStore for SqliteImportLogRepository {
    async fn insert_log(&self, log: &ImportLog) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO import_log (
                log_id, file_name, file_size, file_type, duration_ms,
                total, success, failed, errors_json, error_detail, imported_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                log.log_id,
                log.file_name,
                log.file_size as i64,
                log.file_type,
                log.duration_ms as i64,
                log.total as i64,
                log.success as i64,
                log.failed as i64,
                serde_json::to_string(&log.errors)?,
                log.error_detail,
                log.imported_at,
            ],
        )?;

        Ok(())
    }

    async fn recent_logs(&self, limit: usize) -> RepositoryResult<Vec<ImportLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT log_id, file_name, file_size, file_type, duration_ms,
                   total, success, failed, errors_json, error_detail, imported_at
            FROM import_log
            ORDER BY imported_at DESC
            LIMIT ?1
            "#,
        )?;

        let logs = stmt
            .query_map(params![limit as i64], |row| {
                let errors_json: String = row.get(8)?;
                let errors: Vec<String> = serde_json::from_str(&errors_json).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e))
                })?;

                Ok(ImportLog {
                    log_id: row.get(0)?,
                    file_name: row.get(1)?,
                    file_size: row.get::<_, i64>(2)? as u64,
                    file_type: row.get(3)?,
                    duration_ms: row.get::<_, i64>(4)? as u64,
                    total: row.get::<_, i64>(5)? as usize,
                    success: row.get::<_, i64>(6)? as usize,
                    failed: row.get::<_, i64>(7)? as usize,
                    errors,
                    error_detail: row.get(9)?,
                    imported_at: row.get(10)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }
}
