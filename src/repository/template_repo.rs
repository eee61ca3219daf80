// ==========================================
// 配方导入系统 - 导入模板仓储
// ==========================================
// 职责: 读取/保存导入模板（列顺序定义）
// 存储: import_template 表（字段列表以 JSON 存储）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::template::{TemplateDefinition, TemplateField};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

// ==========================================
// TemplateRepository Trait
// ==========================================
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// 按 ID 查询模板
    ///
    /// # 返回
    /// - Ok(None): 模板不存在（对导入流程是致命错误）
    async fn get_template_by_id(&self, id: &str) -> RepositoryResult<Option<TemplateDefinition>>;

    /// 保存模板（存在则覆盖）
    async fn save_template(&self, template: &TemplateDefinition) -> RepositoryResult<()>;
}

#[async_trait]
impl<T: TemplateRepository + ?Sized> TemplateRepository for Arc<T> {
    async fn get_template_by_id(&self, id: &str) -> RepositoryResult<Option<TemplateDefinition>> {
        (**self).get_template_by_id(id).await
    }

    async fn save_template(&self, template: &TemplateDefinition) -> RepositoryResult<()> {
        (**self).save_template(template).await
    }
}

// ==========================================
// SqliteTemplateRepository
// ==========================================
pub struct SqliteTemplateRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTemplateRepository {
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

    /// 初始化标准模板（已存在则不覆盖）
    ///
    /// # 返回
    /// - Ok(true): 本次新写入
    /// - Ok(false): 已存在
    pub fn ensure_standard_template(&self) -> RepositoryResult<bool> {
        let template = TemplateDefinition::standard();
        let conn = self.get_conn()?;

        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO import_template (
                template_id, name, description, fields_json, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                template.id,
                template.name,
                template.description,
                serde_json::to_string(&template.fields)?,
                Utc::now(),
            ],
        )?;

        if inserted > 0 {
            info!(template_id = %template.id, "标准模板已初始化");
        }

        Ok(inserted > 0)
    }
}

#[async_trait]
impl TemplateRepository for SqliteTemplateRepository {
    async fn get_template_by_id(&self, id: &str) -> RepositoryResult<Option<TemplateDefinition>> {
        let conn = self.get_conn()?;

        let row = conn
            .query_row(
                "SELECT template_id, name, description, fields_json FROM import_template WHERE template_id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((id, name, description, fields_json)) => {
                let fields: Vec<TemplateField> = serde_json::from_str(&fields_json)?;
                Ok(Some(TemplateDefinition {
                    id,
                    name,
                    description,
                    fields,
                }))
            }
        }
    }

    async fn save_template(&self, template: &TemplateDefinition) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO import_template (
                template_id, name, description, fields_json, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                template.id,
                template.name,
                template.description,
                serde_json::to_string(&template.fields)?,
                Utc::now(),
            ],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use crate::domain::template::STANDARD_TEMPLATE_ID;

    fn setup() -> SqliteTemplateRepository {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        SqliteTemplateRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn test_standard_template_round_trip() {
        let repo = setup();

        assert!(repo.get_template_by_id(STANDARD_TEMPLATE_ID).await.unwrap().is_none());
        assert!(repo.ensure_standard_template().unwrap());
        assert!(!repo.ensure_standard_template().unwrap());

        let loaded = repo
            .get_template_by_id(STANDARD_TEMPLATE_ID)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, TemplateDefinition::standard());
    }

    #[tokio::test]
    async fn test_save_template_overwrites() {
        let repo = setup();
        repo.ensure_standard_template().unwrap();

        let mut template = TemplateDefinition::standard();
        template.fields.truncate(3);
        repo.save_template(&template).await.unwrap();

        let loaded = repo
            .get_template_by_id(STANDARD_TEMPLATE_ID)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.fields.len(), 3);
    }
}
