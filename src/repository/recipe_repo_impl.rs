// ==========================================
// 配方导入系统 - 配方仓储 SQLite 实现
// ==========================================
// 职责: 实现配方落库（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::recipe::{Recipe, RecipeImportRequest, RecipeMaterial};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::recipe_repo::RecipeStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

const RECIPE_COLUMNS: &str = "recipe_id, code, name, category, sub_category, customer, batch_no, \
     version, description, status, priority, tags_json, creator, reviewer, total_weight, \
     created_at, updated_at";

// ==========================================
// SqliteRecipeRepository
// ==========================================
pub struct SqliteRecipeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecipeRepository {
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

    /// 从已有连接创建（与其他仓储共享连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 生成配方编码: RCP-<yyyymmdd>-<8位十六进制>
    fn generate_code(now: DateTime<Utc>) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!(
            "RCP-{}-{}",
            now.format("%Y%m%d"),
            suffix[..8].to_uppercase()
        )
    }

    fn code_exists(conn: &Connection, code: &str) -> RepositoryResult<bool> {
        let found = conn
            .query_row(
                "SELECT 1 FROM recipe WHERE code = ?1 COLLATE NOCASE LIMIT 1",
                params![code],
                |_row| Ok(true),
            )
            .optional()?;
        Ok(found.unwrap_or(false))
    }

    /// 在事务中写入配方主记录与物料明细
    fn insert_recipe_tx(
        tx: &Transaction,
        recipe: &Recipe,
        request: &RecipeImportRequest,
    ) -> RepositoryResult<()> {
        tx.execute(
            &format!(
                "INSERT INTO recipe ({}) VALUES \
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
                RECIPE_COLUMNS
            ),
            params![
                recipe.recipe_id,
                recipe.code,
                recipe.name,
                recipe.category,
                recipe.sub_category,
                recipe.customer,
                recipe.batch_no,
                recipe.version,
                recipe.description,
                recipe.status,
                recipe.priority,
                serde_json::to_string(&recipe.tags)?,
                recipe.creator,
                recipe.reviewer,
                recipe.total_weight,
                recipe.created_at,
                recipe.updated_at,
            ],
        )?;

        let mut stmt = tx.prepare(
            r#"
            INSERT INTO recipe_material (
                recipe_id, sequence, name, code, weight, unit, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )?;

        for material in &request.materials {
            stmt.execute(params![
                recipe.recipe_id,
                material.sequence,
                material.name,
                material.code,
                material.weight,
                material.unit,
                material.notes,
            ])?;
        }

        Ok(())
    }

    fn map_recipe_row(row: &Row) -> rusqlite::Result<Recipe> {
        let tags_json: String = row.get(11)?;
        let tags: Vec<String> = serde_json::from_str(&tags_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(11, Type::Text, Box::new(e)))?;

        Ok(Recipe {
            recipe_id: row.get(0)?,
            code: row.get(1)?,
            name: row.get(2)?,
            category: row.get(3)?,
            sub_category: row.get(4)?,
            customer: row.get(5)?,
            batch_no: row.get(6)?,
            version: row.get(7)?,
            description: row.get(8)?,
            status: row.get(9)?,
            priority: row.get(10)?,
            tags,
            creator: row.get(12)?,
            reviewer: row.get(13)?,
            total_weight: row.get(14)?,
            created_at: row.get(15)?,
            updated_at: row.get(16)?,
        })
    }
}

#[async_trait]
impl RecipeStore for SqliteRecipeRepository {
    async fn add_recipe(&self, request: &RecipeImportRequest) -> RepositoryResult<Recipe> {
        let now = Utc::now();
        let code = match request.code.trim() {
            "" => Self::generate_code(now),
            code => code.to_string(),
        };

        let mut conn = self.get_conn()?;

        if Self::code_exists(&conn, &code)? {
            return Err(RepositoryError::DuplicateCode(code));
        }

        let recipe = Recipe {
            recipe_id: Uuid::new_v4().to_string(),
            code,
            name: request.name.clone(),
            category: request.category.clone(),
            sub_category: request.sub_category.clone(),
            customer: request.customer.clone(),
            batch_no: request.batch_no.clone(),
            version: request.version.clone(),
            description: request.description.clone(),
            status: request.status.clone(),
            priority: request.priority.clone(),
            tags: request.tags.clone(),
            creator: request.creator.clone(),
            reviewer: request.reviewer.clone(),
            total_weight: request.total_weight(),
            created_at: now,
            updated_at: now,
        };

        let tx = conn.transaction()?;
        match Self::insert_recipe_tx(&tx, &recipe, request) {
            Ok(()) => tx.commit()?,
            // 并发写入时由 UNIQUE 约束兜底
            Err(RepositoryError::UniqueConstraintViolation(_)) => {
                return Err(RepositoryError::DuplicateCode(recipe.code));
            }
            Err(e) => return Err(e),
        }

        debug!(
            recipe_id = %recipe.recipe_id,
            code = %recipe.code,
            materials = request.materials.len(),
            "配方写入完成"
        );

        Ok(recipe)
    }

    async fn get_recipe_by_code(&self, code: &str) -> RepositoryResult<Option<Recipe>> {
        let conn = self.get_conn()?;

        let recipe = conn
            .query_row(
                &format!("SELECT {} FROM recipe WHERE code = ?1", RECIPE_COLUMNS),
                params![code],
                Self::map_recipe_row,
            )
            .optional()?;

        Ok(recipe)
    }

    async fn list_materials(&self, recipe_id: &str) -> RepositoryResult<Vec<RecipeMaterial>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT recipe_id, sequence, name, code, weight, unit, notes
            FROM recipe_material
            WHERE recipe_id = ?1
            ORDER BY sequence, material_row_id
            "#,
        )?;

        let materials = stmt
            .query_map(params![recipe_id], |row| {
                Ok(RecipeMaterial {
                    recipe_id: row.get(0)?,
                    sequence: row.get(1)?,
                    name: row.get(2)?,
                    code: row.get(3)?,
                    weight: row.get(4)?,
                    unit: row.get(5)?,
                    notes: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(materials)
    }

    async fn count_recipes(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM recipe", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
