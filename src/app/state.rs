// ==========================================
// 配方导入系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态（单一 SQLite 连接 + 仓储 + 导入器）
// ==========================================

use std::sync::{Arc, Mutex};

use crate::config::{ConfigManager, ImportConfig};
use crate::db::{init_schema, open_sqlite_connection};
use crate::importer::{ImportLogRecorder, RecipeImporterImpl};
use crate::repository::{
    SqliteImportLogRepository, SqliteRecipeRepository, SqliteTemplateRepository,
};

/// 基于 SQLite 仓储的导入器
pub type SqliteRecipeImporter =
    RecipeImporterImpl<Arc<SqliteRecipeRepository>, Arc<SqliteTemplateRepository>>;

/// 应用状态
///
/// 所有仓储共享同一个连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 生效的导入配置
    pub config: ImportConfig,

    /// 配方仓储
    pub recipe_repo: Arc<SqliteRecipeRepository>,

    /// 模板仓储
    pub template_repo: Arc<SqliteTemplateRepository>,

    /// 导入日志仓储
    pub import_log_repo: Arc<SqliteImportLogRepository>,

    /// 配方导入器
    pub importer: Arc<SqliteRecipeImporter>,
}

impl AppState {
    /// 初始化应用状态
    ///
    /// # 流程
    /// 1. 打开数据库并建表（幂等）
    /// 2. 从 config_kv 加载导入配置
    /// 3. 确保标准模板存在
    /// 4. 组装导入器（挂载导入日志记录器）
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config = ConfigManager::from_connection(conn.clone())
            .load_import_config()
            .map_err(|e| format!("无法加载导入配置: {}", e))?;

        let recipe_repo = Arc::new(SqliteRecipeRepository::from_connection(conn.clone()));
        let template_repo = Arc::new(SqliteTemplateRepository::from_connection(conn.clone()));
        let import_log_repo = Arc::new(SqliteImportLogRepository::from_connection(conn));

        if template_repo
            .ensure_standard_template()
            .map_err(|e| format!("无法初始化标准模板: {}", e))?
        {
            tracing::info!("已写入标准配方模板");
        }

        let importer = RecipeImporterImpl::new(
            recipe_repo.clone(),
            template_repo.clone(),
            config.clone(),
        )
        .with_log_recorder(ImportLogRecorder::new(import_log_repo.clone()));

        Ok(Self {
            db_path,
            config,
            recipe_repo,
            template_repo,
            import_log_repo,
            importer: Arc::new(importer),
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: RECIPE_IMPORT_DB_PATH 环境变量 > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("RECIPE_IMPORT_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./recipe_import.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("recipe-import");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("recipe_import.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::TemplateRepository;
    use crate::domain::STANDARD_TEMPLATE_ID;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(path.ends_with(".db"));
    }

    #[tokio::test]
    async fn test_app_state_bootstraps_database() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap().to_string();

        let state = AppState::new(db_path.clone()).unwrap();

        assert_eq!(state.config, ImportConfig::default());
        let template = state
            .template_repo
            .get_template_by_id(STANDARD_TEMPLATE_ID)
            .await
            .unwrap();
        assert!(template.is_some());

        // 再次初始化不报错
        assert!(AppState::new(db_path).is_ok());
    }
}
