// ==========================================
// 配方导入系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config::ImportConfig;
use crate::db::open_sqlite_connection;
use crate::i18n::is_supported_locale;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const TEMPLATE_ID: &str = "import/template_id";
    pub const WORKSHEET_PART: &str = "import/worksheet_part";
    pub const DEFAULT_UNIT: &str = "import/default_unit";
    pub const DEFAULT_CATEGORY: &str = "import/default_category";
    pub const DEFAULT_CREATOR: &str = "import/default_creator";
    pub const DEFAULT_STATUS: &str = "import/default_status";
    pub const DEFAULT_PRIORITY: &str = "import/default_priority";
    pub const DEFAULT_VERSION: &str = "import/default_version";
    pub const NOTES_SEPARATOR: &str = "import/notes_separator";
    pub const LOCALE: &str = "import/locale";
}

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;

        Ok(())
    }

    /// 读取配置值，空白或缺失时使用默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_global_config_value(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    /// 加载导入配置（config_kv 覆写 + 默认值）
    pub fn load_import_config(&self) -> Result<ImportConfig, Box<dyn Error>> {
        let defaults = ImportConfig::default();

        // 分隔符允许包含空白，不做 trim
        let notes_separator = self
            .get_global_config_value(config_keys::NOTES_SEPARATOR)?
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| defaults.notes_separator.clone());

        let mut locale = self.get_config_or_default(config_keys::LOCALE, &defaults.locale)?;
        if !is_supported_locale(&locale) {
            warn!(locale = %locale, "不支持的语言配置，使用默认语言");
            locale = defaults.locale.clone();
        }

        Ok(ImportConfig {
            template_id: self.get_config_or_default(config_keys::TEMPLATE_ID, &defaults.template_id)?,
            worksheet_part: self
                .get_config_or_default(config_keys::WORKSHEET_PART, &defaults.worksheet_part)?,
            default_unit: self.get_config_or_default(config_keys::DEFAULT_UNIT, &defaults.default_unit)?,
            default_category: self
                .get_config_or_default(config_keys::DEFAULT_CATEGORY, &defaults.default_category)?,
            default_creator: self
                .get_config_or_default(config_keys::DEFAULT_CREATOR, &defaults.default_creator)?,
            default_status: self
                .get_config_or_default(config_keys::DEFAULT_STATUS, &defaults.default_status)?,
            default_priority: self
                .get_config_or_default(config_keys::DEFAULT_PRIORITY, &defaults.default_priority)?,
            default_version: self
                .get_config_or_default(config_keys::DEFAULT_VERSION, &defaults.default_version)?,
            notes_separator,
            locale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_defaults_without_overrides() {
        let manager = setup();
        let config = manager.load_import_config().unwrap();
        assert_eq!(config, ImportConfig::default());
    }

    #[test]
    fn test_overrides_from_config_kv() {
        let manager = setup();
        manager
            .set_global_config_value(config_keys::DEFAULT_UNIT, "kg")
            .unwrap();
        manager
            .set_global_config_value(config_keys::LOCALE, "en")
            .unwrap();
        manager
            .set_global_config_value(config_keys::NOTES_SEPARATOR, " | ")
            .unwrap();

        let config = manager.load_import_config().unwrap();

        assert_eq!(config.default_unit, "kg");
        assert_eq!(config.locale, "en");
        assert_eq!(config.notes_separator, " | ");
        assert_eq!(config.default_category, "未分类");
    }

    #[test]
    fn test_blank_and_unknown_values_fall_back() {
        let manager = setup();
        manager
            .set_global_config_value(config_keys::DEFAULT_CREATOR, "   ")
            .unwrap();
        manager
            .set_global_config_value(config_keys::LOCALE, "fr")
            .unwrap();

        let config = manager.load_import_config().unwrap();

        assert_eq!(config.default_creator, "IMPORT");
        assert_eq!(config.locale, "zh-CN");
    }
}
