// ==========================================
// 配方导入系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 职责: 纵向展开的配方表（CSV / XLSX）→ 配方聚合 → 逐条落库
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 解析/分组/校验/落库
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 应用层 - 状态组装
pub mod app;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ConfigManager, ImportConfig};
pub use domain::{
    FileType, ImportLog, ImportSummary, MappedRow, MaterialImport, RawRow, Recipe,
    RecipeImportRequest, RecipeMaterial, TemplateDefinition, TemplateField,
};
pub use importer::{
    ImportError, ImportLogRecorder, RecipeImporter, RecipeImporterImpl, TemplateExporter,
};
pub use repository::{
    ImportLogStore, RecipeStore, RepositoryError, SqliteImportLogRepository,
    SqliteRecipeRepository, SqliteTemplateRepository, TemplateRepository,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "配方导入系统";
