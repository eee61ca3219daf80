// ==========================================
// 配方导入系统 - 导入层
// ==========================================
// 职责: 外部表格数据 → 配方创建请求 → 逐条落库 → 导入汇总
// 支持: CSV, XLSX（内联字符串工作表）
// ==========================================

// 模块声明
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod group_builder;
pub mod import_log_recorder;
pub mod messages;
pub mod recipe_grouper;
pub mod recipe_importer_impl;
pub mod recipe_importer_trait;
pub mod sheet_extractor;
pub mod template_exporter;
pub mod tokenizer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvRowParser, XlsxRowParser};
pub use group_builder::GroupBuilder;
pub use import_log_recorder::ImportLogRecorder;
pub use recipe_grouper::{RecipeGroup, RecipeGroupKey, RecipeGrouper};
pub use recipe_importer_impl::RecipeImporterImpl;
pub use sheet_extractor::{unzip_parts, SheetExtractor};
pub use template_exporter::TemplateExporter;

// 重导出 Trait 接口
pub use recipe_importer_trait::{RecipeImporter, RowParser};
