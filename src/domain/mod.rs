// ==========================================
// 配方导入系统 - 领域模型层
// ==========================================
// 职责: 定义模板、配方、导入结果等领域实体
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod import;
pub mod recipe;
pub mod template;

// 重导出核心类型
pub use import::{FileType, ImportLog, ImportSummary};
pub use recipe::{
    MappedRow, MaterialImport, RawRow, Recipe, RecipeImportRequest, RecipeMaterial, RowFields,
};
pub use template::{field_keys, TemplateDefinition, TemplateField, STANDARD_TEMPLATE_ID};
