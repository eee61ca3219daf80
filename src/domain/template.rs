// ==========================================
// 配方导入系统 - 导入模板领域模型
// ==========================================
// 用途: 描述导入文件的列顺序（位置 → 语义字段）
// 所有者: 模板仓储（导入流程只读）
// ==========================================

use serde::{Deserialize, Serialize};

/// 标准配方模板 ID
pub const STANDARD_TEMPLATE_ID: &str = "standard_recipe";

// ==========================================
// 标准字段键
// ==========================================
pub mod field_keys {
    // ===== 配方级字段（同一配方的每一行重复）=====
    pub const RECIPE_CODE: &str = "recipe_code";
    pub const RECIPE_NAME: &str = "recipe_name";
    pub const CATEGORY: &str = "category";
    pub const SUB_CATEGORY: &str = "sub_category";
    pub const CUSTOMER: &str = "customer";
    pub const BATCH_NO: &str = "batch_no";
    pub const VERSION: &str = "version";
    pub const DESIGNER: &str = "designer";
    pub const REVIEWER: &str = "reviewer";
    pub const STATUS: &str = "status";
    pub const PRIORITY: &str = "priority";
    pub const TAGS: &str = "tags";

    // ===== 物料级字段（每行一个物料）=====
    pub const MATERIAL_CODE: &str = "material_code";
    pub const MATERIAL_NAME: &str = "material_name";
    pub const MATERIAL_WEIGHT: &str = "material_weight";
    pub const MATERIAL_UNIT: &str = "material_unit";
    pub const MATERIAL_SEQUENCE: &str = "material_sequence";
    pub const NOTES: &str = "notes";

    /// 分组构建所必需的字段
    pub const REQUIRED: [&str; 3] = [RECIPE_NAME, MATERIAL_NAME, MATERIAL_WEIGHT];
}

// ==========================================
// TemplateField - 模板字段
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateField {
    pub key: String,     // 语义字段键
    pub label: String,   // 表头显示名
    pub order: i32,      // 列顺序
    pub required: bool,  // 是否必填（仅用于模板展示）
    pub example: String, // 示例值
}

impl TemplateField {
    pub fn new(key: &str, label: &str, order: i32, required: bool, example: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            order,
            required,
            example: example.to_string(),
        }
    }
}

// ==========================================
// TemplateDefinition - 模板定义
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<TemplateField>,
}

impl TemplateDefinition {
    /// 按 order 排序后的字段（order 相同时保持定义顺序）
    pub fn sorted_fields(&self) -> Vec<&TemplateField> {
        let mut fields: Vec<&TemplateField> = self.fields.iter().collect();
        fields.sort_by_key(|f| f.order);
        fields
    }

    /// 按列顺序排列的字段键
    pub fn ordered_keys(&self) -> Vec<String> {
        self.sorted_fields()
            .into_iter()
            .map(|f| f.key.clone())
            .collect()
    }

    /// 模板缺失的必需字段键
    pub fn missing_required_keys(&self) -> Vec<&'static str> {
        field_keys::REQUIRED
            .iter()
            .copied()
            .filter(|key| !self.fields.iter().any(|f| f.key == *key))
            .collect()
    }

    /// 标准配方模板
    pub fn standard() -> Self {
        use field_keys::*;

        let fields = vec![
            TemplateField::new(RECIPE_CODE, "配方编码", 1, false, "R001"),
            TemplateField::new(RECIPE_NAME, "配方名称", 2, true, "经典红烧汁"),
            TemplateField::new(CATEGORY, "分类", 3, false, "酱料"),
            TemplateField::new(SUB_CATEGORY, "子分类", 4, false, "中式"),
            TemplateField::new(CUSTOMER, "客户", 5, false, "总部厨房"),
            TemplateField::new(BATCH_NO, "批次号", 6, false, "B2024001"),
            TemplateField::new(VERSION, "版本", 7, false, "1.0"),
            TemplateField::new(DESIGNER, "设计师", 8, false, "张三"),
            TemplateField::new(REVIEWER, "审核人", 9, false, "李四"),
            TemplateField::new(STATUS, "状态", 10, false, "ACTIVE"),
            TemplateField::new(PRIORITY, "优先级", 11, false, "NORMAL"),
            TemplateField::new(TAGS, "标签", 12, false, "热销;秋季"),
            TemplateField::new(MATERIAL_CODE, "物料编码", 13, false, "M001"),
            TemplateField::new(MATERIAL_NAME, "物料名称", 14, true, "生抽"),
            TemplateField::new(MATERIAL_WEIGHT, "重量", 15, true, "120.5"),
            TemplateField::new(MATERIAL_UNIT, "单位", 16, false, "g"),
            TemplateField::new(MATERIAL_SEQUENCE, "投料顺序", 17, false, "1"),
            TemplateField::new(NOTES, "备注", 18, false, "先下锅"),
        ];

        Self {
            id: STANDARD_TEMPLATE_ID.to_string(),
            name: "标准配方导入模板".to_string(),
            description: Some("纵向展开：每行一个物料，配方级字段在每行重复".to_string()),
            fields,
        }
    }
}
