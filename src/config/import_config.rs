// ==========================================
// 配方导入系统 - 导入配置
// ==========================================

use crate::domain::template::STANDARD_TEMPLATE_ID;
use crate::i18n::DEFAULT_LOCALE;
use serde::{Deserialize, Serialize};

// ==========================================
// ImportConfig - 导入流程参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    pub template_id: String,      // 驱动列映射的模板
    pub worksheet_part: String,   // XLSX 内读取的工作表部件
    pub default_unit: String,     // 物料单位缺省值
    pub default_category: String, // 配方分类缺省值
    pub default_creator: String,  // 设计师为空时的创建人
    pub default_status: String,
    pub default_priority: String,
    pub default_version: String,
    pub notes_separator: String,  // 组内备注合并分隔符
    pub locale: String,           // 错误消息语言
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            template_id: STANDARD_TEMPLATE_ID.to_string(),
            worksheet_part: "xl/worksheets/sheet1.xml".to_string(),
            default_unit: "g".to_string(),
            default_category: "未分类".to_string(),
            default_creator: "IMPORT".to_string(),
            default_status: "ACTIVE".to_string(),
            default_priority: "NORMAL".to_string(),
            default_version: "1.0".to_string(),
            notes_separator: "; ".to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}
