// ==========================================
// 配方导入系统 - 模板导出
// ==========================================
// 职责: 生成可下载的 CSV 模板（表头 + 一行示例）
// 编码: UTF-8 带 BOM，便于表格软件直接打开
// ==========================================

use crate::domain::template::TemplateDefinition;
use crate::importer::error::{ImportError, ImportResult};

const BOM: &str = "\u{feff}";

pub struct TemplateExporter;

impl TemplateExporter {
    /// 导出模板为 CSV 文本
    ///
    /// # 返回
    /// - 第 1 行: 字段显示名（按 order）
    /// - 第 2 行: 字段示例值
    pub fn to_csv(template: &TemplateDefinition) -> ImportResult<String> {
        let fields = template.sorted_fields();

        let mut writer = csv::Writer::from_writer(BOM.as_bytes().to_vec());
        writer.write_record(fields.iter().map(|f| f.label.as_str()))?;
        writer.write_record(fields.iter().map(|f| f.example.as_str()))?;

        let bytes = writer
            .into_inner()
            .map_err(|e| ImportError::TemplateExportError(e.to_string()))?;

        String::from_utf8(bytes).map_err(|e| ImportError::TemplateExportError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::tokenizer::{decode_text, tokenize_text};

    #[test]
    fn test_standard_template_export() {
        let template = TemplateDefinition::standard();

        let csv_text = TemplateExporter::to_csv(&template).unwrap();

        assert!(csv_text.starts_with(BOM));
        let rows = tokenize_text(&decode_text(csv_text.as_bytes()));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 18);
        assert_eq!(rows[0][0], "配方编码");
        assert_eq!(rows[1][14], "120.5");
    }
}
