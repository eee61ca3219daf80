// ==========================================
// 配方导入系统 - 分组校验与聚合
// ==========================================
// 职责: 一个行组 → 一个配方创建请求；行级/组级错误追加到共享错误列表
// 粒度: 单行物料无效只跳过该行，不放弃整组
// ==========================================

use crate::config::ImportConfig;
use crate::domain::recipe::{MappedRow, MaterialImport, RecipeImportRequest, RowFields};
use crate::domain::template::field_keys;
use crate::importer::messages;
use crate::importer::recipe_grouper::{RecipeGroup, RecipeGroupKey};
use tracing::debug;

const TAG_SEPARATORS: [char; 4] = [',', ';', '，', '；'];

pub struct GroupBuilder<'a> {
    config: &'a ImportConfig,
}

impl<'a> GroupBuilder<'a> {
    pub fn new(config: &'a ImportConfig) -> Self {
        Self { config }
    }

    /// 构建一个分组的配方请求
    ///
    /// # 返回
    /// - Some(request): 至少有一个有效物料
    /// - None: 分组被放弃（原因已写入 errors）
    pub fn build(
        &self,
        group: &RecipeGroup,
        errors: &mut Vec<String>,
    ) -> Option<RecipeImportRequest> {
        let locale = self.config.locale.as_str();

        // 步骤 1: 无编码无名称，每行一条错误
        if group.key == RecipeGroupKey::Unkeyed {
            for row in &group.rows {
                errors.push(messages::row_missing_key(locale, row.row_number));
            }
            return None;
        }

        // 步骤 2: 以首行的配方名称为准
        let first = group.rows.first()?;
        let name = match first.fields.non_blank(field_keys::RECIPE_NAME) {
            Some(name) => name.to_string(),
            None => {
                errors.push(messages::row_missing_name(locale, first.row_number));
                return None;
            }
        };

        // 步骤 3: 逐行提取物料
        let mut materials = Vec::with_capacity(group.rows.len());
        for (position, row) in group.rows.iter().enumerate() {
            match self.build_material(row, position + 1) {
                Some(material) => materials.push(material),
                None => errors.push(messages::row_invalid_material(locale, row.row_number)),
            }
        }

        // 步骤 4: 没有有效物料则放弃
        if materials.is_empty() {
            errors.push(messages::recipe_no_materials(locale, &name));
            return None;
        }

        // 步骤 5: 组装请求
        let description = self.merge_notes(&group.rows);
        let fields = &first.fields;

        debug!(
            recipe = %name,
            rows = group.rows.len(),
            materials = materials.len(),
            "分组构建完成"
        );

        Some(RecipeImportRequest {
            code: fields.get(field_keys::RECIPE_CODE).trim().to_string(),
            name,
            category: self.or_default(fields, field_keys::CATEGORY, &self.config.default_category),
            sub_category: optional(fields, field_keys::SUB_CATEGORY),
            customer: optional(fields, field_keys::CUSTOMER),
            batch_no: optional(fields, field_keys::BATCH_NO),
            version: self.or_default(fields, field_keys::VERSION, &self.config.default_version),
            description,
            materials,
            status: self.or_default(fields, field_keys::STATUS, &self.config.default_status),
            priority: self.or_default(fields, field_keys::PRIORITY, &self.config.default_priority),
            tags: split_tags(fields.get(field_keys::TAGS)),
            creator: self.or_default(fields, field_keys::DESIGNER, &self.config.default_creator),
            reviewer: optional(fields, field_keys::REVIEWER),
        })
    }

    /// 单行物料；名称为空或重量无法解析时返回 None
    fn build_material(&self, row: &MappedRow, position: usize) -> Option<MaterialImport> {
        let fields = &row.fields;
        let name = fields.non_blank(field_keys::MATERIAL_NAME)?;
        let weight = parse_weight(fields.get(field_keys::MATERIAL_WEIGHT))?;

        let sequence = fields
            .get(field_keys::MATERIAL_SEQUENCE)
            .trim()
            .parse::<i32>()
            .unwrap_or(position as i32);

        Some(MaterialImport {
            name: name.to_string(),
            code: optional(fields, field_keys::MATERIAL_CODE),
            weight,
            unit: self.or_default(fields, field_keys::MATERIAL_UNIT, &self.config.default_unit),
            sequence,
            notes: optional(fields, field_keys::NOTES),
        })
    }

    fn merge_notes(&self, rows: &[MappedRow]) -> Option<String> {
        let notes: Vec<&str> = rows
            .iter()
            .filter_map(|row| row.fields.non_blank(field_keys::NOTES))
            .collect();

        if notes.is_empty() {
            None
        } else {
            Some(notes.join(&self.config.notes_separator))
        }
    }

    fn or_default(&self, fields: &RowFields, key: &str, default: &str) -> String {
        fields.non_blank(key).unwrap_or(default).to_string()
    }
}

fn optional(fields: &RowFields, key: &str) -> Option<String> {
    fields.non_blank(key).map(str::to_string)
}

/// 解析物料重量（允许首尾空白，拒绝 NaN/无穷大）
pub fn parse_weight(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|weight| weight.is_finite())
}

/// 拆分标签（中英文逗号/分号）
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(TAG_SEPARATORS)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::recipe_grouper::RecipeGrouper;

    fn en_config() -> ImportConfig {
        ImportConfig {
            locale: "en".to_string(),
            ..ImportConfig::default()
        }
    }

    fn row(row_number: usize, pairs: &[(&str, &str)]) -> MappedRow {
        MappedRow {
            row_number,
            fields: pairs.iter().copied().collect(),
        }
    }

    fn single_group(rows: Vec<MappedRow>) -> RecipeGroup {
        let mut groups = RecipeGrouper.group(rows);
        assert_eq!(groups.len(), 1);
        groups.remove(0)
    }

    #[test]
    fn test_invalid_material_row_is_skipped_only() {
        let config = en_config();
        let group = single_group(vec![
            row(2, &[("recipe_code", "R1"), ("recipe_name", "Sauce"), ("material_name", "Sugar"), ("material_weight", "10")]),
            row(3, &[("recipe_code", "R1"), ("recipe_name", "Sauce"), ("material_name", "Salt"), ("material_weight", "")]),
        ]);
        let mut errors = Vec::new();

        let request = GroupBuilder::new(&config).build(&group, &mut errors).unwrap();

        assert_eq!(request.materials.len(), 1);
        assert_eq!(request.materials[0].name, "Sugar");
        assert_eq!(errors, vec!["row 3 invalid material name or weight"]);
    }

    #[test]
    fn test_first_row_name_wins() {
        let config = en_config();
        let group = single_group(vec![
            row(2, &[("recipe_code", "R1"), ("recipe_name", "First"), ("material_name", "A"), ("material_weight", "1")]),
            row(3, &[("recipe_code", "R1"), ("recipe_name", "Second"), ("material_name", "B"), ("material_weight", "2")]),
        ]);
        let mut errors = Vec::new();

        let request = GroupBuilder::new(&config).build(&group, &mut errors).unwrap();

        assert_eq!(request.name, "First");
        assert_eq!(request.materials.len(), 2);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_unkeyed_group_reports_each_row() {
        let config = en_config();
        let groups = RecipeGrouper.group(vec![
            row(4, &[("material_name", "A"), ("material_weight", "1")]),
        ]);
        let mut errors = Vec::new();

        assert!(GroupBuilder::new(&config).build(&groups[0], &mut errors).is_none());
        assert_eq!(errors, vec!["row 4 missing recipe code or name"]);
    }

    #[test]
    fn test_first_row_without_name_aborts_group() {
        let config = ImportConfig::default();
        let group = single_group(vec![
            row(2, &[("recipe_code", "R9"), ("material_name", "A"), ("material_weight", "1")]),
            row(3, &[("recipe_code", "R9"), ("recipe_name", "Late"), ("material_name", "B"), ("material_weight", "2")]),
        ]);
        let mut errors = Vec::new();

        assert!(GroupBuilder::new(&config).build(&group, &mut errors).is_none());
        assert_eq!(errors, vec!["第2行缺少配方名称"]);
    }

    #[test]
    fn test_group_without_valid_materials() {
        let config = en_config();
        let group = single_group(vec![
            row(2, &[("recipe_name", "Empty"), ("material_name", ""), ("material_weight", "5")]),
            row(3, &[("recipe_name", "Empty"), ("material_name", "X"), ("material_weight", "abc")]),
        ]);
        let mut errors = Vec::new();

        assert!(GroupBuilder::new(&config).build(&group, &mut errors).is_none());
        assert_eq!(
            errors,
            vec![
                "row 2 invalid material name or weight",
                "row 3 invalid material name or weight",
                "recipe 'Empty' has no valid materials",
            ]
        );
    }

    #[test]
    fn test_defaults_and_assembly() {
        let config = ImportConfig::default();
        let group = single_group(vec![
            row(2, &[
                ("recipe_name", "番茄酱"),
                ("tags", "酸甜, 热销；新品"),
                ("material_name", "番茄"),
                ("material_weight", " 120.5 "),
                ("material_sequence", "7"),
                ("notes", "先加"),
            ]),
            row(3, &[("recipe_name", "番茄酱"), ("material_name", "糖"), ("material_weight", "3"), ("material_unit", "kg")]),
            row(4, &[("recipe_name", "番茄酱"), ("material_name", "盐"), ("material_weight", "1"), ("notes", "后加")]),
        ]);
        let mut errors = Vec::new();

        let request = GroupBuilder::new(&config).build(&group, &mut errors).unwrap();

        assert_eq!(request.code, "");
        assert_eq!(request.category, "未分类");
        assert_eq!(request.creator, "IMPORT");
        assert_eq!(request.status, "ACTIVE");
        assert_eq!(request.priority, "NORMAL");
        assert_eq!(request.version, "1.0");
        assert_eq!(request.tags, vec!["酸甜", "热销", "新品"]);
        assert_eq!(request.description.as_deref(), Some("先加; 后加"));

        let sequences: Vec<i32> = request.materials.iter().map(|m| m.sequence).collect();
        assert_eq!(sequences, vec![7, 2, 3]);
        assert_eq!(request.materials[0].weight, 120.5);
        assert_eq!(request.materials[0].unit, "g");
        assert_eq!(request.materials[1].unit, "kg");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight(" 2.5 "), Some(2.5));
        assert_eq!(parse_weight("-1"), Some(-1.0));
        assert_eq!(parse_weight(""), None);
        assert_eq!(parse_weight("12g"), None);
        assert_eq!(parse_weight("NaN"), None);
        assert_eq!(parse_weight("inf"), None);
    }
}
