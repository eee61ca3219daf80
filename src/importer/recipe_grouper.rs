// ==========================================
// 配方导入系统 - 配方分组器
// ==========================================
// 职责: 把纵向展开的数据行还原为按配方聚合的行组
// 分组键: 配方编码（trim + 大写），为空时退回配方名称；两者都为空的行各自成组
// 顺序: 组按首次出现顺序，组内保持原始行顺序
// ==========================================

use crate::domain::recipe::{MappedRow, RowFields};
use crate::domain::template::field_keys;
use std::collections::HashMap;

// ==========================================
// RecipeGroupKey
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecipeGroupKey {
    Keyed(String),
    Unkeyed, // 不与任何行合并
}

impl RecipeGroupKey {
    pub fn derive(fields: &RowFields) -> Self {
        fields
            .non_blank(field_keys::RECIPE_CODE)
            .or_else(|| fields.non_blank(field_keys::RECIPE_NAME))
            .map(|key| RecipeGroupKey::Keyed(key.to_uppercase()))
            .unwrap_or(RecipeGroupKey::Unkeyed)
    }
}

#[derive(Debug, Clone)]
pub struct RecipeGroup {
    pub key: RecipeGroupKey,
    pub rows: Vec<MappedRow>,
}

// ==========================================
// RecipeGrouper
// ==========================================
pub struct RecipeGrouper;

impl RecipeGrouper {
    pub fn group(&self, rows: Vec<MappedRow>) -> Vec<RecipeGroup> {
        let mut groups: Vec<RecipeGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for row in rows {
            match RecipeGroupKey::derive(&row.fields) {
                RecipeGroupKey::Keyed(key) => match index.get(&key) {
                    Some(&pos) => groups[pos].rows.push(row),
                    None => {
                        index.insert(key.clone(), groups.len());
                        groups.push(RecipeGroup {
                            key: RecipeGroupKey::Keyed(key),
                            rows: vec![row],
                        });
                    }
                },
                RecipeGroupKey::Unkeyed => groups.push(RecipeGroup {
                    key: RecipeGroupKey::Unkeyed,
                    rows: vec![row],
                }),
            }
        }

        groups
    }
}
