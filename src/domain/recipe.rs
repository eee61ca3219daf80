// ==========================================
// 配方导入系统 - 配方领域模型
// ==========================================
// 用途: 导入中间产物（MappedRow / MaterialImport / RecipeImportRequest）
//       与落库后的配方实体（Recipe / RecipeMaterial）
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 原始行: 按列顺序的单元格文本
pub type RawRow = Vec<String>;

// ==========================================
// RowFields - 单行 字段键 → 值 映射
// ==========================================
// 模板在运行期可配置，因此保持为有序键值表而不是固定结构体
// 顺序与模板列顺序一致
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowFields(Vec<(String, String)>);

impl RowFields {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 追加（或覆盖）一个字段
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// 读取字段值；键不存在时返回空字符串
    pub fn get(&self, key: &str) -> &str {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    /// 读取去空白后的非空值
    pub fn non_blank(&self, key: &str) -> Option<&str> {
        let value = self.get(key).trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RowFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = RowFields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

// ==========================================
// MappedRow - 映射后的数据行
// ==========================================
// 生命周期: 仅在导入流程内
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedRow {
    pub row_number: usize, // 原始行号（1 起，含表头）
    pub fields: RowFields,
}

// ==========================================
// MaterialImport - 待导入物料
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialImport {
    pub name: String,
    pub code: Option<String>,
    pub weight: f64,
    pub unit: String, // 默认 "g"
    pub sequence: i32,
    pub notes: Option<String>,
}

// ==========================================
// RecipeImportRequest - 配方创建请求
// ==========================================
// 每个分组构建一次，交给配方仓储落库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeImportRequest {
    pub code: String, // 为空时由仓储自动生成
    pub name: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub customer: Option<String>,
    pub batch_no: Option<String>,
    pub version: String,
    pub description: Option<String>, // 组内各行备注合并
    pub materials: Vec<MaterialImport>,
    pub status: String,
    pub priority: String,
    pub tags: Vec<String>,
    pub creator: String,
    pub reviewer: Option<String>,
}

impl RecipeImportRequest {
    /// 物料总重量
    pub fn total_weight(&self) -> f64 {
        self.materials.iter().map(|m| m.weight).sum()
    }
}

// ==========================================
// Recipe - 配方实体
// ==========================================
// 对齐: recipe 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub recipe_id: String,
    pub code: String,
    pub name: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub customer: Option<String>,
    pub batch_no: Option<String>,
    pub version: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub tags: Vec<String>,
    pub creator: String,
    pub reviewer: Option<String>,
    pub total_weight: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// RecipeMaterial - 配方物料明细
// ==========================================
// 对齐: recipe_material 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeMaterial {
    pub recipe_id: String,
    pub sequence: i32,
    pub name: String,
    pub code: Option<String>,
    pub weight: f64,
    pub unit: String,
    pub notes: Option<String>,
}
