// ==========================================
// 配方导入系统 - 字段映射器
// ==========================================
// 职责: 模板列顺序 × 原始单元格 → 行字段表
// 规则: 按位置对应，值去除首尾空白，越界位置取空串；从不失败
// ==========================================

use crate::domain::recipe::{MappedRow, RowFields};

pub struct FieldMapper {
    keys: Vec<String>,
}

impl FieldMapper {
    /// # 参数
    /// - keys: 已按 order 排序的模板字段键
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// 将一行原始单元格映射为字段表
    pub fn map(&self, cells: &[String]) -> RowFields {
        self.keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let value = cells.get(i).map(|c| c.trim()).unwrap_or("");
                (key.clone(), value.to_string())
            })
            .collect()
    }

    /// 映射并附带原始行号（1 起，含表头）
    pub fn map_row(&self, row_number: usize, cells: &[String]) -> MappedRow {
        MappedRow {
            row_number,
            fields: self.map(cells),
        }
    }
}
