// ==========================================
// 配方导入系统 - 工作表文本提取
// ==========================================
// 职责: 解压 XLSX 部件；从工作表 XML 中提取 <row>/<t> 文本
// 说明: 不解析共享字符串表、合并单元格与单元格引用空位，
//       单元格文本必须以内联字符串形式出现
// ==========================================

use crate::domain::recipe::RawRow;
use crate::importer::error::{ImportError, ImportResult};
use regex::Regex;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

// <row ...> 与 <t ...>，允许属性，不匹配自闭合标签
const ROW_PATTERN: &str = r"(?s)<row(?:\s[^>]*[^/])?>(.*?)</row>";
const CELL_TEXT_PATTERN: &str = r"(?s)<t(?:\s[^>]*[^/])?>(.*?)</t>";

/// 解压 XLSX，返回 部件路径 → 文本内容
///
/// # 返回
/// - Ok(map): 所有条目（非 UTF-8 内容按容错解码）
/// - Err(InvalidArchive): 不是合法 zip
pub fn unzip_parts(bytes: &[u8]) -> ImportResult<BTreeMap<String, String>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut parts = BTreeMap::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let mut content = Vec::new();
        entry
            .read_to_end(&mut content)
            .map_err(|e| ImportError::InvalidArchive(e.to_string()))?;

        parts.insert(name, String::from_utf8_lossy(&content).into_owned());
    }

    debug!(parts = parts.len(), "XLSX 解压完成");
    Ok(parts)
}

/// 反转义 5 个标准 XML 实体（&amp; 最后处理，避免 &amp;lt; 被二次反转义）
pub fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

// ==========================================
// SheetExtractor
// ==========================================
pub struct SheetExtractor {
    row_pattern: Regex,
    cell_pattern: Regex,
}

impl SheetExtractor {
    pub fn new() -> ImportResult<Self> {
        let row_pattern = Regex::new(ROW_PATTERN)
            .map_err(|e| ImportError::InternalError(format!("Regex error: {}", e)))?;
        let cell_pattern = Regex::new(CELL_TEXT_PATTERN)
            .map_err(|e| ImportError::InternalError(format!("Regex error: {}", e)))?;

        Ok(Self {
            row_pattern,
            cell_pattern,
        })
    }

    /// 按文档顺序提取所有行（含没有文本单元格的行）
    pub fn extract_rows(&self, sheet_xml: &str) -> Vec<RawRow> {
        self.row_pattern
            .captures_iter(sheet_xml)
            .filter_map(|caps| caps.get(1))
            .map(|row_body| self.extract_cells(row_body.as_str()))
            .collect()
    }

    fn extract_cells(&self, row_body: &str) -> RawRow {
        self.cell_pattern
            .captures_iter(row_body)
            .filter_map(|caps| caps.get(1))
            .map(|text| unescape_xml(text.as_str()))
            .collect()
    }
}
