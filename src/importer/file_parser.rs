// ==========================================
// 配方导入系统 - 文件解析器实现
// ==========================================
// 支持: CSV 文本 / XLSX 工作表部件
// ==========================================

use crate::domain::import::FileType;
use crate::domain::recipe::RawRow;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::recipe_importer_trait::RowParser;
use crate::importer::sheet_extractor::{unzip_parts, SheetExtractor};
use crate::importer::tokenizer::{decode_text, tokenize_text};
use std::collections::BTreeMap;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvRowParser;

impl RowParser for CsvRowParser {
    fn parse_rows(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let rows = tokenize_text(&decode_text(bytes));

        // 只有表头（或什么都没有）
        if rows.len() <= 1 {
            return Err(ImportError::EmptyContent);
        }

        Ok(rows)
    }

    fn file_type(&self) -> FileType {
        FileType::Csv
    }
}

// ==========================================
// XLSX Parser 实现
// ==========================================
pub struct XlsxRowParser {
    worksheet_part: String,
}

impl XlsxRowParser {
    /// # 参数
    /// - worksheet_part: 压缩包内工作表部件路径（如 xl/worksheets/sheet1.xml）
    pub fn new(worksheet_part: impl Into<String>) -> Self {
        Self {
            worksheet_part: worksheet_part.into(),
        }
    }

    /// 从已解压的部件表中读取工作表行
    ///
    /// 没有任何文本单元格的行被跳过
    pub fn rows_from_parts(&self, parts: &BTreeMap<String, String>) -> ImportResult<Vec<RawRow>> {
        let sheet_xml = parts
            .get(&self.worksheet_part)
            .ok_or_else(|| ImportError::MissingWorksheet(self.worksheet_part.clone()))?;

        let rows = SheetExtractor::new()?
            .extract_rows(sheet_xml)
            .into_iter()
            .filter(|cells| !cells.is_empty())
            .collect();

        Ok(rows)
    }
}

impl RowParser for XlsxRowParser {
    fn parse_rows(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let parts = unzip_parts(bytes)?;
        self.rows_from_parts(&parts)
    }

    fn file_type(&self) -> FileType {
        FileType::Xlsx
    }
}
