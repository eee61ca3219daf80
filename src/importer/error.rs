// ==========================================
// 配方导入系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 范围: 结构性（致命）错误；行级错误只以消息形式进入汇总
// ==========================================

use crate::importer::messages;
use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 内容结构错误 =====
    #[error("导入内容为空")]
    EmptyContent,

    #[error("未找到数据行")]
    NoDataRows,

    #[error("缺少工作表: {0}")]
    MissingWorksheet(String),

    #[error("Excel 文件解析失败: {0}")]
    InvalidArchive(String),

    // ===== 模板错误 =====
    #[error("模板不存在: {0}")]
    TemplateNotFound(String),

    #[error("模板缺少必需字段: {0}")]
    TemplateFieldMissing(String),

    // ===== 文件错误 =====
    #[error("文件格式不支持: {0}（仅支持 .csv/.xlsx）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("模板导出失败: {0}")]
    TemplateExportError(String),

    // ===== 依赖错误 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ImportError {
    /// 面向调用方的本地化说明（写入 ImportSummary.errors）
    pub fn localized(&self, locale: &str) -> String {
        match self {
            ImportError::EmptyContent => messages::empty_content(locale),
            ImportError::NoDataRows => messages::no_data_rows(locale),
            ImportError::MissingWorksheet(part) => messages::missing_worksheet(locale, part),
            ImportError::InvalidArchive(reason) => messages::invalid_archive(locale, reason),
            ImportError::TemplateNotFound(id) => messages::template_not_found(locale, id),
            ImportError::TemplateFieldMissing(keys) => {
                messages::template_field_missing(locale, keys)
            }
            ImportError::UnsupportedFormat(ext) => messages::unsupported_format(locale, ext),
            ImportError::FileReadError(reason) => messages::file_read_failed(locale, reason),
            ImportError::Repository(err) => messages::repository_failed(locale, &err.to_string()),
            ImportError::TemplateExportError(_) | ImportError::InternalError(_) => self.to_string(),
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<zip::result::ZipError>
impl From<zip::result::ZipError> for ImportError {
    fn from(err: zip::result::ZipError) -> Self {
        ImportError::InvalidArchive(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::TemplateExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_fatal_messages() {
        assert_eq!(
            ImportError::EmptyContent.localized("zh-CN"),
            "CSV内容为空，请使用模板填写数据"
        );
        assert_eq!(
            ImportError::MissingWorksheet("xl/worksheets/sheet1.xml".to_string()).localized("en"),
            "template missing required worksheet: xl/worksheets/sheet1.xml"
        );
    }

    #[test]
    fn test_repository_error_is_wrapped() {
        let err: ImportError = RepositoryError::LockError("poisoned".to_string()).into();
        assert!(err.localized("en").starts_with("repository access failed"));
    }
}
