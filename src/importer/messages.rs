// ==========================================
// 配方导入系统 - 导入消息
// ==========================================
// 所有返回给调用方的错误文本都从这里取，按显式 locale 翻译
// ==========================================

use crate::i18n::{t, t_with_args};
use std::fmt::Display;

pub fn empty_content(locale: &str) -> String {
    t(locale, "import.empty_content")
}

pub fn no_data_rows(locale: &str) -> String {
    t(locale, "import.no_data_rows")
}

pub fn missing_worksheet(locale: &str, part: &str) -> String {
    t_with_args(locale, "import.missing_worksheet", &[("part", part)])
}

pub fn invalid_archive(locale: &str, reason: &str) -> String {
    t_with_args(locale, "import.invalid_archive", &[("reason", reason)])
}

pub fn template_not_found(locale: &str, template_id: &str) -> String {
    t_with_args(locale, "import.template_not_found", &[("id", template_id)])
}

pub fn template_field_missing(locale: &str, keys: &str) -> String {
    t_with_args(locale, "import.template_field_missing", &[("keys", keys)])
}

pub fn unsupported_format(locale: &str, ext: &str) -> String {
    t_with_args(locale, "import.unsupported_format", &[("ext", ext)])
}

pub fn file_read_failed(locale: &str, reason: &str) -> String {
    t_with_args(locale, "import.file_read_failed", &[("reason", reason)])
}

pub fn repository_failed(locale: &str, reason: &str) -> String {
    t_with_args(locale, "import.repository_failed", &[("reason", reason)])
}

// ===== 行级 / 组级 =====

pub fn row_missing_key(locale: &str, row: impl Display) -> String {
    t_with_args(locale, "import.row_missing_key", &[("row", &row.to_string())])
}

pub fn row_missing_name(locale: &str, row: impl Display) -> String {
    t_with_args(locale, "import.row_missing_name", &[("row", &row.to_string())])
}

pub fn row_invalid_material(locale: &str, row: impl Display) -> String {
    t_with_args(locale, "import.row_invalid_material", &[("row", &row.to_string())])
}

pub fn recipe_no_materials(locale: &str, name: &str) -> String {
    t_with_args(locale, "import.recipe_no_materials", &[("name", name)])
}

// ===== 落库 =====

pub fn duplicate_code(locale: &str, code: &str) -> String {
    t_with_args(locale, "import.duplicate_code", &[("code", code)])
}

pub fn entry_failed(locale: &str, index: impl Display, message: &str) -> String {
    t_with_args(
        locale,
        "import.entry_failed",
        &[("index", &index.to_string()), ("message", message)],
    )
}
