// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 导入消息一律按显式 locale 翻译，不依赖进程级全局 locale
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// 已加载的语言列表
pub fn available_locales() -> Vec<String> {
    rust_i18n::available_locales!()
        .into_iter()
        .map(|l| l.to_string())
        .collect()
}

/// 是否为已加载的语言
pub fn is_supported_locale(locale: &str) -> bool {
    available_locales().iter().any(|l| l == locale)
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use recipe_import::i18n::t;
/// let msg = t("en", "import.no_data_rows");
/// ```
pub fn t(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use recipe_import::i18n::t_with_args;
/// let msg = t_with_args("zh-CN", "import.row_missing_key", &[("row", "3")]);
/// ```
pub fn t_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let mut result = t(locale, key);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
