// ==========================================
// 配方导入系统 - 日志初始化
// ==========================================
// 输出: 一律写 stderr，stdout 只留给导入汇总 JSON
// 格式: RECIPE_IMPORT_LOG_FORMAT=json 时输出结构化 JSON，默认人类可读文本
// 级别: RUST_LOG（默认 info）
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志格式环境变量
pub const LOG_FORMAT_ENV: &str = "RECIPE_IMPORT_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// 解析环境变量取值；未设置或无法识别时使用文本格式
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }
}

/// 初始化命令行日志
///
/// # 示例
/// ```no_run
/// // RUST_LOG=recipe_import=debug RECIPE_IMPORT_LOG_FORMAT=json recipe-import recipes.csv
/// recipe_import::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    match LogFormat::from_env() {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// 测试用日志，可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
