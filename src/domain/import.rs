// ==========================================
// 配方导入系统 - 导入结果领域模型
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ==========================================
// ImportSummary - 导入汇总
// ==========================================
// total = 成功构建的请求数 + 解析错误数
// failed = errors.len()（解析错误 + 落库错误）
// 结构性错误（空内容/缺工作表/缺模板）: total=0, success=0, failed=0, 仅一条说明
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl ImportSummary {
    /// 结构性错误：不做任何处理，只返回一条说明
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            total: 0,
            success: 0,
            failed: 0,
            errors: vec![message.into()],
        }
    }

    /// 第一条错误（用于审计日志的 error_detail）
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|s| s.as_str())
    }
}

// ==========================================
// FileType - 导入文件类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    Csv,
    Xlsx,
}

impl FileType {
    /// 根据文件名扩展名判断（大小写不敏感）
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Some(FileType::Csv),
            "xlsx" => Some(FileType::Xlsx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Csv => "CSV",
            FileType::Xlsx => "XLSX",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// ImportLog - 导入审计记录
// ==========================================
// 对齐: import_log 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportLog {
    pub log_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub duration_ms: u64,
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<String>,
    pub error_detail: Option<String>,
    pub imported_at: DateTime<Utc>,
}
