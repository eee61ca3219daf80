// ==========================================
// 配方导入系统 - 配方导入 Trait
// ==========================================
// 职责: 定义配方导入接口（不包含实现）
// ==========================================

use crate::domain::import::{FileType, ImportSummary};
use crate::domain::recipe::RawRow;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// RecipeImporter Trait
// ==========================================
// 用途: 配方导入主接口
// 实现者: RecipeImporterImpl
//
// 所有方法都返回 ImportSummary 而不是 Result:
// 结构性错误以零计数汇总 + 一条说明的形式返回
#[async_trait]
pub trait RecipeImporter: Send + Sync {
    /// 从 CSV 字节导入
    ///
    /// # 导入流程
    /// 1. 解码 + 按记录切分 + 分词
    /// 2. 去表头，按模板字段映射
    /// 3. 按配方分组
    /// 4. 分组校验与聚合
    /// 5. 逐条落库（互不影响）
    async fn import_csv(&self, bytes: &[u8]) -> ImportSummary;

    /// 从 XLSX 字节导入（只读取配置的工作表部件）
    async fn import_excel(&self, bytes: &[u8]) -> ImportSummary;

    /// 按文件名识别格式并导入，记录导入日志
    ///
    /// # 参数
    /// - file_name: 上传文件名（用于识别 .csv/.xlsx）
    /// - bytes: 文件内容
    async fn import_upload(&self, file_name: &str, bytes: &[u8]) -> ImportSummary;

    /// 读取本地文件后走 import_upload
    async fn import_file<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportSummary;
}

// ==========================================
// RowParser Trait
// ==========================================
// 用途: 原始字节 → 原始行（阶段 0）
// 实现者: CsvRowParser, XlsxRowParser
pub trait RowParser: Send + Sync {
    /// 解析为原始行，第一行为表头，空白行已过滤
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 原始行列表
    /// - Err: 空内容、压缩包无效、缺少工作表
    fn parse_rows(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>>;

    /// 解析器对应的文件格式
    fn file_type(&self) -> FileType;
}
