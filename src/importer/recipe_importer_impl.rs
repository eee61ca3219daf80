// ==========================================
// 配方导入系统 - 配方导入器实现
// ==========================================
// 职责: 驱动整个导入流程
// 流程: 原始字节 → 原始行 → 去表头 → 字段映射 → 分组 → 分组构建 → 逐条落库 → 汇总
// 红线: 逐条落库，不包在一个大事务里（单条失败不回滚其他条目）
// ==========================================

use crate::config::ImportConfig;
use crate::domain::import::{FileType, ImportSummary};
use crate::domain::recipe::{MappedRow, RawRow, RecipeImportRequest};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{CsvRowParser, XlsxRowParser};
use crate::importer::group_builder::GroupBuilder;
use crate::importer::import_log_recorder::ImportLogRecorder;
use crate::importer::messages;
use crate::importer::recipe_grouper::RecipeGrouper;
use crate::importer::recipe_importer_trait::{RecipeImporter, RowParser};
use crate::repository::error::RepositoryError;
use crate::repository::recipe_repo::RecipeStore;
use crate::repository::template_repo::TemplateRepository;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// RecipeImporterImpl - 配方导入器实现
// ==========================================
pub struct RecipeImporterImpl<S, T>
where
    S: RecipeStore,
    T: TemplateRepository,
{
    recipe_store: S,
    template_repo: T,
    config: ImportConfig,
    log_recorder: Option<ImportLogRecorder>,
}

impl<S, T> RecipeImporterImpl<S, T>
where
    S: RecipeStore,
    T: TemplateRepository,
{
    /// 创建新的 RecipeImporterImpl 实例
    ///
    /// # 参数
    /// - recipe_store: 配方落库协作者
    /// - template_repo: 模板仓储（提供列顺序）
    /// - config: 导入配置
    pub fn new(recipe_store: S, template_repo: T, config: ImportConfig) -> Self {
        Self {
            recipe_store,
            template_repo,
            config,
            log_recorder: None,
        }
    }

    /// 挂载导入日志记录器（import_upload / import_file 时写审计日志）
    pub fn with_log_recorder(mut self, recorder: ImportLogRecorder) -> Self {
        self.log_recorder = Some(recorder);
        self
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// 从已解压的 XLSX 部件表导入
    ///
    /// # 参数
    /// - parts: 部件路径 → XML 文本
    pub async fn import_excel_parts(&self, parts: &BTreeMap<String, String>) -> ImportSummary {
        let parser = XlsxRowParser::new(self.config.worksheet_part.clone());
        self.finish(parser.rows_from_parts(parts)).await
    }

    async fn run(&self, parser: &dyn RowParser, bytes: &[u8]) -> ImportSummary {
        debug!(file_type = %parser.file_type(), size = bytes.len(), "步骤 1: 解析原始行");
        let parsed = parser.parse_rows(bytes);
        self.finish(parsed).await
    }

    /// 结构性错误转换为零计数汇总
    async fn finish(&self, parsed: ImportResult<Vec<RawRow>>) -> ImportSummary {
        match self.process(parsed).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "导入终止");
                ImportSummary::fatal(e.localized(&self.config.locale))
            }
        }
    }

    async fn process(&self, parsed: ImportResult<Vec<RawRow>>) -> ImportResult<ImportSummary> {
        let rows = parsed?;

        // === 步骤 2: 去表头 ===
        debug!(rows = rows.len(), "步骤 2: 去表头");
        if rows.len() <= 1 {
            return Err(ImportError::NoDataRows);
        }

        // === 步骤 3: 读取模板 ===
        debug!(template_id = %self.config.template_id, "步骤 3: 读取模板");
        let keys = self.load_field_keys().await?;

        // === 步骤 4: 映射、分组与构建 ===
        let (requests, errors) = self.build_requests(keys, rows);

        // === 步骤 5: 逐条落库 ===
        debug!(requests = requests.len(), "步骤 5: 逐条落库");
        Ok(self.persist(requests, errors).await)
    }

    /// 读取模板并校验必需字段
    async fn load_field_keys(&self) -> ImportResult<Vec<String>> {
        let template_id = &self.config.template_id;
        let template = self
            .template_repo
            .get_template_by_id(template_id)
            .await?
            .ok_or_else(|| ImportError::TemplateNotFound(template_id.clone()))?;

        let missing = template.missing_required_keys();
        if !missing.is_empty() {
            return Err(ImportError::TemplateFieldMissing(missing.join(", ")));
        }

        Ok(template.ordered_keys())
    }

    /// 数据行 → 配方请求 + 解析错误
    fn build_requests(
        &self,
        keys: Vec<String>,
        rows: Vec<RawRow>,
    ) -> (Vec<RecipeImportRequest>, Vec<String>) {
        let mapper = FieldMapper::new(keys);

        // 表头是第 1 行
        let mapped: Vec<MappedRow> = rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, cells)| mapper.map_row(idx + 1, cells))
            .collect();
        debug!(rows = mapped.len(), "字段映射完成");

        let groups = RecipeGrouper.group(mapped);
        debug!(groups = groups.len(), "分组完成");

        let builder = GroupBuilder::new(&self.config);
        let mut errors = Vec::new();
        let requests: Vec<RecipeImportRequest> = groups
            .iter()
            .filter_map(|group| builder.build(group, &mut errors))
            .collect();

        info!(
            groups = groups.len(),
            requests = requests.len(),
            parse_errors = errors.len(),
            "分组构建完成"
        );

        (requests, errors)
    }

    /// 逐条落库；单条失败记为 "第k条导入失败"，继续处理后续条目
    async fn persist(
        &self,
        requests: Vec<RecipeImportRequest>,
        mut errors: Vec<String>,
    ) -> ImportSummary {
        let locale = self.config.locale.as_str();
        let total = requests.len() + errors.len();
        let mut success = 0;

        for (idx, request) in requests.iter().enumerate() {
            match self.recipe_store.add_recipe(request).await {
                Ok(recipe) => {
                    success += 1;
                    debug!(index = idx + 1, code = %recipe.code, "配方落库成功");
                }
                Err(e) => {
                    warn!(index = idx + 1, name = %request.name, error = %e, "配方落库失败");
                    let reason = match &e {
                        RepositoryError::DuplicateCode(code) => messages::duplicate_code(locale, code),
                        other => other.to_string(),
                    };
                    errors.push(messages::entry_failed(locale, idx + 1, &reason));
                }
            }
        }

        ImportSummary {
            total,
            success,
            failed: errors.len(),
            errors,
        }
    }
}

#[async_trait]
impl<S, T> RecipeImporter for RecipeImporterImpl<S, T>
where
    S: RecipeStore,
    T: TemplateRepository,
{
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn import_csv(&self, bytes: &[u8]) -> ImportSummary {
        self.run(&CsvRowParser, bytes).await
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn import_excel(&self, bytes: &[u8]) -> ImportSummary {
        let parser = XlsxRowParser::new(self.config.worksheet_part.clone());
        self.run(&parser, bytes).await
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn import_upload(&self, file_name: &str, bytes: &[u8]) -> ImportSummary {
        let start_time = Instant::now();
        info!(file_name = %file_name, "开始导入配方文件");

        let file_type = FileType::from_file_name(file_name);
        let summary = match file_type {
            Some(FileType::Csv) => self.import_csv(bytes).await,
            Some(FileType::Xlsx) => self.import_excel(bytes).await,
            None => {
                let ext = Path::new(file_name)
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default();
                warn!(file_name = %file_name, "文件格式不支持");
                ImportSummary::fatal(ImportError::UnsupportedFormat(ext).localized(&self.config.locale))
            }
        };

        let elapsed_ms = start_time.elapsed().as_millis() as u64;

        if let Some(recorder) = &self.log_recorder {
            recorder
                .record(
                    file_name,
                    bytes.len() as u64,
                    file_type.map(|t| t.as_str()).unwrap_or("UNKNOWN"),
                    elapsed_ms,
                    &summary,
                    summary.first_error(),
                )
                .await;
        }

        info!(
            file_name = %file_name,
            total = summary.total,
            success = summary.success,
            failed = summary.failed,
            elapsed_ms = elapsed_ms,
            "配方导入完成"
        );

        summary
    }

    async fn import_file<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportSummary {
        let path = file_path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match tokio::fs::read(&path).await {
            Ok(bytes) => self.import_upload(&file_name, &bytes).await,
            Err(e) => {
                error!(path = %path.display(), error = %e, "文件读取失败");
                ImportSummary::fatal(ImportError::from(e).localized(&self.config.locale))
            }
        }
    }
}
