// ==========================================
// 配方导入端到端测试
// ==========================================
// 测试目标: 文件字节 → 导入器 → SQLite 仓储 → 汇总/审计日志
// ==========================================


use async_trait::async_trait;
use recipe_import::config::{config_keys, ConfigManager};
use recipe_import::domain::field_keys::*;
use recipe_import::importer::TemplateExporter;
use recipe_import::logging;
use recipe_import::repository::RepositoryResult;
use recipe_import::{
    ImportConfig, ImportLog, ImportLogRecorder, ImportLogStore, RecipeImporter,
    RecipeImporterImpl, RecipeStore, RepositoryError, SqliteImportLogRepository,
    SqliteRecipeRepository, SqliteTemplateRepository, TemplateDefinition,
};
use std::sync::Arc;
use test_helpers::{
    build_xlsx, create_test_db, open_shared_conn, standard_cells, standard_header, standard_row,
};

type TestImporter =
    RecipeImporterImpl<Arc<SqliteRecipeRepository>, Arc<SqliteTemplateRepository>>;

struct TestContext {
    _temp_file: tempfile::NamedTempFile,
    recipe_repo: Arc<SqliteRecipeRepository>,
    template_repo: Arc<SqliteTemplateRepository>,
    log_repo: Arc<SqliteImportLogRepository>,
    importer: TestImporter,
}

/// 创建基于临时 SQLite 的导入器（标准模板已写入，挂载日志记录器）
fn setup(config: ImportConfig) -> TestContext {
    logging::init_test();

    let (temp_file, db_path) = create_test_db().unwrap();
    let conn = open_shared_conn(&db_path);

    let recipe_repo = Arc::new(SqliteRecipeRepository::from_connection(conn.clone()));
    let template_repo = Arc::new(SqliteTemplateRepository::from_connection(conn.clone()));
    let log_repo = Arc::new(SqliteImportLogRepository::from_connection(conn));
    template_repo.ensure_standard_template().unwrap();

    let importer = RecipeImporterImpl::new(recipe_repo.clone(), template_repo.clone(), config)
        .with_log_recorder(ImportLogRecorder::new(log_repo.clone()));

    TestContext {
        _temp_file: temp_file,
        recipe_repo,
        template_repo,
        log_repo,
        importer,
    }
}

fn sample_csv() -> String {
    [
        standard_header(),
        standard_row(&[
            (RECIPE_CODE, "R001"),
            (RECIPE_NAME, "红烧汁"),
            (CATEGORY, "酱料"),
            (DESIGNER, "张三"),
            (TAGS, "热销;秋季"),
            (MATERIAL_NAME, "生抽"),
            (MATERIAL_WEIGHT, "120.5"),
            (MATERIAL_SEQUENCE, "2"),
            (NOTES, "先下锅"),
        ]),
        standard_row(&[
            (RECIPE_CODE, "R001"),
            (RECIPE_NAME, "红烧汁"),
            (MATERIAL_NAME, "冰糖"),
            (MATERIAL_WEIGHT, "30"),
            (MATERIAL_UNIT, "kg"),
            (MATERIAL_SEQUENCE, "1"),
            (NOTES, "小火"),
        ]),
        standard_row(&[
            (RECIPE_NAME, "凉拌汁"),
            (MATERIAL_NAME, "香醋"),
            (MATERIAL_WEIGHT, "50"),
        ]),
        standard_row(&[
            (RECIPE_NAME, "凉拌汁"),
            (MATERIAL_NAME, "蒜末"),
            (MATERIAL_WEIGHT, "适量"),
        ]),
    ]
    .join("\n")
}

// ==========================================
// 测试用例
// ==========================================

#[tokio::test]
async fn test_csv_import_persists_aggregates() {
    let ctx = setup(ImportConfig::default());

    let summary = ctx.importer.import_csv(sample_csv().as_bytes()).await;

    assert_eq!(summary.total, 3);
    assert_eq!(summary.success, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors, vec!["第5行物料名称或重量无效"]);
    assert_eq!(ctx.recipe_repo.count_recipes().await.unwrap(), 2);

    let recipe = ctx.recipe_repo.get_recipe_by_code("R001").await.unwrap().unwrap();
    assert_eq!(recipe.name, "红烧汁");
    assert_eq!(recipe.category, "酱料");
    assert_eq!(recipe.creator, "张三");
    assert_eq!(recipe.tags, vec!["热销", "秋季"]);
    assert_eq!(recipe.description.as_deref(), Some("先下锅; 小火"));
    assert!((recipe.total_weight - 150.5).abs() < 1e-9);

    // 物料按投料顺序返回
    let materials = ctx.recipe_repo.list_materials(&recipe.recipe_id).await.unwrap();
    let names: Vec<&str> = materials.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["冰糖", "生抽"]);
    assert_eq!(materials[0].unit, "kg");
    assert_eq!(materials[1].unit, "g");
}

#[tokio::test]
async fn test_xlsx_upload_records_import_log() {
    let ctx = setup(ImportConfig::default());
    let rows = vec![
        standard_cells(&[(RECIPE_CODE, "code")]),
        standard_cells(&[
            (RECIPE_CODE, "X1"),
            (RECIPE_NAME, "Salsa & <Verde>"),
            (MATERIAL_NAME, "Tomatillo"),
            (MATERIAL_WEIGHT, "200"),
        ]),
        standard_cells(&[
            (RECIPE_CODE, "X1"),
            (RECIPE_NAME, "Salsa & <Verde>"),
            (MATERIAL_NAME, "Lime"),
            (MATERIAL_WEIGHT, "15"),
        ]),
    ];
    let bytes = build_xlsx("xl/worksheets/sheet1.xml", &rows);

    let summary = ctx.importer.import_upload("配方.XLSX", &bytes).await;

    assert_eq!(summary.total, 1);
    assert_eq!(summary.success, 1);
    assert!(summary.errors.is_empty());

    let recipe = ctx.recipe_repo.get_recipe_by_code("X1").await.unwrap().unwrap();
    assert_eq!(recipe.name, "Salsa & <Verde>");

    let logs = ctx.log_repo.recent_logs(10).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].file_name, "配方.XLSX");
    assert_eq!(logs[0].file_type, "XLSX");
    assert_eq!(logs[0].file_size, bytes.len() as u64);
    assert_eq!(logs[0].success, 1);
    assert_eq!(logs[0].error_detail, None);
}

#[tokio::test]
async fn test_xlsx_without_configured_worksheet() {
    let ctx = setup(ImportConfig::default());
    let bytes = build_xlsx("xl/worksheets/sheet2.xml", &[standard_cells(&[])]);

    let summary = ctx.importer.import_excel(&bytes).await;

    assert_eq!(summary.total, 0);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        summary.errors,
        vec!["模板缺少必需的工作表: xl/worksheets/sheet1.xml"]
    );
}

#[tokio::test]
async fn test_reimport_reports_duplicate_codes() {
    let ctx = setup(ImportConfig::default());
    let csv = sample_csv();

    let first = ctx.importer.import_csv(csv.as_bytes()).await;
    let second = ctx.importer.import_csv(csv.as_bytes()).await;

    assert_eq!(first.success, 2);
    // R001 重复；凉拌汁无编码，自动生成新编码后再次写入
    assert_eq!(second.success, 1);
    assert_eq!(second.failed, 2);
    assert_eq!(
        second.errors,
        vec!["第5行物料名称或重量无效", "第1条导入失败: 配方编码已存在: R001"]
    );
    assert_eq!(ctx.recipe_repo.count_recipes().await.unwrap(), 3);
}

#[tokio::test]
async fn test_exported_template_imports_example_row() {
    let ctx = setup(ImportConfig::default());
    let template_csv = TemplateExporter::to_csv(&TemplateDefinition::standard()).unwrap();

    let summary = ctx.importer.import_csv(template_csv.as_bytes()).await;

    assert_eq!(summary.success, 1, "errors: {:?}", summary.errors);
    let recipe = ctx.recipe_repo.get_recipe_by_code("R001").await.unwrap().unwrap();
    assert_eq!(recipe.name, "经典红烧汁");
    assert_eq!(recipe.reviewer.as_deref(), Some("李四"));
    assert_eq!(recipe.tags, vec!["热销", "秋季"]);
}

#[tokio::test]
async fn test_quoted_fields_survive_import() {
    let ctx = setup(ImportConfig::default());

    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(standard_cells(&[(RECIPE_CODE, "h")])).unwrap();
    writer
        .write_record(standard_cells(&[
            (RECIPE_CODE, "Q1"),
            (RECIPE_NAME, "Sauce, \"house\" style"),
            (MATERIAL_NAME, "Oil"),
            (MATERIAL_WEIGHT, "10"),
            (NOTES, "line one\nline two"),
        ]))
        .unwrap();
    let bytes = writer.into_inner().unwrap();

    let summary = ctx.importer.import_csv(&bytes).await;

    assert_eq!(summary.success, 1, "errors: {:?}", summary.errors);
    let recipe = ctx.recipe_repo.get_recipe_by_code("Q1").await.unwrap().unwrap();
    assert_eq!(recipe.name, "Sauce, \"house\" style");
    assert_eq!(recipe.description.as_deref(), Some("line one\nline two"));
}

#[tokio::test]
async fn test_stray_quote_keeps_following_rows() {
    let ctx = setup(ImportConfig::default());

    let csv_text = [
        standard_header(),
        standard_row(&[
            (RECIPE_CODE, "P1"),
            (RECIPE_NAME, "管道清洗液"),
            (MATERIAL_NAME, "水"),
            (MATERIAL_WEIGHT, "10"),
            (NOTES, "5\" pipe"),
        ]),
        standard_row(&[
            (RECIPE_CODE, "P2"),
            (RECIPE_NAME, "英寸规格"),
            (MATERIAL_NAME, "3\" 管件"),
            (MATERIAL_WEIGHT, "2"),
        ]),
        standard_row(&[
            (RECIPE_CODE, "P3"),
            (RECIPE_NAME, "收尾配方"),
            (MATERIAL_NAME, "盐"),
            (MATERIAL_WEIGHT, "1"),
        ]),
    ]
    .join("\n");

    let summary = ctx.importer.import_csv(csv_text.as_bytes()).await;

    // 第3行引号吞掉同一行后续列，只影响本行
    assert_eq!(summary.success, 2, "errors: {:?}", summary.errors);
    assert_eq!(summary.errors[0], "第3行物料名称或重量无效");
    assert!(summary.errors.iter().all(|e| !e.contains("第4行")));

    let p1 = ctx.recipe_repo.get_recipe_by_code("P1").await.unwrap().unwrap();
    assert_eq!(p1.description.as_deref(), Some("5 pipe"));
    assert!(ctx.recipe_repo.get_recipe_by_code("P3").await.unwrap().is_some());
}

#[tokio::test]
async fn test_import_file_from_disk() {
    let ctx = setup(ImportConfig::default());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recipes.csv");
    std::fs::write(&path, sample_csv()).unwrap();

    let summary = ctx.importer.import_file(&path).await;

    assert_eq!(summary.success, 2);
    let logs = ctx.log_repo.recent_logs(1).await.unwrap();
    assert_eq!(logs[0].file_name, "recipes.csv");
    assert_eq!(logs[0].error_detail.as_deref(), Some("第5行物料名称或重量无效"));
}

#[tokio::test]
async fn test_config_overrides_apply() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_shared_conn(&db_path);
    let manager = ConfigManager::from_connection(conn.clone());
    manager.set_global_config_value(config_keys::DEFAULT_UNIT, "ml").unwrap();
    manager.set_global_config_value(config_keys::LOCALE, "en").unwrap();
    let config = manager.load_import_config().unwrap();

    let recipe_repo = Arc::new(SqliteRecipeRepository::from_connection(conn.clone()));
    let template_repo = Arc::new(SqliteTemplateRepository::from_connection(conn));
    template_repo.ensure_standard_template().unwrap();
    let importer = RecipeImporterImpl::new(recipe_repo.clone(), template_repo, config);

    let summary = importer.import_csv(sample_csv().as_bytes()).await;

    assert_eq!(summary.errors, vec!["row 5 invalid material name or weight"]);
    let recipe = recipe_repo.get_recipe_by_code("R001").await.unwrap().unwrap();
    let materials = recipe_repo.list_materials(&recipe.recipe_id).await.unwrap();
    assert_eq!(materials[0].unit, "kg");
    assert_eq!(materials[1].unit, "ml");
}

// ==========================================
// 审计日志失败不影响导入结果
// ==========================================

struct BrokenLogStore;

#[async_trait]
impl ImportLogStore for BrokenLogStore {
    async fn insert_log(&self, _log: &ImportLog) -> RepositoryResult<()> {
        Err(RepositoryError::LockError("poisoned".to_string()))
    }

    async fn recent_logs(&self, _limit: usize) -> RepositoryResult<Vec<ImportLog>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_log_failure_does_not_mask_success() {
    let ctx = setup(ImportConfig::default());
    let importer = RecipeImporterImpl::new(
        ctx.recipe_repo.clone(),
        ctx.template_repo.clone(),
        ImportConfig::default(),
    )
    .with_log_recorder(ImportLogRecorder::new(Arc::new(BrokenLogStore)));

    let summary = importer.import_upload("recipes.csv", sample_csv().as_bytes()).await;

    assert_eq!(summary.success, 2);
    assert_eq!(summary.failed, 1);
}
