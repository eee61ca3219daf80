// ==========================================
// 配方导入系统 - 命令行入口
// ==========================================
// 用法:
//   recipe-import <file.csv|file.xlsx> [db_path]   导入并输出汇总 JSON
//   recipe-import --template <out.csv>              导出标准 CSV 模板
// ==========================================

use anyhow::{bail, Context, Result};
use recipe_import::app::{get_default_db_path, AppState};
use recipe_import::importer::TemplateExporter;
use recipe_import::{logging, RecipeImporter, TemplateDefinition};

const USAGE: &str = "用法: recipe-import <file.csv|file.xlsx> [db_path]\n      recipe-import --template <out.csv>";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None | Some("-h") | Some("--help") => {
            eprintln!("{}", USAGE);
            Ok(())
        }
        Some("--template") => {
            let Some(out_path) = args.get(1) else {
                bail!("缺少模板输出路径\n{}", USAGE);
            };
            export_template(out_path)
        }
        Some(file_path) => {
            let db_path = args.get(1).cloned().unwrap_or_else(get_default_db_path);
            run_import(file_path, db_path).await
        }
    }
}

async fn run_import(file_path: &str, db_path: String) -> Result<()> {
    tracing::info!("==================================================");
    tracing::info!("{} v{}", recipe_import::APP_NAME, recipe_import::VERSION);
    tracing::info!("使用数据库: {}", db_path);
    tracing::info!("==================================================");

    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    let summary = state.importer.import_file(file_path).await;

    // 部分失败也正常退出，详情见 errors
    let json = serde_json::to_string_pretty(&summary).context("汇总序列化失败")?;
    println!("{}", json);

    Ok(())
}

fn export_template(out_path: &str) -> Result<()> {
    let csv_text = TemplateExporter::to_csv(&TemplateDefinition::standard())?;
    std::fs::write(out_path, csv_text).with_context(|| format!("模板写入失败: {}", out_path))?;

    tracing::info!(path = %out_path, "标准模板已导出");
    Ok(())
}
