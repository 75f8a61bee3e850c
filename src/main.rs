// ==========================================
// 销售分析与采购建议系统 - 命令行入口
// ==========================================
// 用法:
//   purchase-advisor import <file>      导入销售文件并刷新结果集
//   purchase-advisor demo               以模拟数据刷新结果集
//   purchase-advisor status             查看结果集状态与品类合计
//   purchase-advisor export <out.csv>   导出报表明细
//   purchase-advisor export-summary <out.csv> [--by category|store|store-category]
//                                       导出汇总
// 选项:
//   --db PATH  --analysis-days N  --projection-days N  --locale zh-CN|en
//   --store N          status / export / export-summary 只统计该门店
//   --skip-disallowed  import 时跳过白名单外品类（默认报错）
// ==========================================

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use purchase_advisor::app::{get_default_db_path, AppState};
use purchase_advisor::config::ProjectionConfigReader;
use purchase_advisor::i18n::{self, t, t_with_args};
use purchase_advisor::importer::SalesImporter;
use purchase_advisor::{logging, DataSource, RollupKey};

#[derive(Debug)]
enum Command {
    Import(PathBuf),
    Demo,
    Status,
    Export(PathBuf),
    ExportSummary(PathBuf, RollupKey),
}

#[derive(Debug)]
struct CliArgs {
    command: Command,
    db_path: Option<String>,
    analysis_days: Option<u32>,
    projection_days: Option<u32>,
    locale: Option<String>,
    store_id: Option<i64>,
    rollup_key: Option<RollupKey>,
    skip_disallowed: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut positional = Vec::new();
    let mut db_path = None;
    let mut analysis_days = None;
    let mut projection_days = None;
    let mut locale = None;
    let mut store_id = None;
    let mut rollup_key = None;
    let mut skip_disallowed = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--db" => db_path = Some(flag_value(&mut iter, arg)?),
            "--analysis-days" => analysis_days = Some(parse_days(&flag_value(&mut iter, arg)?)?),
            "--projection-days" => {
                projection_days = Some(parse_days(&flag_value(&mut iter, arg)?)?)
            }
            "--locale" => locale = Some(flag_value(&mut iter, arg)?),
            "--store" => store_id = Some(parse_store(&flag_value(&mut iter, arg)?)?),
            "--by" => rollup_key = Some(parse_rollup_key(&flag_value(&mut iter, arg)?)?),
            "--skip-disallowed" => skip_disallowed = true,
            _ => positional.push(arg.clone()),
        }
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        Some("import") => Command::Import(PathBuf::from(
            positional.next().ok_or_else(|| t("cli.usage"))?,
        )),
        Some("demo") => Command::Demo,
        Some("status") => Command::Status,
        Some("export") => Command::Export(PathBuf::from(
            positional.next().ok_or_else(|| t("cli.usage"))?,
        )),
        Some("export-summary") => Command::ExportSummary(
            PathBuf::from(positional.next().ok_or_else(|| t("cli.usage"))?),
            rollup_key.unwrap_or(RollupKey::Category),
        ),
        Some(other) => {
            return Err(t_with_args("cli.unknown_command", &[("command", other)]));
        }
        None => return Err(t("cli.usage")),
    };

    Ok(CliArgs {
        command,
        db_path,
        analysis_days,
        projection_days,
        locale,
        store_id,
        rollup_key,
        skip_disallowed,
    })
}

fn flag_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<String, String> {
    iter.next()
        .cloned()
        .ok_or_else(|| format!("{} 缺少参数值", flag))
}

fn parse_days(raw: &str) -> Result<u32, String> {
    raw.parse::<u32>()
        .map_err(|_| format!("无效的天数: {}", raw))
}

fn parse_store(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>()
        .map_err(|_| format!("无效的门店ID: {}", raw))
}

fn parse_rollup_key(raw: &str) -> Result<RollupKey, String> {
    match raw {
        "category" => Ok(RollupKey::Category),
        "store" => Ok(RollupKey::Store),
        "store-category" => Ok(RollupKey::StoreCategory),
        other => Err(format!("无效的汇总维度: {}", other)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw_args) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("{}", t("cli.usage"));
            std::process::exit(2);
        }
    };

    if let Some(locale) = &args.locale {
        i18n::set_locale(locale);
    }

    let db_path = args.db_path.clone().unwrap_or_else(get_default_db_path);
    let state = AppState::new(db_path)?;

    // 命令行窗口覆盖已存配置
    let mut config = state.config_manager.load_projection_config().await?;
    if let Some(days) = args.analysis_days {
        config.analysis_window_days = days;
    }
    if let Some(days) = args.projection_days {
        config.projection_window_days = days;
    }
    config.validate()?;

    tracing::info!(
        analysis_window_days = config.analysis_window_days,
        projection_window_days = config.projection_window_days,
        command = ?args.command,
        "开始执行命令"
    );

    match &args.command {
        Command::Import(path) => {
            if !path.exists() {
                let shown = path.display().to_string();
                eprintln!("{}", t_with_args("import.file_not_found", &[("path", &shown)]));
                std::process::exit(1);
            }
            let records = if args.skip_disallowed {
                SalesImporter::new()
                    .skip_disallowed_groups(true)
                    .import_file(path, &config)?
            } else {
                state.importer.import_file(path, &config)?
            };
            println!(
                "{}",
                t_with_args("import.imported", &[("count", &records.len().to_string())])
            );

            let count = state
                .report_api
                .refresh_from_records(&records, DataSource::External, &config)?;
            print_refreshed(count, DataSource::External);
        }
        Command::Demo => {
            let count = state.report_api.refresh_demo(&config)?;
            print_refreshed(count, DataSource::Demo);
        }
        Command::Status => {
            let status = state.report_api.status_check(&config, args.store_id)?;

            println!(
                "{}",
                t_with_args("report.row_count", &[("count", &status.row_count.to_string())])
            );
            if status.row_count == 0 {
                println!("{}", t("report.empty_store"));
                return Ok(());
            }
            if let Some(at) = status.last_refresh_at {
                println!(
                    "{}",
                    t_with_args("report.last_refresh", &[("time", &at.to_string())])
                );
            }
            if let Some(source) = status.data_source {
                println!(
                    "{}",
                    t_with_args("report.data_source", &[("source", &source.to_string())])
                );
            }
            for row in &status.by_category {
                println!(
                    "  {:<12} {:>12.2} {:>12.2}",
                    row.category.as_deref().unwrap_or("-"),
                    row.quantity_sold,
                    row.recommended_purchase
                );
            }
            println!(
                "  {:<12} {:>12.2} {:>12.2}",
                "TOTAL", status.total_quantity_sold, status.total_recommended_purchase
            );
        }
        Command::Export(out) => {
            let file = File::create(out)?;
            let count = state
                .report_api
                .export_projected_csv(&config, args.store_id, BufWriter::new(file))?;
            let shown = out.display().to_string();
            println!(
                "{}",
                t_with_args(
                    "export.written",
                    &[("count", &count.to_string()), ("path", &shown)]
                )
            );
        }
        Command::ExportSummary(out, key) => {
            let file = File::create(out)?;
            let count = state.report_api.export_summary_csv(
                &config,
                *key,
                args.store_id,
                BufWriter::new(file),
            )?;
            let shown = out.display().to_string();
            println!(
                "{}",
                t_with_args(
                    "export.written",
                    &[("count", &count.to_string()), ("path", &shown)]
                )
            );
        }
    }

    Ok(())
}

fn print_refreshed(count: usize, source: DataSource) {
    println!(
        "{}",
        t_with_args(
            "report.refreshed",
            &[("count", &count.to_string()), ("source", &source.to_string())]
        )
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_export_with_flags() {
        let parsed = parse_args(&args(&[
            "export",
            "out.csv",
            "--db",
            "/tmp/a.db",
            "--analysis-days",
            "30",
            "--projection-days",
            "7",
        ]))
        .unwrap();

        assert!(matches!(parsed.command, Command::Export(ref p) if p == &PathBuf::from("out.csv")));
        assert_eq!(parsed.db_path.as_deref(), Some("/tmp/a.db"));
        assert_eq!(parsed.analysis_days, Some(30));
        assert_eq!(parsed.projection_days, Some(7));
    }

    #[test]
    fn test_parse_export_summary_and_store_filter() {
        let parsed = parse_args(&args(&[
            "export-summary",
            "sum.csv",
            "--by",
            "store-category",
            "--store",
            "3",
        ]))
        .unwrap();

        assert!(matches!(
            parsed.command,
            Command::ExportSummary(ref p, RollupKey::StoreCategory) if p == &PathBuf::from("sum.csv")
        ));
        assert_eq!(parsed.store_id, Some(3));

        let parsed = parse_args(&args(&["export-summary", "sum.csv"])).unwrap();
        assert!(matches!(parsed.command, Command::ExportSummary(_, RollupKey::Category)));
        assert!(parsed.store_id.is_none());

        let parsed = parse_args(&args(&["import", "a.csv", "--skip-disallowed"])).unwrap();
        assert!(parsed.skip_disallowed);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["import"])).is_err());
        assert!(parse_args(&args(&["frobnicate"])).is_err());
        assert!(parse_args(&args(&["demo", "--analysis-days", "abc"])).is_err());
        assert!(parse_args(&args(&["status", "--store", "x"])).is_err());
        assert!(parse_args(&args(&["export-summary", "s.csv", "--by", "month"])).is_err());
    }
}
