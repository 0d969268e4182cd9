// ==========================================
// 设备状态监测系统 - 命令行入口
// ==========================================
// 用法:
//   condition-monitor <csv_path> [start YYYY-MM-DD] [end YYYY-MM-DD] [--csv]
//
// 未给出日期时使用以今天为终点的配置窗口（默认 7 天）
// --csv: 将越限读数明细以 CSV 写到 stdout
// ==========================================

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use condition_monitor::api::{write_deviation_csv, ReportApi};
use condition_monitor::config::{load_catalog, MonitorSettings};
use condition_monitor::importer::CsvFileSource;
use condition_monitor::logging;
use std::sync::Arc;

const USAGE: &str = "用法: condition-monitor <csv_path> [start YYYY-MM-DD] [end YYYY-MM-DD] [--csv]";

#[tokio::main]
async fn main() -> Result<()> {
    let settings = MonitorSettings::from_env();
    logging::init(settings.log_format);

    let mut export_csv = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--csv" {
            export_csv = true;
        } else {
            positional.push(arg);
        }
    }

    let csv_path = match positional.first() {
        Some(path) => path.clone(),
        None => bail!(USAGE),
    };
    let start = positional.get(1).map(|s| parse_date(s)).transpose()?;
    let end = positional.get(2).map(|s| parse_date(s)).transpose()?;

    tracing::info!("{} v{}", condition_monitor::APP_NAME, condition_monitor::VERSION);

    let catalog = load_catalog(&settings).context("阈值目录加载失败")?;
    tracing::info!(version = catalog.version(), equipment = catalog.len(), "阈值目录已加载");

    let api = ReportApi::new(
        Arc::new(catalog),
        Arc::new(CsvFileSource::new(&csv_path)),
        settings,
    );

    let today = Local::now().date_naive();
    let response = match (start, end) {
        (Some(start), Some(end)) => api.generate_report(start, end).await?,
        (Some(start), None) => api.generate_report(start, today).await?,
        _ => api.weekly_report(today).await?,
    };

    if export_csv {
        write_deviation_csv(&response.report, std::io::stdout().lock())?;
        return Ok(());
    }

    let report = &response.report;
    println!(
        "报表 {} | 目录版本 {} | {} ~ {}",
        response.report_id, response.catalog_version, report.start_date, report.end_date
    );

    if report.is_clean() {
        println!("All equipment is operating within thresholds, or no running equipment was found for the selected date range.");
    } else {
        for advisory in report.advisories() {
            println!("{}", advisory);
        }
    }

    for warning in &report.data_quality {
        println!("[数据质量] {}", warning);
    }
    for unknown in &report.unknown_equipment {
        println!("[未知设备] {} ({}, {})", unknown.equipment, unknown.area, unknown.date);
    }
    for rejection in &response.rejections {
        println!("[导入] 行 {}: {}", rejection.row_number, rejection.message);
    }

    let s = &report.summary;
    println!(
        "读数 {} | 窗口内 {} | 运行 {} | 评估 {} | 越限 {} | 未知设备 {}",
        s.total_readings, s.in_window, s.running, s.evaluated, s.deviating, s.unknown
    );

    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("日期格式错误: {}（期望 YYYY-MM-DD）\n{}", raw, USAGE))
}
