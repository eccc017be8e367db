// ==========================================
// 区间补货需求计算系统 - CLI 主入口
// ==========================================
// 用途: 基于本地导出的记录文件运行一次区间需求计算
//
// 用法:
//   replenish-aps <market> <interval_start> <interval_end> <data_dir> [start_stock.json]
//
// data_dir 约定: demand.json 或 demand.csv + links.json + boxes.json
// 传入 start_stock.json (映射 listing → 数量) 时按 MANUAL 模式计算。
// ==========================================

use replenish_aps::api::{CalcRequest, ForecastApi};
use replenish_aps::config::SourceConfig;
use replenish_aps::domain::StartStockMode;
use replenish_aps::logging;
use replenish_aps::repository::FileSources;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 补货决策支持服务", replenish_aps::APP_NAME);
    tracing::info!("系统版本: {}", replenish_aps::VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);
    let (market, interval_start, interval_end, data_dir) =
        match (args.next(), args.next(), args.next(), args.next()) {
            (Some(m), Some(s), Some(e), Some(d)) => (m, s, e, PathBuf::from(d)),
            _ => {
                eprintln!(
                    "用法: replenish-aps <market> <interval_start> <interval_end> <data_dir> [start_stock.json]"
                );
                return ExitCode::from(2);
            }
        };
    let start_stock_path = args.next().map(PathBuf::from);

    // 配置: 启动时读取一次, 之后只读
    let config = match SourceConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("配置加载失败: {}", e);
            return ExitCode::from(2);
        }
    };

    let sources = match FileSources::load(&data_dir, &config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("数据源加载失败: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (start_stock_mode, start_stock) = match start_stock_path {
        Some(path) => match load_start_stock(&path) {
            Ok(map) => (StartStockMode::Manual, map),
            Err(e) => {
                tracing::error!("期初库存文件加载失败: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => (StartStockMode::Zero, HashMap::new()),
    };

    let request = CalcRequest {
        market,
        interval_start,
        interval_end,
        start_stock_mode,
        start_stock,
    };

    let api = ForecastApi::new(sources);
    match api.calc_interval_demand(&request).await {
        Ok(response) => match serde_json::to_string_pretty(&response) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("响应序列化失败: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!("计算失败: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// 读取 MANUAL 模式的期初库存映射 (JSON: listing → 数量)
fn load_start_stock(path: &std::path::Path) -> Result<HashMap<String, f64>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let map: HashMap<String, f64> = serde_json::from_str(&text)?;
    Ok(map)
}
