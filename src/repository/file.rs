// ==========================================
// 区间补货需求计算系统 - 文件数据源加载
// ==========================================
// 职责: 从本地 JSON/CSV 文件加载外部存储导出的记录
// 格式: JSON 为存储原生形态 [{ "id": ..., "fields": {...} }];
//       CSV 为日销量计划的扁平导出 (列名与字段配置一致)
// ==========================================

use crate::config::SourceConfig;
use crate::domain::{coerce_units, BoxRecord, DemandRecord, LinkRecord, LinkedRefs};
use crate::repository::error::{SourceError, SourceResult};
use crate::repository::memory::{MemoryBoxSource, MemoryDemandSource, MemoryLinkSource, MemorySink};
use crate::repository::sources::ForecastSources;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 外部存储原生记录形态
#[derive(Debug, Clone, Deserialize)]
struct RawStoreRecord {
    id: String,
    #[serde(default)]
    fields: HashMap<String, Value>,
}

fn read_raw_records(path: &Path) -> SourceResult<Vec<RawStoreRecord>> {
    let text = std::fs::read_to_string(path)?;
    let records: Vec<RawStoreRecord> = serde_json::from_str(&text)?;
    Ok(records)
}

/// 字段值强转为正整数 (每箱件数); 非正/非整数/缺失 → None
fn coerce_positive_int(value: Option<&Value>) -> Option<i64> {
    let n = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    if n > 0 {
        Some(n)
    } else {
        None
    }
}

// ==========================================
// JSON 加载
// ==========================================

/// 加载日销量计划记录 (JSON)
///
/// 日期格式错误对整个文件致命 (Decode, 带记录 ID);
/// 缺失/非数值的计划销量不是错误, 聚合按 0 计。
pub fn load_demand_json(path: &Path, config: &SourceConfig) -> SourceResult<Vec<DemandRecord>> {
    let raw = read_raw_records(path)?;
    let mut records = Vec::with_capacity(raw.len());
    for rec in raw {
        let date_value = rec
            .fields
            .get(&config.field_date)
            .and_then(|v| v.as_str())
            .ok_or_else(|| SourceError::Decode {
                record_id: rec.id.clone(),
                message: format!("缺少日期字段 {}", config.field_date),
            })?;
        let date = NaiveDate::parse_from_str(date_value, "%Y-%m-%d").map_err(|_| {
            SourceError::Decode {
                record_id: rec.id.clone(),
                message: format!("无效的日期值: {}", date_value),
            }
        })?;

        let markets = rec
            .fields
            .get(&config.field_market)
            .map(LinkedRefs::from_value)
            .unwrap_or_default();
        let listing = rec
            .fields
            .get(&config.field_listing)
            .map(LinkedRefs::from_value)
            .unwrap_or_default();
        let planned_units = coerce_units(rec.fields.get(&config.field_units));

        records.push(DemandRecord {
            record_id: rec.id,
            date,
            markets: markets.iter().map(|s| s.to_string()).collect(),
            listing,
            planned_units,
        });
    }
    debug!(count = records.len(), "日销量计划记录加载完成 (JSON)");
    Ok(records)
}

/// 加载日销量计划记录 (CSV, 扁平导出)
///
/// 市场列可含多个标签, 以 ';' 分隔。
pub fn load_demand_csv(path: &Path, config: &SourceConfig) -> SourceResult<Vec<DemandRecord>> {
    let mut reader = csv::Reader::from_path(path).map_err(SourceError::from)?;
    let headers = reader.headers().map_err(SourceError::from)?.clone();

    let col = |name: &str| -> SourceResult<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| SourceError::Decode {
                record_id: path.display().to_string(),
                message: format!("CSV 缺少列: {}", name),
            })
    };
    let date_col = col(&config.field_date)?;
    let listing_col = col(&config.field_listing)?;
    let market_col = col(&config.field_market)?;
    let units_col = col(&config.field_units)?;

    let mut records = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let row = result.map_err(SourceError::from)?;
        let record_id = format!("csv:{}", line + 2);

        let date_value = row.get(date_col).unwrap_or("").trim();
        let date = NaiveDate::parse_from_str(date_value, "%Y-%m-%d").map_err(|_| {
            SourceError::Decode {
                record_id: record_id.clone(),
                message: format!("无效的日期值: {}", date_value),
            }
        })?;

        let markets: Vec<String> = row
            .get(market_col)
            .unwrap_or("")
            .split(';')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let listing = match row.get(listing_col).map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => LinkedRefs::one(id),
            None => LinkedRefs::none(),
        };
        let planned_units = row
            .get(units_col)
            .and_then(|s| s.trim().parse::<f64>().ok());

        records.push(DemandRecord {
            record_id,
            date,
            markets,
            listing,
            planned_units,
        });
    }
    debug!(count = records.len(), "日销量计划记录加载完成 (CSV)");
    Ok(records)
}

/// 加载 Listing → 产品关联记录 (JSON)
pub fn load_links_json(path: &Path, config: &SourceConfig) -> SourceResult<Vec<LinkRecord>> {
    let raw = read_raw_records(path)?;
    let records = raw
        .into_iter()
        .map(|rec| {
            let product = rec
                .fields
                .get(&config.field_product_link)
                .map(LinkedRefs::from_value)
                .unwrap_or_default();
            LinkRecord {
                listing_id: rec.id,
                product,
            }
        })
        .collect::<Vec<_>>();
    debug!(count = records.len(), "产品关联记录加载完成");
    Ok(records)
}

/// 加载箱规记录 (JSON), 保持文件内顺序
pub fn load_boxes_json(path: &Path, config: &SourceConfig) -> SourceResult<Vec<BoxRecord>> {
    let raw = read_raw_records(path)?;
    let records = raw
        .into_iter()
        .map(|rec| {
            let units_per_carton = coerce_positive_int(rec.fields.get(&config.field_box_units));
            if units_per_carton.is_none() {
                warn!(box_id = %rec.id, "箱规记录无有效每箱件数, 将被解析器跳过");
            }
            let products = rec
                .fields
                .get(&config.field_box_products)
                .map(LinkedRefs::from_value)
                .unwrap_or_default();
            BoxRecord {
                box_id: rec.id,
                units_per_carton,
                products,
            }
        })
        .collect::<Vec<_>>();
    debug!(count = records.len(), "箱规记录加载完成");
    Ok(records)
}

// ==========================================
// FileSources - 目录加载入口
// ==========================================
// 目录约定: demand.json 或 demand.csv + links.json + boxes.json;
// 落库为内存 sink (进程退出即丢弃)。
pub struct FileSources;

impl FileSources {
    pub fn load(dir: &Path, config: &SourceConfig) -> SourceResult<ForecastSources> {
        let demand_json = dir.join("demand.json");
        let demand_csv = dir.join("demand.csv");
        let demand = if demand_json.exists() {
            load_demand_json(&demand_json, config)?
        } else if demand_csv.exists() {
            load_demand_csv(&demand_csv, config)?
        } else {
            return Err(SourceError::Store(format!(
                "{} 下未找到 demand.json 或 demand.csv",
                dir.display()
            )));
        };

        let links = load_links_json(&dir.join("links.json"), config)?;
        let boxes = load_boxes_json(&dir.join("boxes.json"), config)?;

        info!(
            demand = demand.len(),
            links = links.len(),
            boxes = boxes.len(),
            "文件数据源加载完成"
        );

        Ok(ForecastSources::new(
            Arc::new(MemoryDemandSource::new(demand)),
            Arc::new(MemoryLinkSource::new(links)),
            Arc::new(MemoryBoxSource::new(boxes)),
            Arc::new(MemorySink::new()),
        ))
    }
}
