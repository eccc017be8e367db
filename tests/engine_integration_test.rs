// ==========================================
// 计算编排器集成测试
// ==========================================
// 测试目标: 验证聚合 → 箱规解析 → 装箱 → 组装 → 落库全链路
// 覆盖范围: 区间聚合、市场过滤、错误分类、合计规则、冲突裁决
// ==========================================

use chrono::NaiveDate;
use replenish_aps::domain::{
    BoxRecord, DemandRecord, ErrorReason, LinkRecord, LinkedRefs, RowStatus, StartStockMode,
};
use replenish_aps::engine::ForecastOrchestrator;
use replenish_aps::repository::{
    ForecastSources, MemoryBoxSource, MemoryDemandSource, MemoryLinkSource, MemorySink,
};
use std::collections::HashMap;
use std::sync::Arc;

// ==========================================
// 测试辅助函数
// ==========================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 创建测试用的日销量计划记录
fn demand(record_id: &str, d: NaiveDate, markets: &[&str], listing: &str, units: Option<f64>) -> DemandRecord {
    DemandRecord {
        record_id: record_id.to_string(),
        date: d,
        markets: markets.iter().map(|s| s.to_string()).collect(),
        listing: LinkedRefs::one(listing),
        planned_units: units,
    }
}

/// 创建测试用的产品关联记录
fn link(listing: &str, product: Option<&str>) -> LinkRecord {
    LinkRecord {
        listing_id: listing.to_string(),
        product: match product {
            Some(p) => LinkedRefs::one(p),
            None => LinkedRefs::none(),
        },
    }
}

/// 创建测试用的箱规记录
fn box_record(box_id: &str, units: i64, products: &[&str]) -> BoxRecord {
    BoxRecord {
        box_id: box_id.to_string(),
        units_per_carton: Some(units),
        products: LinkedRefs::new(products.iter().map(|s| s.to_string()).collect()),
    }
}

/// 组装内存数据源集合, 返回 sink 句柄以便断言落库计数
fn sources(
    demand: Vec<DemandRecord>,
    links: Vec<LinkRecord>,
    boxes: Vec<BoxRecord>,
) -> (ForecastSources, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let sources = ForecastSources::new(
        Arc::new(MemoryDemandSource::new(demand)),
        Arc::new(MemoryLinkSource::new(links)),
        Arc::new(MemoryBoxSource::new(boxes)),
        sink.clone(),
    );
    (sources, sink)
}

fn no_stock() -> HashMap<String, f64> {
    HashMap::new()
}

// ==========================================
// 全链路场景
// ==========================================

#[tokio::test]
async fn test_full_pipeline_two_day_interval() {
    // 区间 2026-04-01..2026-04-02 (含), L1 两天 10 + 15 件, 每箱 18
    let (sources, sink) = sources(
        vec![
            demand("r1", date(2026, 4, 1), &["USA"], "L1", Some(10.0)),
            demand("r2", date(2026, 4, 2), &["USA"], "L1", Some(15.0)),
        ],
        vec![link("L1", Some("P1"))],
        vec![box_record("B1", 18, &["P1"])],
    );
    let orchestrator = ForecastOrchestrator::new(sources);

    let outcome = orchestrator
        .run("USA", date(2026, 4, 1), date(2026, 4, 2), StartStockMode::Zero, &no_stock())
        .await
        .unwrap();

    assert_eq!(outcome.rows.len(), 1);
    let row = &outcome.rows[0];
    assert_eq!(row.forecast_units, 25.0);
    assert_eq!(row.order_qty, 25.0);
    assert_eq!(row.units_per_carton, Some(18));
    assert_eq!(row.cartons, Some(2));
    assert_eq!(row.rounded_units, Some(36));
    assert_eq!(row.overstock_units, Some(11.0));
    assert_eq!(row.overstock_pct, Some(0.44));
    assert_eq!(row.status, RowStatus::Ok);

    assert_eq!(outcome.totals.listings, 1);
    assert_eq!(outcome.totals.forecast_units, 25.0);
    assert_eq!(outcome.totals.cartons, 2);
    assert_eq!(outcome.totals.rounded_units, 36);
    assert_eq!(outcome.totals.overstock_units, 11.0);
    assert_eq!(outcome.totals.errors, 0);

    // 全部行已落库
    assert_eq!(outcome.saved, 1);
    assert_eq!(sink.saved_count(), 1);
}

#[tokio::test]
async fn test_interval_end_is_inclusive() {
    // 结束日当天的记录必须计入, 次日的不计入
    let (sources, _) = sources(
        vec![
            demand("r1", date(2026, 4, 2), &["USA"], "L1", Some(15.0)),
            demand("r2", date(2026, 4, 3), &["USA"], "L1", Some(99.0)),
        ],
        vec![link("L1", Some("P1"))],
        vec![box_record("B1", 18, &["P1"])],
    );
    let orchestrator = ForecastOrchestrator::new(sources);

    let outcome = orchestrator
        .run("USA", date(2026, 4, 1), date(2026, 4, 2), StartStockMode::Zero, &no_stock())
        .await
        .unwrap();
    assert_eq!(outcome.rows[0].forecast_units, 15.0);
}

#[tokio::test]
async fn test_market_mismatch_excluded_entirely() {
    // 请求市场不在记录的标签集合 → 整条排除
    let (sources, _) = sources(
        vec![
            demand("r1", date(2026, 4, 1), &["USA", "CA"], "L1", Some(10.0)),
            demand("r2", date(2026, 4, 1), &["DE"], "L2", Some(50.0)),
        ],
        vec![link("L1", Some("P1")), link("L2", Some("P2"))],
        vec![box_record("B1", 18, &["P1", "P2"])],
    );
    let orchestrator = ForecastOrchestrator::new(sources);

    let outcome = orchestrator
        .run("USA", date(2026, 4, 1), date(2026, 4, 1), StartStockMode::Zero, &no_stock())
        .await
        .unwrap();
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].listing_id, "L1");
}

#[tokio::test]
async fn test_empty_interval_is_valid_empty_result() {
    let (sources, sink) = sources(
        vec![demand("r1", date(2026, 6, 1), &["USA"], "L1", Some(10.0))],
        vec![link("L1", Some("P1"))],
        vec![box_record("B1", 18, &["P1"])],
    );
    let orchestrator = ForecastOrchestrator::new(sources);

    // 区间与数据不相交 → 空结果, 不是错误
    let outcome = orchestrator
        .run("USA", date(2026, 4, 1), date(2026, 4, 30), StartStockMode::Zero, &no_stock())
        .await
        .unwrap();
    assert!(outcome.rows.is_empty());
    assert_eq!(outcome.totals.listings, 0);
    assert_eq!(outcome.totals.errors, 0);
    assert_eq!(sink.saved_count(), 0);
}

// ==========================================
// 错误分类与合计
// ==========================================

#[tokio::test]
async fn test_row_error_classification_and_totals() {
    // L1 正常; L2 无产品关联; L3 产品存在但无箱规
    let (sources, _) = sources(
        vec![
            demand("r1", date(2026, 4, 1), &["USA"], "L1", Some(25.0)),
            demand("r2", date(2026, 4, 1), &["USA"], "L2", Some(30.0)),
            demand("r3", date(2026, 4, 1), &["USA"], "L3", Some(8.0)),
        ],
        vec![link("L1", Some("P1")), link("L3", Some("P3"))],
        vec![box_record("B1", 18, &["P1"])],
    );
    let orchestrator = ForecastOrchestrator::new(sources);

    let outcome = orchestrator
        .run("USA", date(2026, 4, 1), date(2026, 4, 1), StartStockMode::Zero, &no_stock())
        .await
        .unwrap();

    let by_id: HashMap<_, _> = outcome
        .rows
        .iter()
        .map(|r| (r.listing_id.clone(), r))
        .collect();

    assert_eq!(by_id["L1"].status, RowStatus::Ok);
    assert_eq!(by_id["L2"].status, RowStatus::Error);
    assert_eq!(by_id["L2"].error_reason, Some(ErrorReason::ProductNotFound));
    assert_eq!(by_id["L3"].status, RowStatus::Error);
    assert_eq!(by_id["L3"].error_reason, Some(ErrorReason::BoxNotFound));

    // ERROR 行计入 forecast/order 合计与错误计数, 不计入箱数合计
    assert_eq!(outcome.totals.listings, 3);
    assert_eq!(outcome.totals.forecast_units, 63.0);
    assert_eq!(outcome.totals.cartons, 2);
    assert_eq!(outcome.totals.rounded_units, 36);
    assert_eq!(outcome.totals.errors, 2);
}

#[tokio::test]
async fn test_rows_sorted_descending_by_order_qty() {
    let (sources, _) = sources(
        vec![
            demand("r1", date(2026, 4, 1), &["USA"], "L1", Some(5.0)),
            demand("r2", date(2026, 4, 1), &["USA"], "L2", Some(40.0)),
            demand("r3", date(2026, 4, 1), &["USA"], "L3", Some(20.0)),
        ],
        vec![
            link("L1", Some("P1")),
            link("L2", Some("P2")),
            link("L3", Some("P3")),
        ],
        vec![box_record("B1", 10, &["P1", "P2", "P3"])],
    );
    let orchestrator = ForecastOrchestrator::new(sources);

    let outcome = orchestrator
        .run("USA", date(2026, 4, 1), date(2026, 4, 1), StartStockMode::Zero, &no_stock())
        .await
        .unwrap();
    let ids: Vec<_> = outcome.rows.iter().map(|r| r.listing_id.as_str()).collect();
    assert_eq!(ids, vec!["L2", "L3", "L1"]);
}

// ==========================================
// 期初库存与冲突
// ==========================================

#[tokio::test]
async fn test_manual_start_stock_reduces_order_qty() {
    let (sources, _) = sources(
        vec![demand("r1", date(2026, 4, 1), &["USA"], "L1", Some(25.0))],
        vec![link("L1", Some("P1"))],
        vec![box_record("B1", 18, &["P1"])],
    );
    let orchestrator = ForecastOrchestrator::new(sources);

    let stock: HashMap<String, f64> = [("L1".to_string(), 10.0)].into_iter().collect();
    let outcome = orchestrator
        .run("USA", date(2026, 4, 1), date(2026, 4, 1), StartStockMode::Manual, &stock)
        .await
        .unwrap();

    let row = &outcome.rows[0];
    assert_eq!(row.start_stock, 10.0);
    assert_eq!(row.order_qty, 15.0);
    assert_eq!(row.cartons, Some(1));
    assert_eq!(row.rounded_units, Some(18));
}

#[tokio::test]
async fn test_excess_start_stock_clamps_to_zero_cartons() {
    let (sources, _) = sources(
        vec![demand("r1", date(2026, 4, 1), &["USA"], "L1", Some(10.0))],
        vec![link("L1", Some("P1"))],
        vec![box_record("B1", 18, &["P1"])],
    );
    let orchestrator = ForecastOrchestrator::new(sources);

    let stock: HashMap<String, f64> = [("L1".to_string(), 40.0)].into_iter().collect();
    let outcome = orchestrator
        .run("USA", date(2026, 4, 1), date(2026, 4, 1), StartStockMode::Manual, &stock)
        .await
        .unwrap();

    let row = &outcome.rows[0];
    assert_eq!(row.order_qty, 0.0);
    assert_eq!(row.cartons, Some(0));
    assert_eq!(row.status, RowStatus::Ok);
}

#[tokio::test]
async fn test_conflicting_box_sizes_first_wins_with_advisory() {
    let (sources, _) = sources(
        vec![demand("r1", date(2026, 4, 1), &["USA"], "L1", Some(25.0))],
        vec![link("L1", Some("P1"))],
        vec![
            box_record("B1", 18, &["P1"]),
            box_record("B2", 24, &["P1"]),
        ],
    );
    let orchestrator = ForecastOrchestrator::new(sources);

    let outcome = orchestrator
        .run("USA", date(2026, 4, 1), date(2026, 4, 1), StartStockMode::Zero, &no_stock())
        .await
        .unwrap();

    // first-wins: 首个箱规记录的值保留, 冲突仅告警
    assert_eq!(outcome.rows[0].units_per_carton, Some(18));
    assert_eq!(outcome.conflicts.len(), 1);
    assert_eq!(outcome.conflicts[0].product_id, "P1");
    assert_eq!(outcome.conflicts[0].kept, 18);
    assert_eq!(outcome.conflicts[0].rejected, 24);
    assert_eq!(outcome.totals.errors, 0);
}
