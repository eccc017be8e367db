// ==========================================
// 区间补货需求计算系统 - 计算编排器
// ==========================================
// 用途: 协调聚合 → 箱规解析 → 装箱 → 组装 → 落库的执行顺序
// 失败语义: 批量读取致命; 产品关联分批可降级; 落库永不致命
// ==========================================

use crate::domain::{ForecastRow, MappingConflict, StartStockMode, Totals};
use crate::engine::aggregator::DemandAggregator;
use crate::engine::assembler::ResultAssembler;
use crate::engine::box_map::BoxMapResolver;
use crate::engine::cartonize::CartonizationEngine;
use crate::repository::sources::{ForecastSources, LINK_QUERY_CHUNK, SINK_BATCH};
use crate::repository::SourceResult;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{info, warn};

// ==========================================
// ForecastOutcome - 编排结果
// ==========================================
#[derive(Debug, Clone)]
pub struct ForecastOutcome {
    /// 已排序的结果行
    pub rows: Vec<ForecastRow>,
    /// 请求级合计
    pub totals: Totals,
    /// 箱规映射冲突 (仅告警)
    pub conflicts: Vec<MappingConflict>,
    /// 实际落库的行数 (可能小于行数, 落库失败不致命)
    pub saved: usize,
}

// ==========================================
// ForecastOrchestrator
// ==========================================
pub struct ForecastOrchestrator {
    sources: ForecastSources,
}

impl ForecastOrchestrator {
    /// 创建新的编排器实例
    pub fn new(sources: ForecastSources) -> Self {
        Self { sources }
    }

    /// 执行一次区间需求计算
    ///
    /// # 参数
    /// - market: 市场标签 (已校验非空)
    /// - start / end: 含端区间 (已校验 end >= start)
    /// - mode: 期初库存模式
    /// - start_stock: MANUAL 模式下的逐 Listing 期初库存
    ///
    /// 所有中间结构为本次请求私有, 跨请求不共享任何状态。
    pub async fn run(
        &self,
        market: &str,
        start: NaiveDate,
        end: NaiveDate,
        mode: StartStockMode,
        start_stock: &HashMap<String, f64>,
    ) -> SourceResult<ForecastOutcome> {
        // 1. 含端 → 排他窗口, 批量读取日销量计划 (失败致命)
        let end_exclusive = DemandAggregator::exclusive_end(end);
        let records = self
            .sources
            .demand
            .query_window(market, start, end_exclusive)
            .await?;
        info!(market = %market, records = records.len(), "日销量计划读取完成");

        // 2. 聚合为 Listing → 区间预测销量
        let aggregated = DemandAggregator::aggregate(market, &records);

        // 稳定的 Listing 顺序: 分批查询与行构造都按它走,
        // 使同输入产出逐字节一致的结果
        let mut listing_ids: Vec<String> = aggregated.keys().cloned().collect();
        listing_ids.sort();

        // 3. 分批解析产品关联 (单批失败降级: 跳过该批, 行级报 PRODUCT_NOT_FOUND)
        let mut links = HashMap::new();
        for chunk in listing_ids.chunks(LINK_QUERY_CHUNK) {
            match self.sources.links.resolve_products(chunk).await {
                Ok(resolved) => links.extend(resolved),
                Err(e) => {
                    warn!(
                        chunk_len = chunk.len(),
                        error = %e,
                        "产品关联批量查询失败, 跳过该批 Listing"
                    );
                }
            }
        }
        info!(
            listings = listing_ids.len(),
            resolved = links.len(),
            "产品关联解析完成"
        );

        // 4. 读取箱规并构建查找表 (批量读取失败致命)
        let boxes = self.sources.boxes.all_boxes().await?;
        let box_map = BoxMapResolver::resolve(&links, &boxes);
        info!(
            boxes = boxes.len(),
            mapped = box_map.len(),
            conflicts = box_map.conflicts().len(),
            "箱规映射构建完成"
        );

        // 5. 构造结果行并装箱
        let rows: Vec<ForecastRow> = listing_ids
            .iter()
            .map(|listing_id| {
                let forecast_units = aggregated[listing_id];
                let stock = match mode {
                    StartStockMode::Zero => 0.0,
                    StartStockMode::Manual => start_stock.get(listing_id).copied().unwrap_or(0.0),
                };
                ForecastRow::pending(listing_id.clone(), forecast_units, stock)
            })
            .collect();
        let cartonized = CartonizationEngine::cartonize_rows(rows, &box_map);

        // 6. 排序与合计
        let (rows, totals) = ResultAssembler::assemble(cartonized);

        // 7. 落库 (fire-and-forget; 首个失败批停止写入, 已返回的计算不回滚)
        let saved = self.persist(market, start, end, &rows).await;

        Ok(ForecastOutcome {
            rows,
            totals,
            conflicts: box_map.conflicts().to_vec(),
            saved,
        })
    }

    /// 分批落库, 返回实际持久化的行数
    async fn persist(
        &self,
        market: &str,
        start: NaiveDate,
        end: NaiveDate,
        rows: &[ForecastRow],
    ) -> usize {
        let mut saved = 0usize;
        for batch in rows.chunks(SINK_BATCH) {
            match self.sources.sink.save_batch(market, start, end, batch).await {
                Ok(count) => saved += count,
                Err(e) => {
                    warn!(saved, error = %e, "结果落库失败, 停止后续写入");
                    break;
                }
            }
        }
        saved
    }
}
