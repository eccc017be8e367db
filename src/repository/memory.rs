// ==========================================
// 区间补货需求计算系统 - 内存数据源实现
// ==========================================
// 职责: 确定性的进程内数据源/落库实现
// 用途: 文件加载后的承载结构, 以及测试环境
// ==========================================

use crate::domain::{BoxRecord, DemandRecord, ForecastRow, LinkRecord};
use crate::repository::error::SourceResult;
use crate::repository::sources::{BoxSource, DemandSource, LinkSource, ResultSink};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

// ==========================================
// MemoryDemandSource
// ==========================================
// 查询时做与外部存储过滤公式等价的下推过滤:
// 日期落在 [start, end_exclusive) 且市场标签包含请求市场。
pub struct MemoryDemandSource {
    records: Vec<DemandRecord>,
}

impl MemoryDemandSource {
    pub fn new(records: Vec<DemandRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl DemandSource for MemoryDemandSource {
    async fn query_window(
        &self,
        market: &str,
        start: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> SourceResult<Vec<DemandRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.date >= start && r.date < end_exclusive)
            .filter(|r| r.matches_market(market))
            .cloned()
            .collect())
    }
}

// ==========================================
// MemoryLinkSource
// ==========================================
pub struct MemoryLinkSource {
    links: HashMap<String, LinkRecord>,
}

impl MemoryLinkSource {
    pub fn new(records: Vec<LinkRecord>) -> Self {
        let links = records
            .into_iter()
            .map(|r| (r.listing_id.clone(), r))
            .collect();
        Self { links }
    }
}

#[async_trait]
impl LinkSource for MemoryLinkSource {
    async fn resolve_products(
        &self,
        listing_ids: &[String],
    ) -> SourceResult<HashMap<String, LinkRecord>> {
        Ok(listing_ids
            .iter()
            .filter_map(|id| self.links.get(id).map(|r| (id.clone(), r.clone())))
            .collect())
    }
}

// ==========================================
// MemoryBoxSource
// ==========================================
// 保持构造时的记录顺序 (冲突裁决为 first-wins, 顺序敏感)。
pub struct MemoryBoxSource {
    boxes: Vec<BoxRecord>,
}

impl MemoryBoxSource {
    pub fn new(boxes: Vec<BoxRecord>) -> Self {
        Self { boxes }
    }
}

#[async_trait]
impl BoxSource for MemoryBoxSource {
    async fn all_boxes(&self) -> SourceResult<Vec<BoxRecord>> {
        Ok(self.boxes.clone())
    }
}

// ==========================================
// MemorySink
// ==========================================

/// 落库后的结果记录 (外部存储会为每条新记录分配 ID)
#[derive(Debug, Clone)]
pub struct SavedForecast {
    pub record_id: String,
    pub market: String,
    pub interval_start: NaiveDate,
    pub interval_end: NaiveDate,
    pub row: ForecastRow,
}

#[derive(Default)]
pub struct MemorySink {
    saved: Mutex<Vec<SavedForecast>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已持久化的行数
    pub fn saved_count(&self) -> usize {
        self.saved.lock().map(|v| v.len()).unwrap_or(0)
    }

    /// 已持久化记录的快照 (测试断言用)
    pub fn snapshot(&self) -> Vec<SavedForecast> {
        self.saved.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn save_batch(
        &self,
        market: &str,
        interval_start: NaiveDate,
        interval_end: NaiveDate,
        rows: &[ForecastRow],
    ) -> SourceResult<usize> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|e| crate::repository::error::SourceError::Internal(e.to_string()))?;
        for row in rows {
            saved.push(SavedForecast {
                record_id: Uuid::new_v4().to_string(),
                market: market.to_string(),
                interval_start,
                interval_end,
                row: row.clone(),
            });
        }
        Ok(rows.len())
    }
}
