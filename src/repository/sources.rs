// ==========================================
// 区间补货需求计算系统 - 数据源 Trait
// ==========================================
// 职责: 定义外部存储的抽象查询接口 (不包含实现)
// 红线: 核心计算只依赖这些 trait, 不感知传输层
// ==========================================

use crate::domain::{BoxRecord, DemandRecord, ForecastRow, LinkRecord};
use crate::repository::error::SourceResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

/// 产品关联批量查询的单次请求上限 (外部存储查询长度限制)
pub const LINK_QUERY_CHUNK: usize = 100;

/// 结果落库的单批记录数上限 (外部存储批量写入限制)
pub const SINK_BATCH: usize = 10;

// ==========================================
// DemandSource Trait
// ==========================================
// 用途: 按市场与日期窗口批量读取日销量计划记录
// 失败语义: 批量读取失败对整个请求致命 (没有有意义的部分结果)
#[async_trait]
pub trait DemandSource: Send + Sync {
    /// 查询日期落在 [start, end_exclusive) 且市场标签匹配的记录
    ///
    /// # 参数
    /// - market: 市场标签 (如 "USA")
    /// - start: 窗口起始日 (含)
    /// - end_exclusive: 窗口结束日 (不含, 调用方已由含端转换)
    async fn query_window(
        &self,
        market: &str,
        start: NaiveDate,
        end_exclusive: NaiveDate,
    ) -> SourceResult<Vec<DemandRecord>>;
}

// ==========================================
// LinkSource Trait
// ==========================================
// 用途: 批量解析 Listing → 产品关联
// 失败语义: 单批失败可降级 (跳过该批 Listing, 不中断请求)
#[async_trait]
pub trait LinkSource: Send + Sync {
    /// 解析一批 Listing 的产品关联
    ///
    /// # 参数
    /// - listing_ids: 待解析的 Listing 引用, 长度不超过 LINK_QUERY_CHUNK
    ///
    /// # 返回
    /// - 映射 listing_id → LinkRecord; 无关联的 Listing 不出现在结果中
    async fn resolve_products(
        &self,
        listing_ids: &[String],
    ) -> SourceResult<HashMap<String, LinkRecord>>;
}

// ==========================================
// BoxSource Trait
// ==========================================
// 用途: 读取全部箱规记录
// 失败语义: 致命 (箱规缺失时所有行都无法装箱)
#[async_trait]
pub trait BoxSource: Send + Sync {
    /// 读取全部箱规记录 (顺序即外部存储返回顺序, 冲突裁决依赖该顺序)
    async fn all_boxes(&self) -> SourceResult<Vec<BoxRecord>>;
}

// ==========================================
// ResultSink Trait
// ==========================================
// 用途: 计算结果落库 (fire-and-forget)
// 失败语义: 非致命, 已计算的响应不回滚, 只影响 saved 计数
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// 写入一批结果行, 返回实际持久化的行数
    ///
    /// # 参数
    /// - market / interval_start / interval_end: 请求上下文
    /// - rows: 本批结果行, 长度不超过 SINK_BATCH
    async fn save_batch(
        &self,
        market: &str,
        interval_start: NaiveDate,
        interval_end: NaiveDate,
        rows: &[ForecastRow],
    ) -> SourceResult<usize>;
}

// ==========================================
// ForecastSources - 数据源集合
// ==========================================
// 聚合预测流程所需的全部数据源, 简化依赖注入,
// 便于测试时整体替换为内存实现。
#[derive(Clone)]
pub struct ForecastSources {
    /// 日销量计划源
    pub demand: Arc<dyn DemandSource>,
    /// 产品关联源
    pub links: Arc<dyn LinkSource>,
    /// 箱规源
    pub boxes: Arc<dyn BoxSource>,
    /// 结果落库
    pub sink: Arc<dyn ResultSink>,
}

impl ForecastSources {
    /// 创建新的数据源集合
    pub fn new(
        demand: Arc<dyn DemandSource>,
        links: Arc<dyn LinkSource>,
        boxes: Arc<dyn BoxSource>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            demand,
            links,
            boxes,
            sink,
        }
    }
}

// 注: trait 本身不含逻辑, 其契约由内存实现的单元测试与
// tests/ 下的集成测试共同验证。
