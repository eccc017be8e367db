// ==========================================
// 区间补货需求计算系统 - 需求聚合引擎
// ==========================================
// 职责: 把日销量计划记录按 Listing 折叠为区间净预测销量
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::DemandRecord;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use tracing::debug;

/// 聚合结果: Listing 引用 → 区间汇总预测销量
///
/// 键唯一, 迭代顺序无保证 (调用方在组装阶段显式排序)。
pub type AggregatedDemand = HashMap<String, f64>;

// ==========================================
// DemandAggregator
// ==========================================
pub struct DemandAggregator;

impl DemandAggregator {
    /// 含端结束日 → 排他结束日 (查询窗口为 [start, end + 1天))
    pub fn exclusive_end(end_inclusive: NaiveDate) -> NaiveDate {
        end_inclusive + Duration::days(1)
    }

    /// 聚合一批日销量计划记录
    ///
    /// # 规则
    /// 1. 记录的市场标签集合不含请求市场 → 整条排除
    /// 2. Listing 引用取首元素; 无法解析 → 跳过该记录
    /// 3. 计划销量缺失/非数值按 0 累加
    ///
    /// 加法满足交换律/结合律, 结果与记录顺序无关。
    /// 零条匹配记录产出空映射, 不是错误。
    pub fn aggregate(market: &str, records: &[DemandRecord]) -> AggregatedDemand {
        let mut aggregated: AggregatedDemand = HashMap::new();

        for record in records {
            if !record.matches_market(market) {
                continue;
            }
            let listing_id = match record.listing.first() {
                Some(id) => id,
                None => continue,
            };
            *aggregated.entry(listing_id.to_string()).or_insert(0.0) +=
                record.planned_units_or_zero();
        }

        debug!(
            market = %market,
            records = records.len(),
            listings = aggregated.len(),
            "需求聚合完成"
        );
        aggregated
    }
}
