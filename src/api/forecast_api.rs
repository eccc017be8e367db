// ==========================================
// 区间补货需求计算系统 - 预测 API
// ==========================================
// 职责: 请求校验 → 编排计算 → 构造响应
// 红线: 校验失败立即返回, 不触发任何外部读取
// ==========================================

use crate::api::dto::{CalcRequest, CalcResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::engine::ForecastOrchestrator;
use crate::repository::ForecastSources;
use chrono::NaiveDate;
use tracing::info;

/// 解析 "YYYY-MM-DD" 日期参数
pub fn parse_date(value: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::Validation(format!("无效的日期格式: {}, 应为 YYYY-MM-DD", value))
    })
}

// ==========================================
// ForecastApi
// ==========================================
pub struct ForecastApi {
    orchestrator: ForecastOrchestrator,
}

impl ForecastApi {
    /// 创建新的 API 实例
    pub fn new(sources: ForecastSources) -> Self {
        Self {
            orchestrator: ForecastOrchestrator::new(sources),
        }
    }

    /// 计算区间补货需求 (聚合 + 装箱)
    ///
    /// # 校验
    /// - market 非空
    /// - 两个日期均为合法 "YYYY-MM-DD"
    /// - interval_end >= interval_start (均含端)
    ///
    /// # 返回
    /// - Ok(CalcResponse): 结果行 (order_qty 降序) + 合计 + 落库计数
    /// - Err(ApiError::Validation): 请求参数问题
    /// - Err(ApiError::External): 批量读取失败
    pub async fn calc_interval_demand(&self, req: &CalcRequest) -> ApiResult<CalcResponse> {
        if req.market.trim().is_empty() {
            return Err(ApiError::Validation("market 不能为空".to_string()));
        }
        let start = parse_date(&req.interval_start)?;
        let end = parse_date(&req.interval_end)?;
        if end < start {
            return Err(ApiError::Validation(
                "interval_end 必须不早于 interval_start".to_string(),
            ));
        }

        let outcome = self
            .orchestrator
            .run(
                &req.market,
                start,
                end,
                req.start_stock_mode,
                &req.start_stock,
            )
            .await?;

        info!(
            market = %req.market,
            listings = outcome.totals.listings,
            cartons = outcome.totals.cartons,
            errors = outcome.totals.errors,
            conflicts = outcome.conflicts.len(),
            saved = outcome.saved,
            "区间需求计算完成"
        );

        Ok(CalcResponse {
            market: req.market.clone(),
            interval_start: req.interval_start.clone(),
            interval_end: req.interval_end.clone(),
            rows: outcome.rows,
            totals: outcome.totals,
            saved: outcome.saved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_iso() {
        let date = parse_date("2026-04-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        for bad in ["01.04.2026", "2026/04/01", "2026-13-01", "not-a-date", ""] {
            let err = parse_date(bad).unwrap_err();
            match err {
                ApiError::Validation(msg) => assert!(msg.contains("YYYY-MM-DD")),
                _ => panic!("Expected Validation"),
            }
        }
    }
}
