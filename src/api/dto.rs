// ==========================================
// 区间补货需求计算系统 - API 数据传输对象
// ==========================================
// 职责: 请求/响应形态定义 (传输无关, JSON 序列化)
// ==========================================

use crate::domain::{ForecastRow, StartStockMode, Totals};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// CalcRequest - 区间需求计算请求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalcRequest {
    /// 市场标签 (如 "USA")
    pub market: String,
    /// 区间起始日 "YYYY-MM-DD" (含)
    pub interval_start: String,
    /// 区间结束日 "YYYY-MM-DD" (含)
    pub interval_end: String,
    /// 期初库存模式 (缺省 ZERO)
    #[serde(default)]
    pub start_stock_mode: StartStockMode,
    /// MANUAL 模式下的逐 Listing 期初库存
    #[serde(default)]
    pub start_stock: HashMap<String, f64>,
}

impl CalcRequest {
    /// 最小请求便捷构造 (ZERO 模式)
    pub fn new(
        market: impl Into<String>,
        interval_start: impl Into<String>,
        interval_end: impl Into<String>,
    ) -> Self {
        CalcRequest {
            market: market.into(),
            interval_start: interval_start.into(),
            interval_end: interval_end.into(),
            start_stock_mode: StartStockMode::Zero,
            start_stock: HashMap::new(),
        }
    }
}

// ==========================================
// CalcResponse - 区间需求计算响应
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalcResponse {
    pub market: String,
    pub interval_start: String,
    pub interval_end: String,
    /// 按 order_qty 降序的结果行
    pub rows: Vec<ForecastRow>,
    /// 请求级合计
    pub totals: Totals,
    /// 实际落库的行数 (落库失败不影响响应本身)
    pub saved: usize,
}
