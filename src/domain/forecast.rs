// ==========================================
// 区间补货需求计算系统 - 预测结果实体
// ==========================================
// 职责: 定义逐 Listing 结果行、合计、箱规映射冲突
// 不变量: status=OK 且 order_qty>0 时 cartons*units_per_carton == rounded_units
// 不变量: rounded_units >= order_qty (永不向下取整)
// ==========================================

use crate::domain::types::{ErrorReason, RowStatus};
use serde::{Deserialize, Serialize};

/// 按固定小数位做展示舍入 (只影响展示值, 不改变不变量)
pub fn round_dp(value: f64, dp: u32) -> f64 {
    let factor = 10f64.powi(dp as i32);
    (value * factor).round() / factor
}

// ==========================================
// ForecastRow - 逐 Listing 结果行
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRow {
    /// Listing 引用 ID
    pub listing_id: String,
    /// 区间内汇总的预测销量
    pub forecast_units: f64,
    /// 期初库存
    pub start_stock: f64,
    /// 净订货量 = max(0, forecast_units - start_stock)
    pub order_qty: f64,

    // ===== 装箱字段 (装箱引擎填充; ERROR 行全为 None) =====
    pub units_per_carton: Option<i64>,
    pub cartons: Option<i64>,
    pub rounded_units: Option<i64>,
    pub overstock_units: Option<f64>,
    pub overstock_pct: Option<f64>,

    /// 行状态
    pub status: RowStatus,
    /// 错误原因 (当且仅当 status=ERROR 时存在)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<ErrorReason>,
}

impl ForecastRow {
    /// 构造待装箱的结果行 (装箱字段留空, 状态暂记 OK)
    ///
    /// # 参数
    /// - listing_id: Listing 引用 ID
    /// - forecast_units: 区间汇总预测销量
    /// - start_stock: 期初库存
    ///
    /// 展示舍入: forecast/start/order 保留 2 位小数。
    pub fn pending(listing_id: impl Into<String>, forecast_units: f64, start_stock: f64) -> Self {
        let order_qty = (forecast_units - start_stock).max(0.0);
        ForecastRow {
            listing_id: listing_id.into(),
            forecast_units: round_dp(forecast_units, 2),
            start_stock: round_dp(start_stock, 2),
            order_qty: round_dp(order_qty, 2),
            units_per_carton: None,
            cartons: None,
            rounded_units: None,
            overstock_units: None,
            overstock_pct: None,
            status: RowStatus::Ok,
            error_reason: None,
        }
    }

    /// 行是否装箱成功
    pub fn is_ok(&self) -> bool {
        self.status == RowStatus::Ok
    }
}

// ==========================================
// Totals - 请求级合计
// ==========================================
// 箱数/取整件数/超额件数只累计 OK 行;
// forecast_units/order_qty 累计全部行; errors 计 ERROR 行数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub listings: usize,
    pub forecast_units: f64,
    pub order_qty: f64,
    pub cartons: i64,
    pub rounded_units: i64,
    pub overstock_units: f64,
    pub errors: usize,
}

// ==========================================
// MappingConflict - 箱规映射冲突 (仅告警)
// ==========================================
// 首个绑定值保留, 后续不同值被拒绝并记录, 永不致命。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConflict {
    /// 冲突的产品引用 ID
    pub product_id: String,
    /// 保留的首个每箱件数
    pub kept: i64,
    /// 被拒绝的冲突值
    pub rejected: i64,
}
