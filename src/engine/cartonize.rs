// ==========================================
// 区间补货需求计算系统 - 装箱引擎
// ==========================================
// 职责: 把净订货量换算为整箱数, 输出超额指标与错误分类
// 红线: 永不向下取整 (欠订不可接受); 逐行纯变换, 无副作用
// ==========================================

use crate::domain::{round_dp, ErrorReason, ForecastRow, RowStatus};
use crate::engine::box_map::BoxMap;

// ==========================================
// CartonizationEngine
// ==========================================
pub struct CartonizationEngine;

impl CartonizationEngine {
    /// 对一行做装箱计算
    ///
    /// # 规则
    /// 1. Listing 无产品关联 → ERROR/PRODUCT_NOT_FOUND;
    ///    产品已解析但无箱规 → ERROR/BOX_NOT_FOUND (两种独立失败模式)
    /// 2. order_qty <= 0 → OK, 零箱零件零超额 (非正需求不是错误)
    /// 3. 其余: cartons = ceil(order_qty / units_per_carton),
    ///    rounded_units = cartons * units_per_carton,
    ///    overstock_units = rounded_units - order_qty,
    ///    overstock_pct = overstock_units / order_qty
    ///
    /// 展示舍入: 超额件数 4 位小数, 超额占比 6 位小数;
    /// 舍入不破坏 rounded_units >= order_qty。
    pub fn cartonize(mut row: ForecastRow, box_map: &BoxMap) -> ForecastRow {
        let units_per_carton = match box_map.units_for(&row.listing_id) {
            Some(u) => u,
            None => {
                let reason = if box_map.product_for(&row.listing_id).is_none() {
                    ErrorReason::ProductNotFound
                } else {
                    ErrorReason::BoxNotFound
                };
                row.units_per_carton = None;
                row.cartons = None;
                row.rounded_units = None;
                row.overstock_units = None;
                row.overstock_pct = None;
                row.status = RowStatus::Error;
                row.error_reason = Some(reason);
                return row;
            }
        };

        row.units_per_carton = Some(units_per_carton);
        row.status = RowStatus::Ok;
        row.error_reason = None;

        if row.order_qty <= 0.0 {
            row.cartons = Some(0);
            row.rounded_units = Some(0);
            row.overstock_units = Some(0.0);
            row.overstock_pct = Some(0.0);
            return row;
        }

        let cartons = (row.order_qty / units_per_carton as f64).ceil() as i64;
        let rounded_units = cartons * units_per_carton;
        let overstock_units = rounded_units as f64 - row.order_qty;
        let overstock_pct = overstock_units / row.order_qty;

        row.cartons = Some(cartons);
        row.rounded_units = Some(rounded_units);
        row.overstock_units = Some(round_dp(overstock_units, 4));
        row.overstock_pct = Some(round_dp(overstock_pct, 6));
        row
    }

    /// 对整批行做装箱计算
    pub fn cartonize_rows(rows: Vec<ForecastRow>, box_map: &BoxMap) -> Vec<ForecastRow> {
        rows.into_iter()
            .map(|row| Self::cartonize(row, box_map))
            .collect()
    }
}
