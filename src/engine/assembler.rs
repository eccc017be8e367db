// ==========================================
// 区间补货需求计算系统 - 结果组装器
// ==========================================
// 职责: 结果行排序与请求级合计
// 红线: 纯折叠, 同一行列表重复组装结果必须一致 (幂等)
// ==========================================

use crate::domain::{round_dp, ForecastRow, Totals};

// ==========================================
// ResultAssembler
// ==========================================
pub struct ResultAssembler;

impl ResultAssembler {
    /// 组装结果: 按 order_qty 降序稳定排序并计算合计
    ///
    /// # 合计规则
    /// - cartons / rounded_units / overstock_units 只累计 OK 行
    /// - forecast_units / order_qty 累计全部行
    /// - errors 为 ERROR 行数
    pub fn assemble(mut rows: Vec<ForecastRow>) -> (Vec<ForecastRow>, Totals) {
        // 稳定排序: 同 order_qty 保持原相对顺序
        rows.sort_by(|a, b| b.order_qty.total_cmp(&a.order_qty));
        let totals = Self::totals(&rows);
        (rows, totals)
    }

    /// 对已排序 (或任意顺序) 的行列表做合计折叠
    pub fn totals(rows: &[ForecastRow]) -> Totals {
        let mut forecast_units = 0.0;
        let mut order_qty = 0.0;
        let mut cartons = 0i64;
        let mut rounded_units = 0i64;
        let mut overstock_units = 0.0;
        let mut errors = 0usize;

        for row in rows {
            forecast_units += row.forecast_units;
            order_qty += row.order_qty;
            if row.is_ok() {
                cartons += row.cartons.unwrap_or(0);
                rounded_units += row.rounded_units.unwrap_or(0);
                overstock_units += row.overstock_units.unwrap_or(0.0);
            } else {
                errors += 1;
            }
        }

        Totals {
            listings: rows.len(),
            forecast_units: round_dp(forecast_units, 2),
            order_qty: round_dp(order_qty, 2),
            cartons,
            rounded_units,
            overstock_units: round_dp(overstock_units, 4),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorReason, RowStatus};

    fn ok_row(listing: &str, order: f64, cartons: i64, units: i64) -> ForecastRow {
        let mut row = ForecastRow::pending(listing, order, 0.0);
        row.units_per_carton = Some(units);
        row.cartons = Some(cartons);
        row.rounded_units = Some(cartons * units);
        row.overstock_units = Some(cartons as f64 * units as f64 - order);
        row.overstock_pct = Some(0.0);
        row
    }

    fn error_row(listing: &str, order: f64) -> ForecastRow {
        let mut row = ForecastRow::pending(listing, order, 0.0);
        row.status = RowStatus::Error;
        row.error_reason = Some(ErrorReason::BoxNotFound);
        row
    }

    #[test]
    fn test_sort_descending_by_order_qty() {
        let rows = vec![
            ok_row("L1", 5.0, 1, 18),
            ok_row("L2", 40.0, 3, 18),
            ok_row("L3", 20.0, 2, 18),
        ];
        let (sorted, _) = ResultAssembler::assemble(rows);
        let ids: Vec<_> = sorted.iter().map(|r| r.listing_id.as_str()).collect();
        assert_eq!(ids, vec!["L2", "L3", "L1"]);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let rows = vec![
            ok_row("first", 10.0, 1, 18),
            ok_row("second", 10.0, 1, 18),
            ok_row("third", 10.0, 1, 18),
        ];
        let (sorted, _) = ResultAssembler::assemble(rows);
        let ids: Vec<_> = sorted.iter().map(|r| r.listing_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_totals_exclude_error_rows_from_carton_sums() {
        let rows = vec![ok_row("L1", 25.0, 2, 18), error_row("L2", 30.0)];
        let (_, totals) = ResultAssembler::assemble(rows);

        assert_eq!(totals.listings, 2);
        // forecast/order 累计全部行
        assert_eq!(totals.forecast_units, 55.0);
        assert_eq!(totals.order_qty, 55.0);
        // 箱数合计只含 OK 行
        assert_eq!(totals.cartons, 2);
        assert_eq!(totals.rounded_units, 36);
        assert_eq!(totals.overstock_units, 11.0);
        assert_eq!(totals.errors, 1);
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let rows = vec![
            ok_row("L1", 25.0, 2, 18),
            ok_row("L2", 5.0, 1, 6),
            error_row("L3", 9.0),
        ];
        let (sorted_once, totals_once) = ResultAssembler::assemble(rows);
        let (sorted_twice, totals_twice) = ResultAssembler::assemble(sorted_once.clone());

        assert_eq!(totals_once, totals_twice);
        let ids_once: Vec<_> = sorted_once.iter().map(|r| r.listing_id.clone()).collect();
        let ids_twice: Vec<_> = sorted_twice.iter().map(|r| r.listing_id.clone()).collect();
        assert_eq!(ids_once, ids_twice);
    }

    #[test]
    fn test_empty_rows_yield_zero_totals() {
        let (rows, totals) = ResultAssembler::assemble(Vec::new());
        assert!(rows.is_empty());
        assert_eq!(totals.listings, 0);
        assert_eq!(totals.cartons, 0);
        assert_eq!(totals.errors, 0);
    }
}
