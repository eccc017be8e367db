// ==========================================
// 区间补货需求计算系统 - 箱规映射解析器
// ==========================================
// 职责: 由产品关联与箱规记录构建 Listing → 每箱件数查找表
// 红线: 冲突裁决 first-wins, 拒绝覆写但必须记录被拒值, 永不致命
// ==========================================

use crate::domain::{BoxRecord, LinkRecord, MappingConflict};
use std::collections::HashMap;
use tracing::warn;

// ==========================================
// BoxMap - 解析结果
// ==========================================
// 同时保留 listing → 产品 与 listing → 每箱件数 两层映射,
// 装箱引擎据此区分 PRODUCT_NOT_FOUND 与 BOX_NOT_FOUND。
#[derive(Debug, Clone, Default)]
pub struct BoxMap {
    listing_units: HashMap<String, i64>,
    listing_product: HashMap<String, String>,
    conflicts: Vec<MappingConflict>,
}

impl BoxMap {
    /// Listing 的每箱件数; 无箱规 → None
    pub fn units_for(&self, listing_id: &str) -> Option<i64> {
        self.listing_units.get(listing_id).copied()
    }

    /// Listing 解析到的产品引用; 无产品关联 → None
    pub fn product_for(&self, listing_id: &str) -> Option<&str> {
        self.listing_product.get(listing_id).map(|s| s.as_str())
    }

    /// 解析出每箱件数的 Listing 数
    pub fn len(&self) -> usize {
        self.listing_units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listing_units.is_empty()
    }

    /// 冲突列表 (仅告警, 顺序跟随箱规记录输入顺序)
    pub fn conflicts(&self) -> &[MappingConflict] {
        &self.conflicts
    }
}

// ==========================================
// BoxMapResolver
// ==========================================
pub struct BoxMapResolver;

impl BoxMapResolver {
    /// 解析 Listing → 每箱件数映射
    ///
    /// # 规则
    /// 1. 扫描箱规记录: 每箱件数为正整数的记录, 把该值绑定到其
    ///    关联的每个产品引用上; 产品已绑定不同值 → 记录冲突,
    ///    保留首个绑定值 (first-wins, 非致命)
    /// 2. 沿 listing → 产品 → 每箱件数 建立最终映射;
    ///    无产品关联或产品无箱规 → 不产生条目 (缺席, 不是 0)
    ///
    /// 纯函数: 相同输入总是产出相同映射与冲突列表。
    pub fn resolve(links: &HashMap<String, LinkRecord>, boxes: &[BoxRecord]) -> BoxMap {
        // 第一层: 产品 → 每箱件数
        let mut product_units: HashMap<String, i64> = HashMap::new();
        let mut conflicts: Vec<MappingConflict> = Vec::new();

        for box_record in boxes {
            let units = match box_record.units_per_carton {
                Some(u) if u > 0 => u,
                _ => continue,
            };
            for product_id in box_record.products.iter() {
                match product_units.get(product_id) {
                    Some(&kept) if kept != units => {
                        conflicts.push(MappingConflict {
                            product_id: product_id.to_string(),
                            kept,
                            rejected: units,
                        });
                    }
                    Some(_) => {}
                    None => {
                        product_units.insert(product_id.to_string(), units);
                    }
                }
            }
        }

        // 第二层: listing → 产品 → 每箱件数
        let mut listing_units: HashMap<String, i64> = HashMap::new();
        let mut listing_product: HashMap<String, String> = HashMap::new();

        for (listing_id, link) in links {
            let product_id = match link.product.first() {
                Some(id) => id,
                None => continue,
            };
            listing_product.insert(listing_id.clone(), product_id.to_string());
            if let Some(&units) = product_units.get(product_id) {
                listing_units.insert(listing_id.clone(), units);
            }
        }

        if !conflicts.is_empty() {
            warn!(
                count = conflicts.len(),
                sample = ?&conflicts[..conflicts.len().min(5)],
                "箱规映射冲突, 保留首个绑定值"
            );
        }

        BoxMap {
            listing_units,
            listing_product,
            conflicts,
        }
    }
}
