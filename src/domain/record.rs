// ==========================================
// 区间补货需求计算系统 - 外部记录实体
// ==========================================
// 职责: 定义外部存储的只读记录形态与关联字段归一化
// 红线: 关联字段只能通过 LinkedRefs 消费,禁止在调用点按类型分支
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ==========================================
// LinkedRefs - 关联记录引用归一化
// ==========================================
// 外部存储的关联字段可能返回标量或列表。统一归一化为
// 定长序列,消费方式只有一种: 取首元素或判空。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkedRefs(Vec<String>);

impl LinkedRefs {
    /// 从引用列表构造
    pub fn new(refs: Vec<String>) -> Self {
        LinkedRefs(refs)
    }

    /// 单引用便捷构造
    pub fn one(id: impl Into<String>) -> Self {
        LinkedRefs(vec![id.into()])
    }

    /// 空引用
    pub fn none() -> Self {
        LinkedRefs(Vec::new())
    }

    /// 从 JSON 字段值归一化: 标量 → 单元素, 列表 → 逐元素, 其他 → 空
    ///
    /// 列表元素中非字符串项被丢弃 (外部存储不应出现,防御性处理)。
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) if !s.trim().is_empty() => LinkedRefs(vec![s.trim().to_string()]),
            Value::Array(items) => LinkedRefs(
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
            _ => LinkedRefs::none(),
        }
    }

    /// 取首引用 (唯一合法的取值方式)
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(|s| s.as_str())
    }

    /// 是否为空引用
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 全部引用 (仅供箱规记录按"关联的全部产品"展开使用)
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    /// 引用数量
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'de> Deserialize<'de> for LinkedRefs {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(LinkedRefs::from_value(&value))
    }
}

// ==========================================
// 数值强制转换
// ==========================================

/// 把外部存储字段值强转为数值: 数字/可解析字符串 → Some, 缺失或非数值 → None
///
/// 聚合时 None 按 0 计 (缺失的计划销量不是错误)。
pub fn coerce_units(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

// ==========================================
// DemandRecord - 日销量计划记录 (只读)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandRecord {
    /// 外部存储记录 ID
    pub record_id: String,
    /// 计划日期
    pub date: NaiveDate,
    /// 市场标签集合 (lookup 字段, 可能多值)
    pub markets: Vec<String>,
    /// 关联的 Listing 引用 (标量或列表, 已归一化)
    pub listing: LinkedRefs,
    /// 计划销量 (缺失或非数值 → None, 聚合按 0 计)
    pub planned_units: Option<f64>,
}

impl DemandRecord {
    /// 市场标签集合是否包含请求的市场
    pub fn matches_market(&self, market: &str) -> bool {
        self.markets.iter().any(|m| m == market)
    }

    /// 计划销量, 缺失按 0 计
    pub fn planned_units_or_zero(&self) -> f64 {
        self.planned_units.unwrap_or(0.0)
    }
}

// ==========================================
// LinkRecord - Listing → 产品关联记录 (只读)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Listing 引用 ID
    pub listing_id: String,
    /// 关联的产品引用 (零或一个有效, 取首元素)
    pub product: LinkedRefs,
}

// ==========================================
// BoxRecord - 箱规记录 (只读)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxRecord {
    /// 箱规记录 ID
    pub box_id: String,
    /// 每箱件数 (期望正整数; 非正或缺失的记录被跳过)
    pub units_per_carton: Option<i64>,
    /// 该箱规适用的产品引用集合 (全部展开, 不取首)
    pub products: LinkedRefs,
}
