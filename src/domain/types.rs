// ==========================================
// 区间补货需求计算系统 - 领域类型定义
// ==========================================
// 职责: 定义行状态、错误原因、期初库存模式等枚举
// 序列化格式: SCREAMING_SNAKE_CASE (与外部存储/响应一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 行状态 (Row Status)
// ==========================================
// 红线: 行级失败不是请求级失败,ERROR 行只影响错误计数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowStatus {
    Ok,    // 装箱计算成功
    Error, // 无法解析箱规,行被排除出箱数合计
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowStatus::Ok => write!(f, "OK"),
            RowStatus::Error => write!(f, "ERROR"),
        }
    }
}

// ==========================================
// 错误原因 (Error Reason)
// ==========================================
// PRODUCT_NOT_FOUND: Listing 无产品关联 (解析链第一步即失败)
// BOX_NOT_FOUND: 产品已解析但没有任何箱规记录 (独立的失败模式)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorReason {
    ProductNotFound,
    BoxNotFound,
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorReason::ProductNotFound => write!(f, "PRODUCT_NOT_FOUND"),
            ErrorReason::BoxNotFound => write!(f, "BOX_NOT_FOUND"),
        }
    }
}

// ==========================================
// 期初库存模式 (Start Stock Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StartStockMode {
    Zero,   // 期初库存按 0 计
    Manual, // 按请求中的 start_stock 映射逐 Listing 指定
}

impl Default for StartStockMode {
    fn default() -> Self {
        StartStockMode::Zero
    }
}

impl fmt::Display for StartStockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartStockMode::Zero => write!(f, "ZERO"),
            StartStockMode::Manual => write!(f, "MANUAL"),
        }
    }
}
