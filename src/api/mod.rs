// ==========================================
// 区间补货需求计算系统 - API 层
// ==========================================
// 职责: 请求校验、计算编排入口、面向调用方的错误分级
// 红线: 传输无关 (HTTP 适配由外部承担), 不持跨请求状态
// ==========================================

pub mod dto;
pub mod error;
pub mod forecast_api;

// 重导出核心类型
pub use dto::{CalcRequest, CalcResponse};
pub use error::{ApiError, ApiResult};
pub use forecast_api::{parse_date, ForecastApi};
