// ==========================================
// 区间补货需求计算系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod forecast;
pub mod record;
pub mod types;

// 重导出核心类型
pub use forecast::{round_dp, ForecastRow, MappingConflict, Totals};
pub use record::{coerce_units, BoxRecord, DemandRecord, LinkRecord, LinkedRefs};
pub use types::{ErrorReason, RowStatus, StartStockMode};
