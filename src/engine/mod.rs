// ==========================================
// 区间补货需求计算系统 - 引擎层
// ==========================================
// 职责: 实现需求聚合、箱规解析、装箱、组装的业务规则
// 红线: 引擎为纯逻辑, 只有编排器接触数据源 trait
// ==========================================

pub mod aggregator;
pub mod assembler;
pub mod box_map;
pub mod cartonize;
pub mod orchestrator;

// 重导出核心引擎
pub use aggregator::{AggregatedDemand, DemandAggregator};
pub use assembler::ResultAssembler;
pub use box_map::{BoxMap, BoxMapResolver};
pub use cartonize::CartonizationEngine;
pub use orchestrator::{ForecastOrchestrator, ForecastOutcome};
