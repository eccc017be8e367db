// ==========================================
// 区间补货需求计算系统 - 核心库
// ==========================================
// 系统定位: 补货决策支持服务
// 核心: 需求聚合 + 箱规解析 + 装箱取整 + 结果组装
// 外部协作方: 远端记录存储 (仅经抽象查询接口消费)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据源层 - 外部存储抽象与进程内实现
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 表/字段名配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{ErrorReason, RowStatus, StartStockMode};

// 领域实体
pub use domain::{
    BoxRecord, DemandRecord, ForecastRow, LinkRecord, LinkedRefs, MappingConflict, Totals,
};

// 引擎
pub use engine::{
    BoxMap, BoxMapResolver, CartonizationEngine, DemandAggregator, ForecastOrchestrator,
    ForecastOutcome, ResultAssembler,
};

// 数据源
pub use repository::{
    BoxSource, DemandSource, ForecastSources, LinkSource, ResultSink, SourceError, SourceResult,
};

// API
pub use api::{ApiError, ApiResult, CalcRequest, CalcResponse, ForecastApi};

// 配置
pub use config::SourceConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "区间补货需求计算系统";
