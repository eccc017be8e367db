// ==========================================
// 区间补货需求计算系统 - 数据源层
// ==========================================
// 职责: 外部存储的抽象查询接口与进程内实现
// 红线: 引擎层只依赖 trait, 不感知具体存储
// ==========================================

pub mod error;
pub mod file;
pub mod memory;
pub mod sources;

// 重导出核心类型
pub use error::{SourceError, SourceResult};
pub use file::FileSources;
pub use memory::{
    MemoryBoxSource, MemoryDemandSource, MemoryLinkSource, MemorySink, SavedForecast,
};
pub use sources::{
    BoxSource, DemandSource, ForecastSources, LinkSource, ResultSink, LINK_QUERY_CHUNK, SINK_BATCH,
};
