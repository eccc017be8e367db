// ==========================================
// 区间补货需求计算系统 - 配置层
// ==========================================
// 职责: 外部存储的表名/字段名配置
// 红线: 配置在进程启动时构造一次, 之后只读, 组件不得读环境全局
// ==========================================

pub mod source_config;

pub use source_config::{ConfigError, SourceConfig};
