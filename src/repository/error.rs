// ==========================================
// 区间补货需求计算系统 - 数据源层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 数据源层错误类型
#[derive(Error, Debug)]
pub enum SourceError {
    // ===== 外部存储错误 =====
    #[error("外部数据源读取失败: {0}")]
    Store(String),

    #[error("记录解析失败 (record={record_id}): {message}")]
    Decode { record_id: String, message: String },

    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    // ===== 本地文件错误 =====
    #[error("文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Decode {
            record_id: "Unknown".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for SourceError {
    fn from(err: csv::Error) -> Self {
        SourceError::Decode {
            record_id: "Unknown".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result 类型别名
pub type SourceResult<T> = Result<T, SourceError>;
