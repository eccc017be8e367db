// ==========================================
// 区间补货需求计算系统 - API层错误类型
// ==========================================
// 职责: 定义请求级错误分级, 转换数据源层错误为面向调用方的错误
// 注: 行级失败 (PRODUCT_NOT_FOUND / BOX_NOT_FOUND) 是数据不是错误,
//     不在此分级内; 箱规映射冲突仅告警, 永不上抛
// ==========================================

use crate::config::ConfigError;
use crate::repository::SourceError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 请求参数错误 (调用方可修正) =====
    #[error("请求参数无效: {0}")]
    Validation(String),

    // ===== 服务端配置错误 =====
    #[error("配置缺失或无效: {0}")]
    Configuration(String),

    // ===== 外部数据源错误 (批量读取失败, 对请求致命) =====
    #[error("外部数据源错误: {0}")]
    External(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 对应的 HTTP 状态码 (传输层适配用)
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::Configuration(_) => 500,
            ApiError::External(_) => 502,
            ApiError::Internal(_) | ApiError::Other(_) => 500,
        }
    }
}

// 数据源层错误 → API层错误
impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Store(msg) => ApiError::External(msg),
            SourceError::Decode { record_id, message } => {
                ApiError::External(format!("记录解析失败 (record={}): {}", record_id, message))
            }
            SourceError::NotFound { entity, id } => {
                ApiError::External(format!("{}(id={})不存在", entity, id))
            }
            SourceError::Io(e) => ApiError::External(e.to_string()),
            SourceError::Internal(msg) => ApiError::Internal(msg),
            SourceError::Other(e) => ApiError::Other(e),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::Configuration(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Validation("bad".into()).status_code(), 400);
        assert_eq!(ApiError::Configuration("missing".into()).status_code(), 500);
        assert_eq!(ApiError::External("down".into()).status_code(), 502);
        assert_eq!(ApiError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_source_error_conversion() {
        let err: ApiError = SourceError::Store("连接超时".into()).into();
        match err {
            ApiError::External(msg) => assert!(msg.contains("连接超时")),
            _ => panic!("Expected External"),
        }

        let err: ApiError = SourceError::Decode {
            record_id: "r9".into(),
            message: "无效的日期值".into(),
        }
        .into();
        match err {
            ApiError::External(msg) => {
                assert!(msg.contains("r9"));
                assert!(msg.contains("无效的日期值"));
            }
            _ => panic!("Expected External"),
        }
    }

    #[test]
    fn test_config_error_conversion() {
        let err: ApiError = ConfigError::MissingKey {
            key: "STORE_FIELD_DATE".into(),
        }
        .into();
        match err {
            ApiError::Configuration(msg) => assert!(msg.contains("STORE_FIELD_DATE")),
            _ => panic!("Expected Configuration"),
        }
    }
}
