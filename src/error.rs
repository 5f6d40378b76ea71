//! 统一错误类型
//!
//! 只有玩家解析失败是致命的；分支级错误在报告中以 `"error"` 标记呈现，
//! 不会以 `LookupError` 的形式返回给调用方。

use serde::Serialize;
use thiserror::Error;

use crate::api::ApiError;

/// 查询错误
#[derive(Error, Debug)]
pub enum LookupError {
    /// 找不到任何匹配的玩家
    #[error("Player not found: {0}")]
    NotFound(String),

    /// 配置无效
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// 上游 API 错误
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// 可序列化的错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// 供调用方分支处理的错误码
    pub code: String,
    pub message: String,
}

impl LookupError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Api(e) if e.is_transport() => "TRANSPORT_ERROR",
            Self::Api(_) => "MALFORMED_RESPONSE",
        }
    }
}

impl From<&LookupError> for ErrorResponse {
    fn from(err: &LookupError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl Serialize for LookupError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ErrorResponse::from(self).serialize(serializer)
    }
}
