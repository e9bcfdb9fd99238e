use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

// 统一的错误响应结构：{ "error": { "code", "message", "details"? } }
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/api.ts")]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/api.ts")]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
                details: Some(details),
            },
        }
    }
}

// 数据包装响应（管理后台使用）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/api.ts")]
pub struct DataResponse<T: TS> {
    pub data: T,
}

impl<T: TS> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// 仅包含提示信息的响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/api.ts")]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
