//! 核心响应处理模块
//!
//! 所有 JSON 接口使用同一个信封：
//! 成功 `{"status": "success", "data": ...}`，失败 `{"status": "error", "error": {...}}`。

use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// API 响应结构
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub data: T,
    pub request_id: String,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            data,
            request_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub kind: &'static str,
    pub message: String,
}

/// 错误响应结构
#[derive(Serialize)]
pub struct ErrorResponse {
    pub status: ResponseStatus,
    pub error: ErrorBody,
    pub request_id: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(code: StatusCode, kind: &'static str, message: String) -> Self {
        Self {
            status: ResponseStatus::Error,
            error: ErrorBody {
                code: code.as_u16(),
                kind,
                message,
            },
            request_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
