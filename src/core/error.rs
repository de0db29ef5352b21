//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use super::response::ErrorResponse;
use crate::infrastructure::store::StoreError;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) | CoreError::Store(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::BadRequest(_) => "BAD_REQUEST",
            CoreError::NotFound(_) => "NOT_FOUND",
            CoreError::Store(_) => "STORE_ERROR",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 返回给客户端的消息，存储层细节只写日志
    fn public_message(&self) -> String {
        match self {
            CoreError::Store(_) => "store operation failed".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            CoreError::Store(e) => error!(error = %e, "store failure"),
            CoreError::Internal(msg) => error!(error = %msg, "internal failure"),
            CoreError::BadRequest(msg) => warn!(error = %msg, "rejected request"),
            CoreError::NotFound(_) => {}
        }

        let body = ErrorResponse::new(status, self.kind(), self.public_message());
        (status, axum::Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| match &error.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: invalid value", field),
                })
            })
            .collect();
        messages.sort();

        CoreError::BadRequest(messages.join(", "))
    }
}

impl From<tera::Error> for CoreError {
    fn from(err: tera::Error) -> Self {
        CoreError::Internal(format!("view rendering failed: {}", err))
    }
}
