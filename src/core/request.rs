//! 请求解析辅助
//!
//! 路径 id 和请求体在这里解析，失败时统一返回 `CoreError::BadRequest`，
//! 而不是框架默认的纯文本拒绝响应。

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header,
    Form, Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use super::error::CoreError;

/// 解析路径中的文档 id
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| CoreError::BadRequest(format!("malformed {} id: {}", what, raw)))
}

/// 先反序列化再执行 `validator` 校验的请求体提取器
///
/// 表单编码的请求体（视图页面的表单提交）按 `Form` 解析，其余按 JSON 解析。
#[derive(Debug, Clone)]
pub struct ValidatedBody<T>(pub T);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedBody<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = CoreError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| CoreError::BadRequest(rejection.body_text()))?;
            value
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| CoreError::BadRequest(rejection.body_text()))?;
            value
        };
        value.validate()?;
        Ok(ValidatedBody(value))
    }
}
