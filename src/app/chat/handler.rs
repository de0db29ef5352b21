//! 聊天处理器

use axum::{extract::State, http::StatusCode, response::Json};

use super::model::{Message, NewMessageRequest};
use crate::app::AppState;
use crate::core::error::CoreError;
use crate::core::request::ValidatedBody;
use crate::core::response::ApiResponse;

pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Message>>>, CoreError> {
    let messages = state.messages.list_all().await?;
    Ok(Json(ApiResponse::success(messages)))
}

pub async fn append_message(
    State(state): State<AppState>,
    ValidatedBody(payload): ValidatedBody<NewMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Message>>), CoreError> {
    let message = state.messages.append(payload.author, payload.text).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(message))))
}
