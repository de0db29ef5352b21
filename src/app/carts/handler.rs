//! 购物车处理器

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use super::model::{Cart, CartLine, ListCartsQuery, QuantityRequest, ReplaceCartRequest};
use crate::app::AppState;
use crate::core::error::CoreError;
use crate::core::pagination::{Page, PageRequest, PagedResponse};
use crate::core::request::{parse_id, ValidatedBody};
use crate::core::response::ApiResponse;

#[derive(Serialize)]
struct CartView<'a> {
    cart: &'a Cart,
    lines: Vec<CartLine>,
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(|accept| accept.contains("application/json"))
        .unwrap_or(false)
}

pub async fn list_carts(
    State(state): State<AppState>,
    Query(query): Query<ListCartsQuery>,
) -> Result<Json<ApiResponse<Page<Cart>>>, CoreError> {
    let request = PageRequest::from_query(
        query.page.as_deref(),
        query.limit.as_deref(),
        state.catalog.default_page_limit,
        state.catalog.max_page_limit,
    );
    let page = state.carts.list(&request).await?;
    Ok(Json(ApiResponse::success(page)))
}

/// 默认渲染购物车页面，`Accept: application/json` 时返回 JSON
pub async fn get_cart(
    State(state): State<AppState>,
    Path(cid): Path<String>,
    headers: HeaderMap,
) -> Result<Response, CoreError> {
    let cart_id = parse_id(&cid, "cart")?;
    let cart = state.carts.get(cart_id).await?;

    if wants_json(&headers) {
        return Ok(Json(ApiResponse::success(cart)).into_response());
    }

    let lines = state.carts.describe(&cart).await?;
    let html = state.views.render("cart", &CartView { cart: &cart, lines })?;
    Ok(html.into_response())
}

pub async fn create_cart(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<Cart>>), CoreError> {
    let cart = state.carts.create().await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(cart))))
}

pub async fn upsert_item(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(String, String)>,
    ValidatedBody(payload): ValidatedBody<QuantityRequest>,
) -> Result<Json<ApiResponse<Cart>>, CoreError> {
    let cart_id = parse_id(&cid, "cart")?;
    let product_id = parse_id(&pid, "product")?;
    let cart = state
        .carts
        .upsert_item(cart_id, product_id, payload.quantity)
        .await?;
    Ok(Json(ApiResponse::success(cart)))
}

pub async fn set_item_quantity(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(String, String)>,
    ValidatedBody(payload): ValidatedBody<QuantityRequest>,
) -> Result<Json<ApiResponse<Cart>>, CoreError> {
    let cart_id = parse_id(&cid, "cart")?;
    let product_id = parse_id(&pid, "product")?;
    let cart = state
        .carts
        .set_item_quantity(cart_id, product_id, payload.quantity)
        .await?;
    Ok(Json(ApiResponse::success(cart)))
}

pub async fn remove_item(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Cart>>, CoreError> {
    let cart_id = parse_id(&cid, "cart")?;
    let product_id = parse_id(&pid, "product")?;
    let cart = state.carts.remove_item(cart_id, product_id).await?;
    Ok(Json(ApiResponse::success(cart)))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    Path(cid): Path<String>,
) -> Result<Json<ApiResponse<Cart>>, CoreError> {
    let cart_id = parse_id(&cid, "cart")?;
    let cart = state.carts.clear(cart_id).await?;
    Ok(Json(ApiResponse::success(cart)))
}

/// 请求体带 `products` 时先替换内容，随后总是返回该购物车的分页结果
pub async fn replace_cart(
    State(state): State<AppState>,
    Path(cid): Path<String>,
    body: Bytes,
) -> Result<Json<ApiResponse<PagedResponse<Cart>>>, CoreError> {
    let cart_id = parse_id(&cid, "cart")?;

    let request: ReplaceCartRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ReplaceCartRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| CoreError::BadRequest(format!("invalid cart body: {}", e)))?
    };

    if let Some(items) = request.products {
        state.carts.replace_items(cart_id, items).await?;
    }

    let page = state.carts.page_for(cart_id).await?;
    let response = PagedResponse::from_page(page, &PageRequest::default(), "/carts", &[]);
    Ok(Json(ApiResponse::success(response)))
}
