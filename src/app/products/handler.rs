//! 商品处理器

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::model::{CreateProductRequest, ListProductsQuery, Product, UpdateProductRequest};
use crate::app::AppState;
use crate::core::error::CoreError;
use crate::core::pagination::{Page, PageRequest, Sort, SortOrder};
use crate::core::request::{parse_id, ValidatedBody};
use crate::core::response::ApiResponse;
use crate::infrastructure::config::CatalogConfig;
use crate::infrastructure::store::Filter;

#[derive(Debug, Serialize)]
pub struct DeletedProduct {
    pub id: Uuid,
}

/// 把查询参数转换为过滤条件和分页请求，API 与视图共用
pub(crate) fn catalog_query(
    query: &ListProductsQuery,
    catalog: &CatalogConfig,
) -> (Filter, PageRequest) {
    let request = PageRequest::from_query(
        query.page.as_deref(),
        query.limit.as_deref(),
        catalog.default_page_limit,
        catalog.max_page_limit,
    )
    .with_sort(SortOrder::from_query(query.sort.as_deref()).map(|order| Sort::new("price", order)));

    let filter = match (&query.category, catalog.category_filter) {
        (Some(category), true) => Filter::new().where_eq("category", category.clone()),
        (Some(category), false) => {
            debug!(%category, "category filter disabled, ignoring");
            Filter::new()
        }
        (None, _) => Filter::new(),
    };

    (filter, request)
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<ApiResponse<Page<Product>>>, CoreError> {
    let (filter, request) = catalog_query(&query, &state.catalog);
    let page = state.products.list(&filter, &request).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>, CoreError> {
    let id = parse_id(&id, "product")?;
    let product = state.products.get(id).await?;
    Ok(Json(ApiResponse::success(product)))
}

pub async fn create_product(
    State(state): State<AppState>,
    ValidatedBody(payload): ValidatedBody<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), CoreError> {
    let product = state.products.create(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(product))))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedBody(payload): ValidatedBody<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, CoreError> {
    let id = parse_id(&id, "product")?;
    let product = state.products.update(id, payload).await?;
    Ok(Json(ApiResponse::success(product)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedProduct>>, CoreError> {
    let id = parse_id(&id, "product")?;
    state.products.delete(id).await?;
    Ok(Json(ApiResponse::success(DeletedProduct { id })))
}
