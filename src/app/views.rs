//! HTML 视图处理器

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Serialize;

use crate::app::chat::Message;
use crate::app::products::{handler::catalog_query, model::ListProductsQuery, Product};
use crate::app::AppState;
use crate::core::error::CoreError;
use crate::core::pagination::PagedResponse;

#[derive(Serialize)]
struct ProductList {
    products: Vec<Product>,
}

#[derive(Serialize)]
struct ProductPage {
    page: PagedResponse<Product>,
}

#[derive(Serialize)]
struct ChatView {
    messages: Vec<Message>,
}

pub async fn home(State(state): State<AppState>) -> Result<Html<String>, CoreError> {
    let products = state.products.all().await?;
    state.views.render("home", &ProductList { products })
}

pub async fn products_page(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Html<String>, CoreError> {
    let (filter, request) = catalog_query(&query, &state.catalog);
    let page = state.products.list(&filter, &request).await?;

    // 只有生效的过滤条件才带进翻页链接
    let category = query.category.as_deref().filter(|_| !filter.is_empty());
    let extra: Vec<(&str, &str)> = category.map(|c| ("category", c)).into_iter().collect();

    let page = PagedResponse::from_page(page, &request, "/views/products", &extra);
    state.views.render("products", &ProductPage { page })
}

pub async fn real_time_products(State(state): State<AppState>) -> Result<Html<String>, CoreError> {
    let products = state.products.all().await?;
    state.views.render("real_time_products", &ProductList { products })
}

pub async fn chat(State(state): State<AppState>) -> Result<Html<String>, CoreError> {
    let messages = state.messages.list_all().await?;
    state.views.render("chat", &ChatView { messages })
}
