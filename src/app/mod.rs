//! 应用层：状态、路由和各业务模块

pub mod carts;
pub mod chat;
pub mod products;
pub mod views;

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::core::middleware::request_logging_middleware;
use crate::core::response::ApiResponse;
use crate::infrastructure::config::CatalogConfig;
use crate::infrastructure::memory::MemoryCollection;
use crate::infrastructure::store::Collection;
use crate::infrastructure::views::ViewRenderer;
use carts::{Cart, CartService};
use chat::{Message, MessageService};
use products::{Product, ProductService};

/// 三个文档集合，启动时创建一次后注入各服务
pub struct Collections {
    pub products: Arc<dyn Collection<Product>>,
    pub carts: Arc<dyn Collection<Cart>>,
    pub messages: Arc<dyn Collection<Message>>,
}

impl Collections {
    pub fn in_memory() -> Self {
        Self {
            products: Arc::new(MemoryCollection::<Product>::new()),
            carts: Arc::new(MemoryCollection::<Cart>::new()),
            messages: Arc::new(MemoryCollection::<Message>::new()),
        }
    }

    #[cfg(feature = "database")]
    pub async fn postgres(
        db: &crate::infrastructure::database::DatabaseManager,
    ) -> Result<Self, sqlx::Error> {
        Ok(Self {
            products: Arc::new(db.collection::<Product>().await?),
            carts: Arc::new(db.collection::<Cart>().await?),
            messages: Arc::new(db.collection::<Message>().await?),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub carts: CartService,
    pub messages: MessageService,
    pub views: Arc<ViewRenderer>,
    pub catalog: CatalogConfig,
    backend: &'static str,
}

impl AppState {
    pub fn new(collections: Collections, catalog: CatalogConfig) -> Result<Self, tera::Error> {
        let backend = collections.products.backend();
        Ok(Self {
            products: ProductService::new(collections.products.clone()),
            carts: CartService::new(collections.carts, collections.products),
            messages: MessageService::new(collections.messages),
            views: Arc::new(ViewRenderer::new()?),
            catalog,
            backend,
        })
    }

    pub fn in_memory(catalog: CatalogConfig) -> Result<Self, tera::Error> {
        Self::new(Collections::in_memory(), catalog)
    }
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub backend: &'static str,
    pub version: &'static str,
}

async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<Health>> {
    Json(ApiResponse::success(Health {
        status: "healthy",
        backend: state.backend,
        version: env!("CARGO_PKG_VERSION"),
    }))
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        .route(
            "/products",
            get(products::handler::list_products).post(products::handler::create_product),
        )
        .route(
            "/products/:id",
            get(products::handler::get_product)
                .put(products::handler::update_product)
                .delete(products::handler::delete_product),
        )
        .route(
            "/carts",
            get(carts::handler::list_carts).post(carts::handler::create_cart),
        )
        .route(
            "/carts/:cid",
            get(carts::handler::get_cart)
                .put(carts::handler::replace_cart)
                .delete(carts::handler::clear_cart),
        )
        .route(
            "/carts/:cid/products/:pid",
            post(carts::handler::upsert_item)
                .put(carts::handler::set_item_quantity)
                .delete(carts::handler::remove_item),
        )
        .route(
            "/chat",
            get(chat::handler::list_messages).post(chat::handler::append_message),
        );

    let pages = Router::new()
        .route("/", get(views::home))
        .route("/views/products", get(views::products_page))
        .route("/views/realtimeproducts", get(views::real_time_products))
        .route("/views/chat", get(views::chat));

    api.merge(pages)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
