//! 商品业务服务

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::model::{CreateProductRequest, Product, UpdateProductRequest};
use crate::core::error::CoreError;
use crate::core::pagination::{Page, PageRequest};
use crate::infrastructure::store::{Collection, Filter};

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn Collection<Product>>,
}

impl ProductService {
    pub fn new(products: Arc<dyn Collection<Product>>) -> Self {
        Self { products }
    }

    pub async fn list(
        &self,
        filter: &Filter,
        request: &PageRequest,
    ) -> Result<Page<Product>, CoreError> {
        Ok(self.products.find_page(filter, request).await?)
    }

    pub async fn all(&self) -> Result<Vec<Product>, CoreError> {
        Ok(self.products.find_all(&Filter::new()).await?)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Product>, CoreError> {
        Ok(self.products.find_by_id(id).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Product, CoreError> {
        self.find(id).await?.ok_or_else(|| {
            debug!(%id, "product lookup missed");
            not_found(id)
        })
    }

    pub async fn create(&self, req: CreateProductRequest) -> Result<Product, CoreError> {
        let product = self.products.insert(Product::from_request(req)).await?;
        info!(id = %product.id, code = %product.code, "product created");
        Ok(product)
    }

    pub async fn update(&self, id: Uuid, req: UpdateProductRequest) -> Result<Product, CoreError> {
        let mut product = self.get(id).await?;
        product.apply_update(req);

        if !self.products.replace(&product).await? {
            return Err(not_found(id));
        }
        info!(%id, "product updated");
        Ok(product)
    }

    /// 不级联到购物车，购物车中的引用可能悬空
    pub async fn delete(&self, id: Uuid) -> Result<(), CoreError> {
        if !self.products.delete(id).await? {
            return Err(not_found(id));
        }
        info!(%id, "product deleted");
        Ok(())
    }
}

fn not_found(id: Uuid) -> CoreError {
    CoreError::NotFound(format!("product {} not found", id))
}
