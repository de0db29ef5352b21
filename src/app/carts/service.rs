//! 购物车业务服务
//!
//! 所有明细操作都是“读取购物车、内存中修改、整份写回”，
//! 同一购物车上的并发写入之间不加锁，最后写回的一方生效。

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::model::{Cart, CartLine, LineItem};
use crate::app::products::Product;
use crate::core::error::CoreError;
use crate::core::pagination::{Page, PageRequest};
use crate::infrastructure::store::{Collection, Filter};

#[derive(Clone)]
pub struct CartService {
    carts: Arc<dyn Collection<Cart>>,
    products: Arc<dyn Collection<Product>>,
}

impl CartService {
    pub fn new(carts: Arc<dyn Collection<Cart>>, products: Arc<dyn Collection<Product>>) -> Self {
        Self { carts, products }
    }

    pub async fn create(&self) -> Result<Cart, CoreError> {
        let cart = self.carts.insert(Cart::new()).await?;
        info!(id = %cart.id, "cart created");
        Ok(cart)
    }

    pub async fn get(&self, id: Uuid) -> Result<Cart, CoreError> {
        self.carts.find_by_id(id).await?.ok_or_else(|| {
            debug!(%id, "cart lookup missed");
            cart_not_found(id)
        })
    }

    pub async fn list(&self, request: &PageRequest) -> Result<Page<Cart>, CoreError> {
        Ok(self.carts.find_page(&Filter::new(), request).await?)
    }

    /// 单个购物车的分页重新查询（第 1 页，每页 10 条）
    pub async fn page_for(&self, id: Uuid) -> Result<Page<Cart>, CoreError> {
        let page = self
            .carts
            .find_page(&Filter::by_id(id), &PageRequest::default())
            .await?;
        if page.docs.is_empty() {
            return Err(cart_not_found(id));
        }
        Ok(page)
    }

    pub async fn upsert_item(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<Cart, CoreError> {
        ensure_positive(quantity)?;
        let mut cart = self.get(cart_id).await?;
        self.ensure_product(product_id).await?;

        cart.upsert_item(product_id, quantity);
        self.persist(&cart).await?;
        info!(cart = %cart_id, product = %product_id, quantity, "cart item upserted");
        Ok(cart)
    }

    pub async fn set_item_quantity(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<Cart, CoreError> {
        ensure_positive(quantity)?;
        let mut cart = self.get(cart_id).await?;
        self.ensure_product(product_id).await?;

        if !cart.set_item_quantity(product_id, quantity) {
            return Err(CoreError::NotFound(format!(
                "product {} is not in cart {}",
                product_id, cart_id
            )));
        }
        self.persist(&cart).await?;
        info!(cart = %cart_id, product = %product_id, quantity, "cart item quantity set");
        Ok(cart)
    }

    /// 商品不在购物车中时什么也不做
    pub async fn remove_item(&self, cart_id: Uuid, product_id: Uuid) -> Result<Cart, CoreError> {
        let mut cart = self.get(cart_id).await?;
        if cart.remove_item(product_id) {
            self.persist(&cart).await?;
            info!(cart = %cart_id, product = %product_id, "cart item removed");
        } else {
            debug!(cart = %cart_id, product = %product_id, "cart item absent, nothing removed");
        }
        Ok(cart)
    }

    pub async fn clear(&self, cart_id: Uuid) -> Result<Cart, CoreError> {
        let mut cart = self.get(cart_id).await?;
        cart.clear();
        self.persist(&cart).await?;
        info!(cart = %cart_id, "cart cleared");
        Ok(cart)
    }

    /// 整体替换购物车内容；任一商品不存在时购物车保持不变
    pub async fn replace_items(
        &self,
        cart_id: Uuid,
        items: Vec<LineItem>,
    ) -> Result<Cart, CoreError> {
        for item in &items {
            ensure_positive(item.quantity)?;
        }
        let mut cart = self.get(cart_id).await?;
        for item in &items {
            self.ensure_product(item.product_id).await?;
        }

        cart.replace_items(items);
        self.persist(&cart).await?;
        info!(cart = %cart_id, items = cart.products.len(), "cart contents replaced");
        Ok(cart)
    }

    /// 为视图解析每条明细对应的商品
    pub async fn describe(&self, cart: &Cart) -> Result<Vec<CartLine>, CoreError> {
        let mut lines = Vec::with_capacity(cart.products.len());
        for item in &cart.products {
            let product = self.products.find_by_id(item.product_id).await?;
            if product.is_none() {
                warn!(cart = %cart.id, product = %item.product_id, "dangling product reference");
            }
            lines.push(CartLine {
                product_id: item.product_id,
                quantity: item.quantity,
                product,
            });
        }
        Ok(lines)
    }

    async fn ensure_product(&self, product_id: Uuid) -> Result<(), CoreError> {
        match self.products.find_by_id(product_id).await? {
            Some(_) => Ok(()),
            None => Err(CoreError::NotFound(format!("product {} not found", product_id))),
        }
    }

    async fn persist(&self, cart: &Cart) -> Result<(), CoreError> {
        if !self.carts.replace(cart).await? {
            // 读取之后被并发删除
            return Err(cart_not_found(cart.id));
        }
        Ok(())
    }
}

fn ensure_positive(quantity: u32) -> Result<(), CoreError> {
    if quantity == 0 {
        return Err(CoreError::BadRequest("quantity must be a positive integer".to_string()));
    }
    Ok(())
}

fn cart_not_found(id: Uuid) -> CoreError {
    CoreError::NotFound(format!("cart {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryCollection;

    struct Fixture {
        carts: CartService,
        products: Arc<MemoryCollection<Product>>,
    }

    fn fixture() -> Fixture {
        let products = Arc::new(MemoryCollection::<Product>::new());
        let carts = CartService::new(Arc::new(MemoryCollection::<Cart>::new()), products.clone());
        Fixture { carts, products }
    }

    async fn product(fx: &Fixture, title: &str) -> Uuid {
        let product = Product {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            category: "misc".to_string(),
            code: title.to_uppercase(),
            price: 1.0,
            stock: 10,
            status: true,
        };
        fx.products.insert(product).await.unwrap().id
    }

    fn item(product_id: Uuid, quantity: u32) -> LineItem {
        LineItem {
            product_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn upserts_keep_insertion_order() {
        let fx = fixture();
        let (a, b) = (product(&fx, "a").await, product(&fx, "b").await);
        let cart = fx.carts.create().await.unwrap();

        fx.carts.upsert_item(cart.id, a, 2).await.unwrap();
        fx.carts.upsert_item(cart.id, b, 1).await.unwrap();

        let stored = fx.carts.get(cart.id).await.unwrap();
        assert_eq!(stored.products, vec![item(a, 2), item(b, 1)]);
    }

    #[tokio::test]
    async fn upsert_overwrites_quantity() {
        let fx = fixture();
        let a = product(&fx, "a").await;
        let cart = fx.carts.create().await.unwrap();

        fx.carts.upsert_item(cart.id, a, 3).await.unwrap();
        fx.carts.upsert_item(cart.id, a, 5).await.unwrap();

        let stored = fx.carts.get(cart.id).await.unwrap();
        assert_eq!(stored.products, vec![item(a, 5)]);
    }

    #[tokio::test]
    async fn upsert_of_unknown_product_leaves_cart_unchanged() {
        let fx = fixture();
        let a = product(&fx, "a").await;
        let cart = fx.carts.create().await.unwrap();
        fx.carts.upsert_item(cart.id, a, 1).await.unwrap();

        let err = fx.carts.upsert_item(cart.id, Uuid::new_v4(), 1).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(msg) if msg.starts_with("product")));
        assert_eq!(fx.carts.get(cart.id).await.unwrap().products, vec![item(a, 1)]);
    }

    #[tokio::test]
    async fn upsert_into_unknown_cart_fails_first() {
        let fx = fixture();
        let err = fx.carts.upsert_item(Uuid::new_v4(), Uuid::new_v4(), 1).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(msg) if msg.starts_with("cart")));
    }

    #[tokio::test]
    async fn set_quantity_does_not_create_items() {
        let fx = fixture();
        let a = product(&fx, "a").await;
        let cart = fx.carts.create().await.unwrap();

        let err = fx.carts.set_item_quantity(cart.id, a, 4).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(msg) if msg.contains("is not in cart")));
        assert!(fx.carts.get(cart.id).await.unwrap().products.is_empty());

        fx.carts.upsert_item(cart.id, a, 1).await.unwrap();
        let updated = fx.carts.set_item_quantity(cart.id, a, 4).await.unwrap();
        assert_eq!(updated.products, vec![item(a, 4)]);
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() {
        let fx = fixture();
        let a = product(&fx, "a").await;
        let cart = fx.carts.create().await.unwrap();
        assert!(matches!(
            fx.carts.upsert_item(cart.id, a, 0).await,
            Err(CoreError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn remove_absent_item_is_a_no_op() {
        let fx = fixture();
        let (a, b) = (product(&fx, "a").await, product(&fx, "b").await);
        let cart = fx.carts.create().await.unwrap();
        fx.carts.upsert_item(cart.id, a, 2).await.unwrap();

        let after = fx.carts.remove_item(cart.id, b).await.unwrap();
        assert_eq!(after.products, vec![item(a, 2)]);

        let after = fx.carts.remove_item(cart.id, a).await.unwrap();
        assert!(after.products.is_empty());

        assert!(matches!(
            fx.carts.remove_item(Uuid::new_v4(), a).await,
            Err(CoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn clear_empties_products() {
        let fx = fixture();
        let a = product(&fx, "a").await;
        let cart = fx.carts.create().await.unwrap();
        fx.carts.upsert_item(cart.id, a, 2).await.unwrap();

        let cleared = fx.carts.clear(cart.id).await.unwrap();
        assert_eq!(cleared.id, cart.id);
        assert!(fx.carts.get(cart.id).await.unwrap().products.is_empty());
    }

    #[tokio::test]
    async fn replace_validates_every_product() {
        let fx = fixture();
        let (a, b) = (product(&fx, "a").await, product(&fx, "b").await);
        let cart = fx.carts.create().await.unwrap();
        fx.carts.upsert_item(cart.id, a, 1).await.unwrap();

        let err = fx
            .carts
            .replace_items(cart.id, vec![item(b, 1), item(Uuid::new_v4(), 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
        assert_eq!(fx.carts.get(cart.id).await.unwrap().products, vec![item(a, 1)]);

        let replaced = fx
            .carts
            .replace_items(cart.id, vec![item(b, 3), item(a, 2)])
            .await
            .unwrap();
        assert_eq!(replaced.products, vec![item(b, 3), item(a, 2)]);
    }

    #[tokio::test]
    async fn describe_marks_dangling_references() {
        let fx = fixture();
        let (a, b) = (product(&fx, "a").await, product(&fx, "b").await);
        let cart = fx.carts.create().await.unwrap();
        fx.carts.upsert_item(cart.id, a, 1).await.unwrap();
        let cart = fx.carts.upsert_item(cart.id, b, 1).await.unwrap();

        fx.products.delete(b).await.unwrap();

        let lines = fx.carts.describe(&cart).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].product.is_some());
        assert!(lines[1].product.is_none());
    }

    #[tokio::test]
    async fn page_for_single_cart() {
        let fx = fixture();
        let cart = fx.carts.create().await.unwrap();
        fx.carts.create().await.unwrap();

        let page = fx.carts.page_for(cart.id).await.unwrap();
        assert_eq!(page.docs.len(), 1);
        assert_eq!(page.docs[0].id, cart.id);
        assert_eq!(page.total_pages, 1);

        assert!(matches!(
            fx.carts.page_for(Uuid::new_v4()).await,
            Err(CoreError::NotFound(_))
        ));
    }
}
