//! 购物车数据模型
//!
//! 一个购物车对同一商品最多只有一条明细，数量总是覆盖而不是累加。

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::products::Product;
use crate::infrastructure::store::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// 弱引用，商品删除后可能悬空
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub id: Uuid,
    pub products: Vec<LineItem>,
}

impl Document for Cart {
    const COLLECTION: &'static str = "carts";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Cart {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            products: Vec::new(),
        }
    }

    pub fn item(&self, product_id: Uuid) -> Option<&LineItem> {
        self.products.iter().find(|item| item.product_id == product_id)
    }

    /// 已有明细时覆盖数量，否则追加到末尾
    pub fn upsert_item(&mut self, product_id: Uuid, quantity: u32) {
        match self.products.iter_mut().find(|item| item.product_id == product_id) {
            Some(item) => item.quantity = quantity,
            None => self.products.push(LineItem {
                product_id,
                quantity,
            }),
        }
    }

    /// 只更新已有明细；商品不在购物车中时返回 `false`
    pub fn set_item_quantity(&mut self, product_id: Uuid, quantity: u32) -> bool {
        match self.products.iter_mut().find(|item| item.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn remove_item(&mut self, product_id: Uuid) -> bool {
        let before = self.products.len();
        self.products.retain(|item| item.product_id != product_id);
        self.products.len() != before
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }

    /// 重复的商品按 upsert 合并：保留首次出现的位置，数量取最后一次
    pub fn replace_items(&mut self, items: impl IntoIterator<Item = LineItem>) {
        self.products.clear();
        for item in items {
            self.upsert_item(item.product_id, item.quantity);
        }
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

/// 添加或更新明细的请求体
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuantityRequest {
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub quantity: u32,
}

/// `PUT /carts/:cid` 的请求体，`products` 缺省时只做分页重新查询
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplaceCartRequest {
    pub products: Option<Vec<LineItem>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListCartsQuery {
    pub limit: Option<String>,
    pub page: Option<String>,
}

/// 购物车视图中的一行，商品已删除时 `product` 为空
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: u32,
    pub product: Option<Product>,
}
