//! 商品数据模型

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::infrastructure::store::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    /// 调用方提供的编码，不保证唯一
    pub code: String,
    pub price: f64,
    pub stock: u32,
    pub status: bool,
}

impl Document for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// 创建商品请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub description: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub category: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub code: String,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: f64,
    pub stock: u32,
}

/// 更新商品请求：除 `status` 外整体替换
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub description: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub category: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub code: String,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: f64,
    pub stock: u32,
    pub status: Option<bool>,
}

/// 商品列表查询参数，全部按原始字符串接收
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub limit: Option<String>,
    pub page: Option<String>,
    pub sort: Option<String>,
    pub category: Option<String>,
}

impl Product {
    pub fn from_request(req: CreateProductRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: req.title,
            description: req.description,
            category: req.category,
            code: req.code,
            price: req.price,
            stock: req.stock,
            status: true,
        }
    }

    pub fn apply_update(&mut self, req: UpdateProductRequest) {
        self.title = req.title;
        self.description = req.description;
        self.category = req.category;
        self.code = req.code;
        self.price = req.price;
        self.stock = req.stock;
        if let Some(status) = req.status {
            self.status = status;
        }
    }
}
