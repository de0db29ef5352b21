//! # shop-backend
//!
//! 一个最小的电商后端：
//! - 商品目录的增删改查和分页列表
//! - 引用商品的购物车
//! - 只追加的聊天消息日志
//! - 服务端渲染的页面
//!
//! 存储通过 [`infrastructure::store::Collection`] 抽象，提供内存和 PostgreSQL 两种实现。

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::{router, AppState, Collections};
