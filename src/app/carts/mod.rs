//! 购物车

pub mod handler;
pub mod model;
pub mod service;

pub use model::{Cart, LineItem};
pub use service::CartService;
