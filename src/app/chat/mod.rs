//! 聊天消息日志

pub mod handler;
pub mod model;
pub mod service;

pub use model::Message;
pub use service::MessageService;
