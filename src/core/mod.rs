//! 核心层：错误、响应信封、分页、请求解析和中间件

pub mod error;
pub mod middleware;
pub mod pagination;
pub mod request;
pub mod response;
