//! 服务端视图渲染
//!
//! 模板编译进二进制，启动时一次性注册。

use axum::response::Html;
use serde::Serialize;
use tera::{Context, Tera};

use crate::core::error::CoreError;

const TEMPLATES: [(&str, &str); 6] = [
    ("layout.html", include_str!("../../templates/layout.html")),
    ("home.html", include_str!("../../templates/home.html")),
    ("products.html", include_str!("../../templates/products.html")),
    (
        "real_time_products.html",
        include_str!("../../templates/real_time_products.html"),
    ),
    ("cart.html", include_str!("../../templates/cart.html")),
    ("chat.html", include_str!("../../templates/chat.html")),
];

pub struct ViewRenderer {
    tera: Tera,
}

impl ViewRenderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    /// `name` 不带扩展名，例如 `"cart"`
    pub fn render<C: Serialize>(&self, name: &str, data: &C) -> Result<Html<String>, CoreError> {
        let context = Context::from_serialize(data)?;
        let html = self.tera.render(&format!("{}.html", name), &context)?;
        Ok(Html(html))
    }
}
