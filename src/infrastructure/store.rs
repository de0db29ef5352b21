//! 文档存储抽象
//!
//! 每个集合按 UUID 存取整份文档，支持相等过滤、数值字段排序和偏移分页。
//! 内存实现见 [`super::memory`]，PostgreSQL 实现见 [`super::database`]。

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::core::pagination::{Page, PageRequest, Sort, SortOrder};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("backend failure: {0}")]
    Backend(String),
    #[error("document (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 可存入集合的文档
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// 集合名，同时用作数据库表名
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
}

/// 顶层字段相等过滤
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Map<String, Value>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    pub fn by_id(id: Uuid) -> Self {
        Self::new().where_eq("id", id.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }

    /// JSONB 包含查询使用的对象
    pub fn to_json(&self) -> Value {
        Value::Object(self.conditions.clone())
    }
}

/// 缺失或非数值的字段排在最前，与文档数据库对 null 的排序一致
pub fn compare_by(sort: &Sort, a: &Value, b: &Value) -> Ordering {
    let key = |doc: &Value| doc.get(sort.field).and_then(Value::as_f64);
    let ordering = match (key(a), key(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    match sort.order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}

#[async_trait]
pub trait Collection<T: Document>: Send + Sync {
    async fn insert(&self, doc: T) -> StoreResult<T>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<T>>;

    /// 按插入顺序返回所有匹配文档
    async fn find_all(&self, filter: &Filter) -> StoreResult<Vec<T>>;

    async fn find_page(&self, filter: &Filter, request: &PageRequest) -> StoreResult<Page<T>>;

    /// 整份替换；文档不存在时返回 `false`
    async fn replace(&self, doc: &T) -> StoreResult<bool>;

    /// 文档不存在时返回 `false`
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;

    /// 后端名称，用于健康检查和日志
    fn backend(&self) -> &'static str;
}
