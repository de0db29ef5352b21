//! 数据库基础设施
//!
//! 每个集合对应一张 JSONB 文档表：`(id UUID, seq BIGSERIAL, doc JSONB)`。
//! `seq` 记录插入顺序，过滤使用 `doc @> $filter`。

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    types::Json,
    Error,
};
use std::marker::PhantomData;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::config::DatabaseConfig;
use super::store::{Collection, Document, Filter, StoreResult};
use crate::core::pagination::{Page, PageRequest, Sort, SortOrder};

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, Error> {
        info!(
            url = %redact(&config.url),
            max_connections = config.max_connections,
            "connecting to database"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    /// 创建集合并建表
    pub async fn collection<T: Document>(&self) -> Result<PgCollection<T>, Error> {
        PgCollection::create(self.pool.clone()).await
    }

    pub async fn close(&self) {
        info!("closing database pool");
        self.pool.close().await;
    }
}

/// 隐藏连接串中的密码
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => {
            let credentials = &url[scheme + 3..at];
            match credentials.find(':') {
                Some(colon) => format!(
                    "{}{}:***{}",
                    &url[..scheme + 3],
                    &credentials[..colon],
                    &url[at..]
                ),
                None => url.to_string(),
            }
        }
        _ => url.to_string(),
    }
}

/// 排序字段来自代码常量，不来自请求。缺失字段排在升序最前、降序最后，
/// 同值按插入顺序
fn order_by(sort: Option<&Sort>) -> String {
    match sort {
        Some(sort) => {
            let direction = match sort.order {
                SortOrder::Ascending => "ASC NULLS FIRST",
                SortOrder::Descending => "DESC NULLS LAST",
            };
            format!("(doc->>'{}')::float8 {}, seq", sort.field, direction)
        }
        None => "seq".to_string(),
    }
}

fn page_query(collection: &str, sort: Option<&Sort>) -> String {
    format!(
        "SELECT doc FROM {} WHERE doc @> $1 ORDER BY {} LIMIT $2 OFFSET $3",
        collection,
        order_by(sort)
    )
}

pub struct PgCollection<T> {
    pool: PgPool,
    _doc: PhantomData<fn() -> T>,
}

impl<T: Document> PgCollection<T> {
    pub async fn create(pool: PgPool) -> Result<Self, Error> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                seq BIGSERIAL NOT NULL,
                doc JSONB NOT NULL
            )",
            T::COLLECTION
        );
        sqlx::query(&ddl).execute(&pool).await?;
        info!(collection = T::COLLECTION, "collection ready");

        Ok(Self {
            pool,
            _doc: PhantomData,
        })
    }

    fn decode(value: Value) -> StoreResult<T> {
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl<T: Document> Collection<T> for PgCollection<T> {
    async fn insert(&self, doc: T) -> StoreResult<T> {
        let value = serde_json::to_value(&doc)?;
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", T::COLLECTION);
        sqlx::query(&sql)
            .bind(doc.id())
            .bind(Json(value))
            .execute(&self.pool)
            .await?;
        Ok(doc)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<T>> {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", T::COLLECTION);
        let row: Option<Json<Value>> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|Json(value)| Self::decode(value)).transpose()
    }

    async fn find_all(&self, filter: &Filter) -> StoreResult<Vec<T>> {
        let sql = format!(
            "SELECT doc FROM {} WHERE doc @> $1 ORDER BY seq",
            T::COLLECTION
        );
        let rows: Vec<Json<Value>> = sqlx::query_scalar(&sql)
            .bind(Json(filter.to_json()))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(|Json(value)| Self::decode(value)).collect()
    }

    async fn find_page(&self, filter: &Filter, request: &PageRequest) -> StoreResult<Page<T>> {
        let count_sql = format!("SELECT COUNT(*) FROM {} WHERE doc @> $1", T::COLLECTION);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(Json(filter.to_json()))
            .fetch_one(&self.pool)
            .await?;

        let sql = page_query(T::COLLECTION, request.sort.as_ref());
        let rows: Vec<Json<Value>> = sqlx::query_scalar(&sql)
            .bind(Json(filter.to_json()))
            .bind(i64::from(request.limit))
            .bind(request.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        let docs = rows
            .into_iter()
            .map(|Json(value)| Self::decode(value))
            .collect::<StoreResult<Vec<T>>>()?;

        Ok(Page::new(docs, total.max(0) as u64, request))
    }

    async fn replace(&self, doc: &T) -> StoreResult<bool> {
        let value = serde_json::to_value(doc)?;
        let sql = format!("UPDATE {} SET doc = $2 WHERE id = $1", T::COLLECTION);
        let result = sqlx::query(&sql)
            .bind(doc.id())
            .bind(Json(value))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", T::COLLECTION);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
