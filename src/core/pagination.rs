//! 偏移分页
//!
//! 查询参数以原始字符串接收，无法解析的值回退到默认值而不是报错。

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// `1` 升序，`-1` 降序，其余值关闭排序
    pub fn from_query(raw: Option<&str>) -> Option<Self> {
        let value = parse_number(raw?)?;
        if value == 1.0 {
            Some(SortOrder::Ascending)
        } else if value == -1.0 {
            Some(SortOrder::Descending)
        } else {
            None
        }
    }

    pub fn as_query(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "1",
            SortOrder::Descending => "-1",
        }
    }
}

/// 按数值字段排序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: &'static str,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(field: &'static str, order: SortOrder) -> Self {
        Self { field, order }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub sort: Option<Sort>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            sort: None,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            sort: None,
        }
    }

    /// 从查询字符串构造；缺失、非数字或非正数时使用默认值
    pub fn from_query(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u32,
        max_limit: u32,
    ) -> Self {
        let page = page.and_then(parse_positive).unwrap_or(1);
        let limit = limit
            .and_then(parse_positive)
            .unwrap_or(default_limit)
            .min(max_limit)
            .max(1);

        Self {
            page,
            limit,
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: Option<Sort>) -> Self {
        self.sort = sort;
        self
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_positive(raw: &str) -> Option<u32> {
    let value = parse_number(raw)?.trunc();
    if value >= 1.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}

/// 一页查询结果及分页元数据
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub total_docs: u64,
    pub limit: u32,
    pub page: u32,
    pub total_pages: u32,
    pub paging_counter: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    pub fn new(docs: Vec<T>, total_docs: u64, request: &PageRequest) -> Self {
        let limit = request.limit.max(1);
        let page = request.page.max(1);
        let total_pages = total_docs
            .div_ceil(u64::from(limit))
            .clamp(1, u64::from(u32::MAX)) as u32;
        let has_prev_page = page > 1;
        let has_next_page = page < total_pages;

        Self {
            docs,
            total_docs,
            limit,
            page,
            total_pages,
            paging_counter: u64::from(page - 1) * u64::from(limit) + 1,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page + 1),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            docs: self.docs.into_iter().map(f).collect(),
            total_docs: self.total_docs,
            limit: self.limit,
            page: self.page,
            total_pages: self.total_pages,
            paging_counter: self.paging_counter,
            has_prev_page: self.has_prev_page,
            has_next_page: self.has_next_page,
            prev_page: self.prev_page,
            next_page: self.next_page,
        }
    }
}

/// 带前后页链接的分页响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub payload: Vec<T>,
    pub total_docs: u64,
    pub total_pages: u32,
    pub page: u32,
    pub limit: u32,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}

impl<T> PagedResponse<T> {
    /// 链接保留本次请求的 `limit`、`sort` 以及 `extra` 中的查询参数
    pub fn from_page(
        page: Page<T>,
        request: &PageRequest,
        base_path: &str,
        extra: &[(&str, &str)],
    ) -> Self {
        let link = |target: Option<u32>| {
            target.map(|p| format!("{}?{}", base_path, page_query(p, request, extra)))
        };

        Self {
            prev_link: link(page.prev_page),
            next_link: link(page.next_page),
            payload: page.docs,
            total_docs: page.total_docs,
            total_pages: page.total_pages,
            page: page.page,
            limit: page.limit,
            prev_page: page.prev_page,
            next_page: page.next_page,
            has_prev_page: page.has_prev_page,
            has_next_page: page.has_next_page,
        }
    }
}

fn page_query(page: u32, request: &PageRequest, extra: &[(&str, &str)]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("page", &page.to_string())
        .append_pair("limit", &request.limit.to_string());
    if let Some(sort) = &request.sort {
        query.append_pair("sort", sort.order.as_query());
    }
    query.extend_pairs(extra);
    query.finish()
}
