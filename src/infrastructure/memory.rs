//! 内存文档集合
//!
//! 文档按插入顺序保存在 `Vec` 中。互斥锁只在单次集合调用期间持有，
//! 跨调用的读-改-写不做协调，后写入者覆盖先写入者。

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::store::{compare_by, Collection, Document, Filter, StoreError, StoreResult};
use crate::core::pagination::{Page, PageRequest};

pub struct MemoryCollection<T> {
    docs: Mutex<Vec<T>>,
}

impl<T: Document> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            docs: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Vec<T>>> {
        self.docs
            .lock()
            .map_err(|_| StoreError::Backend(format!("{} collection lock poisoned", T::COLLECTION)))
    }

    fn matching(docs: &[T], filter: &Filter) -> StoreResult<Vec<(Value, T)>> {
        let mut out = Vec::new();
        for doc in docs {
            let value = serde_json::to_value(doc)?;
            if filter.matches(&value) {
                out.push((value, doc.clone()));
            }
        }
        Ok(out)
    }
}

impl<T: Document> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Document> Collection<T> for MemoryCollection<T> {
    async fn insert(&self, doc: T) -> StoreResult<T> {
        let mut docs = self.lock()?;
        if docs.iter().any(|d| d.id() == doc.id()) {
            return Err(StoreError::Backend(format!(
                "duplicate id {} in {}",
                doc.id(),
                T::COLLECTION
            )));
        }
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<T>> {
        let docs = self.lock()?;
        Ok(docs.iter().find(|d| d.id() == id).cloned())
    }

    async fn find_all(&self, filter: &Filter) -> StoreResult<Vec<T>> {
        let docs = self.lock()?;
        if filter.is_empty() {
            return Ok(docs.clone());
        }
        Ok(Self::matching(&docs, filter)?
            .into_iter()
            .map(|(_, doc)| doc)
            .collect())
    }

    async fn find_page(&self, filter: &Filter, request: &PageRequest) -> StoreResult<Page<T>> {
        let mut matched = {
            let docs = self.lock()?;
            Self::matching(&docs, filter)?
        };

        if let Some(sort) = &request.sort {
            // 稳定排序，同值保持插入顺序
            matched.sort_by(|(a, _), (b, _)| compare_by(sort, a, b));
        }

        let total = matched.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let docs = matched
            .into_iter()
            .skip(offset)
            .take(request.limit as usize)
            .map(|(_, doc)| doc)
            .collect();

        Ok(Page::new(docs, total, request))
    }

    async fn replace(&self, doc: &T) -> StoreResult<bool> {
        let mut docs = self.lock()?;
        match docs.iter_mut().find(|d| d.id() == doc.id()) {
            Some(slot) => {
                *slot = doc.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut docs = self.lock()?;
        let before = docs.len();
        docs.retain(|d| d.id() != id);
        Ok(docs.len() != before)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pagination::{Sort, SortOrder};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: Uuid,
        kind: String,
        weight: f64,
    }

    impl Document for Item {
        const COLLECTION: &'static str = "items";

        fn id(&self) -> Uuid {
            self.id
        }
    }

    fn item(kind: &str, weight: f64) -> Item {
        Item {
            id: Uuid::new_v4(),
            kind: kind.to_string(),
            weight,
        }
    }

    #[tokio::test]
    async fn insert_find_replace_delete() {
        let store = MemoryCollection::<Item>::new();
        let mut a = store.insert(item("a", 1.0)).await.unwrap();

        assert_eq!(store.find_by_id(a.id).await.unwrap(), Some(a.clone()));

        a.weight = 9.0;
        assert!(store.replace(&a).await.unwrap());
        assert_eq!(store.find_by_id(a.id).await.unwrap().unwrap().weight, 9.0);

        assert!(store.delete(a.id).await.unwrap());
        assert!(!store.delete(a.id).await.unwrap());
        assert!(!store.replace(&a).await.unwrap());
        assert_eq!(store.find_by_id(a.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let store = MemoryCollection::<Item>::new();
        let a = store.insert(item("a", 1.0)).await.unwrap();
        assert!(store.insert(a).await.is_err());
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() {
        let store = MemoryCollection::<Item>::new();
        for (kind, weight) in [("x", 3.0), ("y", 1.0), ("x", 2.0)] {
            store.insert(item(kind, weight)).await.unwrap();
        }

        let all = store.find_all(&Filter::new()).await.unwrap();
        let weights: Vec<f64> = all.iter().map(|i| i.weight).collect();
        assert_eq!(weights, vec![3.0, 1.0, 2.0]);

        let xs = store.find_all(&Filter::new().where_eq("kind", "x")).await.unwrap();
        assert_eq!(xs.len(), 2);
    }

    #[tokio::test]
    async fn sorted_page() {
        let store = MemoryCollection::<Item>::new();
        for weight in [5.0, 1.0, 4.0, 2.0, 3.0] {
            store.insert(item("k", weight)).await.unwrap();
        }

        let request = PageRequest::new(1, 2)
            .with_sort(Some(Sort::new("weight", SortOrder::Descending)));
        let page = store.find_page(&Filter::new(), &request).await.unwrap();

        let weights: Vec<f64> = page.docs.iter().map(|i| i.weight).collect();
        assert_eq!(weights, vec![5.0, 4.0]);
        assert_eq!(page.total_docs, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.next_page, Some(2));
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let store = MemoryCollection::<Item>::new();
        store.insert(item("k", 1.0)).await.unwrap();

        let page = store
            .find_page(&Filter::new(), &PageRequest::new(4, 10))
            .await
            .unwrap();
        assert!(page.docs.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(page.has_prev_page);
        assert!(!page.has_next_page);
    }
}
