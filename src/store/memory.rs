// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! In-memory document store.
//!
//! Keeps all documents behind an `RwLock`, preserving insertion order so
//! retrievers iterating the corpus see a stable ordering across runs.
//! Suitable for tests, demos, and small corpora; not a persistence
//! backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::StoreError;
use crate::schema::Document;
use crate::traits::DocumentStore;

#[derive(Default)]
struct Inner {
    by_id: HashMap<String, Document>,
    insertion_order: Vec<String>,
}

/// In-memory [`DocumentStore`] with content-addressed deduplication.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn write_documents(&self, documents: Vec<Document>) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().await;
        let mut written = 0;
        for doc in documents {
            if inner.by_id.contains_key(&doc.id) {
                continue;
            }
            inner.insertion_order.push(doc.id.clone());
            inner.by_id.insert(doc.id.clone(), doc);
            written += 1;
        }
        debug!("Wrote {} new document(s)", written);
        Ok(written)
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.by_id.get(id).cloned())
    }

    async fn all_documents(&self) -> Result<Vec<Document>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .insertion_order
            .iter()
            .filter_map(|id| inner.by_id.get(id).cloned())
            .collect())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.by_id.len())
    }

    fn name(&self) -> &'static str {
        "memory_store"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_deduplicates_by_content_address() {
        let store = InMemoryDocumentStore::new();

        let first = store
            .write_documents(vec![Document::new("same text"), Document::new("other text")])
            .await
            .unwrap();
        assert_eq!(first, 2);

        let second = store
            .write_documents(vec![Document::new("same text")])
            .await
            .unwrap();
        assert_eq!(second, 0);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn all_documents_preserves_insertion_order() {
        let store = InMemoryDocumentStore::new();
        store
            .write_documents(vec![
                Document::new("first"),
                Document::new("second"),
                Document::new("third"),
            ])
            .await
            .unwrap();

        let contents: Vec<String> = store
            .all_documents()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.content)
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn get_document_by_id() {
        let store = InMemoryDocumentStore::new();
        let doc = Document::new("needle");
        let id = doc.id.clone();
        store.write_documents(vec![doc]).await.unwrap();

        let found = store.get_document(&id).await.unwrap();
        assert_eq!(found.map(|d| d.content), Some("needle".to_string()));
        assert!(store.get_document("missing").await.unwrap().is_none());
    }
}
