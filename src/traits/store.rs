use async_trait::async_trait;

use crate::errors::StoreError;
use crate::schema::Document;

/// Persistence seam consulted by retriever nodes and filled by writer
/// nodes.
///
/// Stores hold documents by content-addressed id and never score or rank.
/// Retrieval algorithms live in nodes, which fetch the corpus through
/// `all_documents` and compute relevance themselves.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Write documents, skipping ids already present. Returns how many
    /// documents were newly written.
    async fn write_documents(&self, documents: Vec<Document>) -> Result<usize, StoreError>;

    async fn get_document(&self, id: &str) -> Result<Option<Document>, StoreError>;

    /// All stored documents in insertion order.
    async fn all_documents(&self) -> Result<Vec<Document>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;

    /// The store type name, as registered with the factory.
    fn name(&self) -> &'static str;
}
