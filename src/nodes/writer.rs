//! Terminal node of indexing pipelines: persists payload documents into a
//! document store.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::NodeError;
use crate::traits::{DocumentStore, NodeRequest, NodeResponse, PipelineNode};

/// Writes `payload.documents` into its store and reports the number of
/// newly written documents in `extras["documents_written"]`.
pub struct DocumentWriter {
    store: Arc<dyn DocumentStore>,
}

impl DocumentWriter {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PipelineNode for DocumentWriter {
    async fn run(&self, req: NodeRequest) -> Result<NodeResponse, NodeError> {
        let mut payload = req.payload;
        let written = self.store.write_documents(payload.documents.clone()).await?;
        payload
            .extras
            .insert("documents_written".to_string(), Value::from(written));
        Ok(NodeResponse::forward(payload).with_trace(json!({ "documents_written": written })))
    }

    fn name(&self) -> &'static str {
        "document_writer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Document, NodeParams, Payload};
    use crate::store::InMemoryDocumentStore;

    #[tokio::test]
    async fn writes_documents_and_reports_count() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let writer = DocumentWriter::new(store.clone());

        let mut payload = Payload::new();
        payload.documents.push(Document::new("to be stored"));
        payload.documents.push(Document::new("to be stored")); // duplicate

        let resp = writer
            .run(NodeRequest::new(payload, NodeParams::new()))
            .await
            .unwrap();

        assert_eq!(resp.payload.extras.get("documents_written"), Some(&Value::from(1)));
        assert_eq!(store.count().await.unwrap(), 1);
        // Documents stay in the payload for downstream nodes.
        assert_eq!(resp.payload.documents.len(), 2);
    }
}
