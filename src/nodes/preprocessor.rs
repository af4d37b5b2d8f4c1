//! Document splitting into overlapping word windows.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::NodeError;
use crate::schema::Document;
use crate::traits::{NodeRequest, NodeResponse, PipelineNode};

/// Split source meta key carrying the originating document id.
const META_SOURCE_ID: &str = "_source_id";
/// Split ordinal meta key, 0-based within the source document.
const META_SPLIT_ID: &str = "_split_id";

/// Splits documents into word windows of `split_length` with
/// `split_overlap` words carried between consecutive windows.
///
/// Splits inherit the source document's meta plus `_source_id` and
/// `_split_id`, and get fresh content-addressed ids. Documents shorter
/// than one window pass through as a single split.
pub struct DocumentSplitter {
    split_length: usize,
    split_overlap: usize,
}

impl DocumentSplitter {
    pub fn new() -> Self {
        Self {
            split_length: 200,
            split_overlap: 0,
        }
    }

    pub fn with_window(split_length: usize, split_overlap: usize) -> Self {
        Self {
            split_length,
            split_overlap,
        }
    }

    fn window_params(&self, req: &NodeRequest) -> Result<(usize, usize), NodeError> {
        let length = req
            .params
            .get_usize("split_length")?
            .unwrap_or(self.split_length);
        let overlap = req
            .params
            .get_usize("split_overlap")?
            .unwrap_or(self.split_overlap);
        if length == 0 {
            return Err(NodeError::InvalidParam {
                name: "split_length".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if overlap >= length {
            return Err(NodeError::InvalidParam {
                name: "split_overlap".to_string(),
                reason: format!("must be smaller than split_length ({})", length),
            });
        }
        Ok((length, overlap))
    }

    fn split_document(doc: &Document, length: usize, overlap: usize) -> Vec<Document> {
        let words: Vec<&str> = doc.content.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let step = length - overlap;
        let mut splits = Vec::new();
        let mut start = 0;
        let mut split_id = 0;
        while start < words.len() {
            let end = (start + length).min(words.len());
            let text = words[start..end].join(" ");
            let mut meta = doc.meta.clone();
            meta.insert(META_SOURCE_ID.to_string(), Value::from(doc.id.clone()));
            meta.insert(META_SPLIT_ID.to_string(), Value::from(split_id));
            splits.push(Document::with_meta(text, meta));
            if end == words.len() {
                break;
            }
            start += step;
            split_id += 1;
        }
        splits
    }
}

impl Default for DocumentSplitter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PipelineNode for DocumentSplitter {
    async fn run(&self, req: NodeRequest) -> Result<NodeResponse, NodeError> {
        let (length, overlap) = self.window_params(&req)?;
        let mut payload = req.payload;
        let sources = std::mem::take(&mut payload.documents);
        for doc in &sources {
            payload
                .documents
                .extend(Self::split_document(doc, length, overlap));
        }
        Ok(NodeResponse::forward(payload))
    }

    fn name(&self) -> &'static str {
        "document_splitter"
    }
}
