// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// A unit of text flowing through a pipeline.
///
/// Documents are content-addressed: the id is the SHA-256 digest of the
/// content, so ingesting the same text twice produces the same id and
/// stores can deduplicate on write. Ranking nodes attach a `score`;
/// everything else about provenance lives in `meta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub meta: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl Document {
    /// Create a document from raw content, deriving the content-addressed id.
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id: Self::content_address(&content),
            content,
            meta: BTreeMap::new(),
            score: None,
        }
    }

    /// Create a document with provenance metadata attached.
    pub fn with_meta(content: impl Into<String>, meta: BTreeMap<String, Value>) -> Self {
        let mut doc = Self::new(content);
        doc.meta = meta;
        doc
    }

    /// Lowercase hex SHA-256 digest of the given content.
    pub fn content_address(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Builder-style score attachment, used by ranking nodes.
    pub fn scored(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_yields_identical_ids() {
        let a = Document::new("the quick brown fox");
        let b = Document::new("the quick brown fox");
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn different_content_yields_different_ids() {
        let a = Document::new("alpha");
        let b = Document::new("beta");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn id_is_lowercase_hex_sha256() {
        let doc = Document::new("hello");
        assert_eq!(doc.id.len(), 64);
        assert!(doc.id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
