// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! Join node for document-producing branches.
//!
//! Predecessor payloads arrive already merged in declared edge order, so
//! this node's job is deduplication and re-ranking of the combined
//! document list.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::json;

use crate::errors::NodeError;
use crate::schema::Document;
use crate::traits::{NodeRequest, NodeResponse, PipelineNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinMode {
    /// Keep arrival order, drop later duplicates.
    Concatenate,
    /// Keep the best-scored duplicate, re-rank by score.
    Merge,
}

impl JoinMode {
    fn parse(s: &str) -> Result<Self, NodeError> {
        match s {
            "concatenate" => Ok(Self::Concatenate),
            "merge" => Ok(Self::Merge),
            other => Err(NodeError::InvalidParam {
                name: "join_mode".to_string(),
                reason: format!("expected 'concatenate' or 'merge', got '{}'", other),
            }),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Concatenate => "concatenate",
            Self::Merge => "merge",
        }
    }
}

/// Deduplicates and optionally re-ranks the merged document list.
pub struct JoinDocuments {
    mode: JoinMode,
    top_k: Option<usize>,
}

impl JoinDocuments {
    pub fn new() -> Self {
        Self {
            mode: JoinMode::Concatenate,
            top_k: None,
        }
    }

    pub fn with_mode(mode: &str, top_k: Option<usize>) -> Result<Self, NodeError> {
        Ok(Self {
            mode: JoinMode::parse(mode)?,
            top_k,
        })
    }

    fn concatenate(documents: Vec<Document>) -> Vec<Document> {
        let mut seen = HashSet::new();
        documents
            .into_iter()
            .filter(|doc| seen.insert(doc.id.clone()))
            .collect()
    }

    fn merge(documents: Vec<Document>) -> Vec<Document> {
        let mut best: HashMap<String, Document> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        for doc in documents {
            match best.get(&doc.id) {
                None => {
                    order.push(doc.id.clone());
                    best.insert(doc.id.clone(), doc);
                }
                Some(existing) => {
                    if doc.score.unwrap_or(f32::NEG_INFINITY)
                        > existing.score.unwrap_or(f32::NEG_INFINITY)
                    {
                        best.insert(doc.id.clone(), doc);
                    }
                }
            }
        }
        let mut merged: Vec<Document> = order
            .into_iter()
            .filter_map(|id| best.remove(&id))
            .collect();
        // Unscored documents sink below scored ones; id breaks ties.
        merged.sort_by(|a, b| {
            b.score
                .unwrap_or(f32::NEG_INFINITY)
                .partial_cmp(&a.score.unwrap_or(f32::NEG_INFINITY))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        merged
    }
}

impl Default for JoinDocuments {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PipelineNode for JoinDocuments {
    async fn run(&self, req: NodeRequest) -> Result<NodeResponse, NodeError> {
        let mode = match req.params.get_str("join_mode")? {
            Some(s) => JoinMode::parse(s)?,
            None => self.mode,
        };
        let top_k = match req.params.get_usize("top_k")? {
            Some(k) => Some(k),
            None => self.top_k,
        };

        let mut payload = req.payload;
        let incoming = std::mem::take(&mut payload.documents);
        let input_count = incoming.len();
        let mut joined = match mode {
            JoinMode::Concatenate => Self::concatenate(incoming),
            JoinMode::Merge => Self::merge(incoming),
        };
        if let Some(k) = top_k {
            joined.truncate(k);
        }

        let trace = json!({
            "mode": mode.as_str(),
            "input_count": input_count,
            "output_count": joined.len(),
        });
        payload.documents = joined;
        Ok(NodeResponse::forward(payload).with_trace(trace))
    }

    fn name(&self) -> &'static str {
        "join_documents"
    }
}
