// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! Okapi BM25 keyword retriever.
//!
//! Scores the whole corpus of its document store against the query on
//! every invocation. The corpus statistics (term frequencies, document
//! frequencies, average length) are recomputed per run, which keeps the
//! node stateless and the store a plain persistence seam at the cost of
//! re-indexing; acceptable for the in-memory corpus sizes this crate
//! targets.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::NodeError;
use crate::nodes::lexical::tokenize;
use crate::schema::Document;
use crate::traits::{DocumentStore, NodeRequest, NodeResponse, PipelineNode};

/// BM25 retriever over a [`DocumentStore`].
pub struct Bm25Retriever {
    store: Arc<dyn DocumentStore>,
    top_k: usize,
    /// Term frequency saturation.
    k1: f32,
    /// Document length normalization.
    b: f32,
}

impl Bm25Retriever {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_parameters(store, 10, 1.2, 0.75)
    }

    pub fn with_parameters(store: Arc<dyn DocumentStore>, top_k: usize, k1: f32, b: f32) -> Self {
        Self { store, top_k, k1, b }
    }

    /// Exact-match meta filters: every filter key must be present in the
    /// document meta and equal the filter value, or, for list-valued
    /// filters, equal one of the listed values.
    fn matches_filters(doc: &Document, filters: &serde_json::Map<String, Value>) -> bool {
        filters.iter().all(|(key, expected)| match doc.meta.get(key) {
            None => false,
            Some(actual) => match expected {
                Value::Array(allowed) => allowed.contains(actual),
                other => actual == other,
            },
        })
    }

    /// Score the corpus against the query terms, Lucene-style idf
    /// (`ln(N/df) + 1`) so common terms never go negative.
    fn score_corpus(&self, corpus: &[Document], query_terms: &[String], k1: f32, b: f32) -> Vec<(String, f32)> {
        let total_docs = corpus.len();
        if total_docs == 0 || query_terms.is_empty() {
            return Vec::new();
        }

        let tokenized: Vec<(usize, Vec<String>)> = corpus
            .iter()
            .enumerate()
            .map(|(i, doc)| (i, tokenize(&doc.content)))
            .collect();
        let avg_doc_length = tokenized
            .iter()
            .map(|(_, tokens)| tokens.len())
            .sum::<usize>() as f32
            / total_docs as f32;
        if avg_doc_length == 0.0 {
            return Vec::new();
        }

        let mut document_frequencies: HashMap<&str, usize> = HashMap::new();
        let mut term_frequencies: Vec<HashMap<&str, usize>> = Vec::with_capacity(corpus.len());
        for (_, tokens) in &tokenized {
            let mut tf: HashMap<&str, usize> = HashMap::new();
            for token in tokens {
                *tf.entry(token.as_str()).or_insert(0) += 1;
            }
            for term in tf.keys() {
                *document_frequencies.entry(term).or_insert(0) += 1;
            }
            term_frequencies.push(tf);
        }

        let mut scored = Vec::new();
        for ((idx, tokens), tf) in tokenized.iter().zip(&term_frequencies) {
            let doc_length = tokens.len();
            if doc_length == 0 {
                continue;
            }
            let mut score = 0.0f32;
            for term in query_terms {
                let Some(&freq) = tf.get(term.as_str()) else {
                    continue;
                };
                let df = document_frequencies[term.as_str()];
                let idf = (total_docs as f32 / df as f32).ln() + 1.0;
                let tf_normalized = freq as f32 / doc_length as f32;
                score += idf * (tf_normalized * (k1 + 1.0))
                    / (tf_normalized
                        + k1 * (1.0 - b + b * (doc_length as f32 / avg_doc_length)));
            }
            if score > 0.0 {
                scored.push((corpus[*idx].id.clone(), score));
            }
        }
        scored
    }
}

#[async_trait]
impl PipelineNode for Bm25Retriever {
    async fn run(&self, req: NodeRequest) -> Result<NodeResponse, NodeError> {
        let query = req
            .payload
            .query
            .clone()
            .ok_or_else(|| NodeError::MissingInput("query".to_string()))?;
        let top_k = req.params.get_usize("top_k")?.unwrap_or(self.top_k);
        let k1 = req.params.get_f32("k1")?.unwrap_or(self.k1);
        let b = req.params.get_f32("b")?.unwrap_or(self.b);
        let filters = match req.params.get("filters") {
            None => None,
            Some(Value::Object(map)) => Some(map.clone()),
            Some(other) => {
                return Err(NodeError::InvalidParam {
                    name: "filters".to_string(),
                    reason: format!("expected an object of meta filters, got {}", other),
                })
            }
        };

        let mut corpus = self.store.all_documents().await?;
        if let Some(filters) = &filters {
            corpus.retain(|doc| Self::matches_filters(doc, filters));
        }

        let query_terms = tokenize(&query);
        let mut scored = self.score_corpus(&corpus, &query_terms, k1, b);
        // Deterministic ranking: score descending, content address as tie-break.
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(top_k);

        let by_id: HashMap<&str, &Document> =
            corpus.iter().map(|doc| (doc.id.as_str(), doc)).collect();
        let mut payload = req.payload;
        payload.documents = scored
            .iter()
            .filter_map(|(id, score)| by_id.get(id.as_str()).map(|doc| (*doc).clone().scored(*score)))
            .collect();

        let trace = json!({
            "query_terms": query_terms,
            "corpus_size": corpus.len(),
            "returned": payload.documents.len(),
        });
        Ok(NodeResponse::forward(payload).with_trace(trace))
    }

    fn name(&self) -> &'static str {
        "bm25_retriever"
    }
}
