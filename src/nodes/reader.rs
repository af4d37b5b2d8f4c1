// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! Lexical extractive reader.
//!
//! Splits retrieved documents into sentence spans and scores each span by
//! query-term overlap, weighted by the retriever score of its document.
//! The best spans become [`Answer`]s with byte offsets into the source
//! document and a context window around the span. Purely term-based; no
//! model inference.

use async_trait::async_trait;
use serde_json::json;

use crate::errors::NodeError;
use crate::nodes::lexical::{sentence_spans, tokenize};
use crate::schema::{Answer, Span};
use crate::traits::{NodeRequest, NodeResponse, PipelineNode};

pub struct OverlapReader {
    top_k: usize,
    /// Bytes of surrounding text included on each side of an answer span.
    context_margin: usize,
}

impl OverlapReader {
    pub fn new() -> Self {
        Self {
            top_k: 3,
            context_margin: 60,
        }
    }

    pub fn with_top_k(top_k: usize) -> Self {
        Self {
            top_k,
            ..Self::new()
        }
    }

    /// Widen a span by the margin, snapping outward to char boundaries.
    fn context_window(text: &str, span: Span, margin: usize) -> Span {
        let mut start = span.start.saturating_sub(margin);
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }
        let mut end = (span.end + margin).min(text.len());
        while end < text.len() && !text.is_char_boundary(end) {
            end += 1;
        }
        Span { start, end }
    }
}

impl Default for OverlapReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PipelineNode for OverlapReader {
    async fn run(&self, req: NodeRequest) -> Result<NodeResponse, NodeError> {
        let query = req
            .payload
            .query
            .clone()
            .ok_or_else(|| NodeError::MissingInput("query".to_string()))?;
        let top_k = req.params.get_usize("top_k")?.unwrap_or(self.top_k);
        let margin = req
            .params
            .get_usize("context_margin")?
            .unwrap_or(self.context_margin);

        let query_terms = tokenize(&query);
        let mut candidates = 0usize;
        let mut answers: Vec<Answer> = Vec::new();

        for doc in &req.payload.documents {
            let doc_weight = 1.0 + doc.score.unwrap_or(0.0).max(0.0);
            for (start, end) in sentence_spans(&doc.content) {
                let sentence = &doc.content[start..end];
                let sentence_terms = tokenize(sentence);
                let matched = query_terms
                    .iter()
                    .filter(|term| sentence_terms.contains(term))
                    .count();
                if matched == 0 {
                    continue;
                }
                candidates += 1;
                let overlap = matched as f32 / query_terms.len() as f32;
                let span = Span { start, end };
                let window = Self::context_window(&doc.content, span, margin);
                answers.push(
                    Answer::new(sentence, overlap * doc_weight, doc.id.clone())
                        .with_context(&doc.content[window.start..window.end], span),
                );
            }
        }

        // Deterministic ranking: score descending, then document id and
        // span position.
        answers.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.document_id.cmp(&b.document_id))
                .then_with(|| {
                    a.offsets
                        .map(|s| s.start)
                        .cmp(&b.offsets.map(|s| s.start))
                })
        });
        answers.truncate(top_k);

        let trace = json!({
            "query_terms": query_terms.len(),
            "candidate_spans": candidates,
            "returned": answers.len(),
        });

        let mut payload = req.payload;
        payload.answers = answers;
        Ok(NodeResponse::forward(payload).with_trace(trace))
    }

    fn name(&self) -> &'static str {
        "overlap_reader"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Document, NodeParams, Payload};

    fn retrieved_payload(query: &str) -> Payload {
        let mut payload = Payload::from_query(query);
        payload.documents.push(
            Document::new(
                "Pipelines execute nodes in topological order. Cooking is unrelated. \
                 Branch routing prunes unselected paths.",
            )
            .scored(2.0),
        );
        payload
    }

    #[tokio::test]
    async fn extracts_best_matching_sentence() {
        let reader = OverlapReader::new();
        let resp = reader
            .run(NodeRequest::new(
                retrieved_payload("which order do pipelines execute nodes"),
                NodeParams::new(),
            ))
            .await
            .unwrap();

        let best = &resp.payload.answers[0];
        assert!(best.answer.contains("topological order"));
        assert!(best.score > 0.0);
    }

    #[tokio::test]
    async fn offsets_locate_the_answer_in_the_document() {
        let reader = OverlapReader::new();
        let resp = reader
            .run(NodeRequest::new(
                retrieved_payload("branch routing prunes"),
                NodeParams::new(),
            ))
            .await
            .unwrap();

        let best = &resp.payload.answers[0];
        let doc = &resp.payload.documents[0];
        let span = best.offsets.unwrap();
        assert_eq!(&doc.content[span.start..span.end], best.answer);
        assert!(best.context.contains(&best.answer));
    }

    #[tokio::test]
    async fn top_k_limits_answer_count() {
        let reader = OverlapReader::new();
        let params = NodeParams::new().set("top_k", 1);
        let resp = reader
            .run(NodeRequest::new(
                retrieved_payload("pipelines nodes branch routing order"),
                params,
            ))
            .await
            .unwrap();
        assert_eq!(resp.payload.answers.len(), 1);
    }

    #[tokio::test]
    async fn no_overlap_means_no_answers() {
        let reader = OverlapReader::new();
        let resp = reader
            .run(NodeRequest::new(
                retrieved_payload("zeppelin archery"),
                NodeParams::new(),
            ))
            .await
            .unwrap();
        assert!(resp.payload.answers.is_empty());
    }

    #[tokio::test]
    async fn missing_query_is_an_error() {
        let reader = OverlapReader::new();
        let err = reader
            .run(NodeRequest::new(Payload::new(), NodeParams::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::MissingInput(_)));
    }
}
