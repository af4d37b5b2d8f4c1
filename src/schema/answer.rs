// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Half-open byte range into a document's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// An extracted answer produced by a reader node.
///
/// `context` is the surrounding text the answer was taken from; `offsets`
/// locates the answer inside the source document identified by
/// `document_id`. Readers that synthesize rather than extract leave
/// `offsets` empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub score: f32,
    pub context: String,
    pub document_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offsets: Option<Span>,
    #[serde(default)]
    pub meta: BTreeMap<String, Value>,
}

impl Answer {
    pub fn new(answer: impl Into<String>, score: f32, document_id: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            score,
            context: String::new(),
            document_id: document_id.into(),
            offsets: None,
            meta: BTreeMap::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>, offsets: Span) -> Self {
        self.context = context.into();
        self.offsets = Some(offsets);
        self
    }
}
