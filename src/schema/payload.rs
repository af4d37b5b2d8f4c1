// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! The canonical argument bag passed along pipeline edges.
//!
//! Every node receives one [`Payload`] and produces one. When a node has
//! several active predecessors, the executor merges their payloads in
//! declared edge order before invoking the node, so merge order (and with
//! it the whole run) stays deterministic.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Answer, Document};

/// The shared data bag propagated along pipeline edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// The query text, present in query-rooted runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Paths awaiting conversion, present in file-rooted runs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_paths: Vec<PathBuf>,
    /// Documents produced or re-ranked by upstream nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<Document>,
    /// Answers produced by reader nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<Answer>,
    /// Node-specific values with no dedicated field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, Value>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root payload for a query-rooted run.
    pub fn from_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Root payload for a file-rooted run.
    pub fn from_files(file_paths: Vec<PathBuf>) -> Self {
        Self {
            file_paths,
            ..Self::default()
        }
    }

    /// Merge another payload into this one.
    ///
    /// The left-hand query wins when both sides carry one. List fields
    /// append in argument order; `extras` keys from `other` overwrite
    /// existing entries.
    pub fn merge(&mut self, other: Payload) {
        if self.query.is_none() {
            self.query = other.query;
        }
        self.file_paths.extend(other.file_paths);
        self.documents.extend(other.documents);
        self.answers.extend(other.answers);
        self.extras.extend(other.extras);
    }
}
