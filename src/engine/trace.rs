// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! Debug trace collection.
//!
//! When a run (or a single node, via the reserved `debug` run parameter)
//! requests tracing, the executor records exactly one [`NodeTrace`] per
//! executed node: the merged payload it received, the payload it
//! emitted, and any node-specific detail it attached to its response.
//! Skipped nodes leave no trace entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::Payload;

/// The recorded trace of one executed node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTrace {
    /// The merged input payload the node received.
    pub input: Value,
    /// The payload the node emitted.
    pub output: Value,
    /// Node-specific detail attached by the node itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<Value>,
}

/// Collects traces during a run, keyed by node instance name.
#[derive(Debug, Default)]
pub struct DebugAggregator {
    traces: BTreeMap<String, NodeTrace>,
}

impl DebugAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one executed node. Payloads serialize infallibly; a
    /// serialization failure degrades to a null entry rather than
    /// aborting the run.
    pub fn record(&mut self, node_id: &str, input: &Payload, output: &Payload, custom: Option<Value>) {
        self.traces.insert(
            node_id.to_string(),
            NodeTrace {
                input: serde_json::to_value(input).unwrap_or(Value::Null),
                output: serde_json::to_value(output).unwrap_or(Value::Null),
                custom,
            },
        );
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    pub fn into_traces(self) -> BTreeMap<String, NodeTrace> {
        self.traces
    }
}

/// The result of one pipeline invocation: the output payload of the
/// last executed node, plus the debug trace when one was requested.
#[derive(Debug, Serialize)]
pub struct PipelineOutput {
    pub payload: Payload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<BTreeMap<String, NodeTrace>>,
}

impl PipelineOutput {
    /// The trace entry for one node, when the run recorded one.
    pub fn trace_for(&self, node_id: &str) -> Option<&NodeTrace> {
        self.trace.as_ref().and_then(|traces| traces.get(node_id))
    }
}
