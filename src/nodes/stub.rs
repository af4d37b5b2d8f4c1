// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! Stub nodes for executor and pipeline tests.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::NodeError;
use crate::schema::Document;
use crate::traits::{NodeRequest, NodeResponse, PipelineNode};

/// Appends its marker to `extras["visited"]` and forwards the payload,
/// so tests can assert execution order from the terminal payload.
pub struct StubNode {
    pub marker: String,
}

impl StubNode {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

#[async_trait]
impl PipelineNode for StubNode {
    async fn run(&self, req: NodeRequest) -> Result<NodeResponse, NodeError> {
        let mut payload = req.payload;
        let visited = payload
            .extras
            .entry("visited".to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(trail) = visited {
            trail.push(Value::from(self.marker.clone()));
        }
        Ok(NodeResponse::forward(payload))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Declares a fixed number of outgoing edges and always selects the same
/// branch.
pub struct RoutingStubNode {
    pub branch: usize,
    pub edges: usize,
}

impl RoutingStubNode {
    pub fn new(branch: usize, edges: usize) -> Self {
        Self { branch, edges }
    }
}

#[async_trait]
impl PipelineNode for RoutingStubNode {
    async fn run(&self, req: NodeRequest) -> Result<NodeResponse, NodeError> {
        Ok(NodeResponse::branched(req.payload, self.branch))
    }

    fn name(&self) -> &'static str {
        "routing_stub"
    }

    fn outgoing_edges(&self) -> usize {
        self.edges
    }
}

/// Appends one fixed document to the payload, for merge-order and
/// store-write tests.
pub struct DocStubNode {
    pub content: String,
}

impl DocStubNode {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[async_trait]
impl PipelineNode for DocStubNode {
    async fn run(&self, req: NodeRequest) -> Result<NodeResponse, NodeError> {
        let mut payload = req.payload;
        payload.documents.push(Document::new(&self.content));
        Ok(NodeResponse::forward(payload))
    }

    fn name(&self) -> &'static str {
        "doc_stub"
    }
}

/// Always fails, for abort-on-error tests.
pub struct FailingNode;

#[async_trait]
impl PipelineNode for FailingNode {
    async fn run(&self, _req: NodeRequest) -> Result<NodeResponse, NodeError> {
        Err(NodeError::Other("simulated node failure".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
