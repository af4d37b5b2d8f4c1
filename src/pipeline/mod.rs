// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! Pipeline assembly and invocation.
//!
//! [`Pipeline`] couples a [`PipelineGraph`] with an executor and exposes
//! the three invocation surfaces: [`run`](Pipeline::run) for a single
//! query, [`run_batch`](Pipeline::run_batch) for several queries in
//! sequence, and [`run_files`](Pipeline::run_files) for file-rooted
//! pipelines. The invocation surface must match the graph's root kind;
//! a query invocation against a file-rooted graph is rejected before
//! anything executes.

pub mod graph;

pub use graph::{InputRef, NodeEntry, PipelineGraph, PipelineRoot};

use std::path::PathBuf;
use std::sync::Arc;

use crate::engine::{PipelineOutput, SequentialExecutor};
use crate::errors::{ExecutionError, ValidationError};
use crate::schema::{Payload, RunParams};
use crate::traits::{PipelineExecutor, PipelineNode};

/// A runnable pipeline: a validated node graph plus an executor.
pub struct Pipeline {
    graph: PipelineGraph,
    executor: Box<dyn PipelineExecutor>,
}

impl Pipeline {
    /// An empty pipeline using the sequential executor.
    pub fn new() -> Self {
        Self::from_graph(PipelineGraph::new())
    }

    /// Wrap an already-assembled graph. Callers building graphs through
    /// the permissive insertion path must validate them first.
    pub fn from_graph(graph: PipelineGraph) -> Self {
        Self {
            graph,
            executor: Box::new(SequentialExecutor::new()),
        }
    }

    /// Add a node with string-form input references (`"Query"`,
    /// `"Retriever"`, `"Router.output_2"`).
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        node: Arc<dyn PipelineNode>,
        inputs: &[&str],
    ) -> Result<(), ValidationError> {
        let name = name.into();
        let mut refs = Vec::with_capacity(inputs.len());
        for input in inputs {
            match InputRef::parse(input) {
                Some(r) => refs.push(r),
                None => {
                    return Err(ValidationError::MalformedInput {
                        node_id: name,
                        input: (*input).to_string(),
                    })
                }
            }
        }
        self.graph.add_node(name, node, refs)
    }

    pub fn get_node(&self, name: &str) -> Option<&Arc<dyn PipelineNode>> {
        self.graph.entry(name).map(|entry| &entry.node)
    }

    /// Node names in the order they were added.
    pub fn node_names(&self) -> &[String] {
        self.graph.node_names()
    }

    pub fn root(&self) -> Option<PipelineRoot> {
        self.graph.root()
    }

    pub fn graph(&self) -> &PipelineGraph {
        &self.graph
    }

    /// Run the pipeline on one query.
    pub async fn run(
        &self,
        query: impl Into<String>,
        params: Option<RunParams>,
        debug: bool,
    ) -> Result<PipelineOutput, ExecutionError> {
        self.check_root(PipelineRoot::Query)?;
        let params = params.unwrap_or_default();
        self.executor
            .execute(&self.graph, Payload::from_query(query), &params, debug)
            .await
    }

    /// Run the pipeline once per query, aborting on the first failure.
    pub async fn run_batch(
        &self,
        queries: &[String],
        params: Option<RunParams>,
        debug: bool,
    ) -> Result<Vec<PipelineOutput>, ExecutionError> {
        self.check_root(PipelineRoot::Query)?;
        let params = params.unwrap_or_default();
        let mut outputs = Vec::with_capacity(queries.len());
        for query in queries {
            let output = self
                .executor
                .execute(&self.graph, Payload::from_query(query), &params, debug)
                .await?;
            outputs.push(output);
        }
        Ok(outputs)
    }

    /// Run a file-rooted pipeline on a list of paths.
    pub async fn run_files(
        &self,
        paths: Vec<PathBuf>,
        params: Option<RunParams>,
        debug: bool,
    ) -> Result<PipelineOutput, ExecutionError> {
        self.check_root(PipelineRoot::File)?;
        let params = params.unwrap_or_default();
        self.executor
            .execute(&self.graph, Payload::from_files(paths), &params, debug)
            .await
    }

    fn check_root(&self, invoked: PipelineRoot) -> Result<(), ExecutionError> {
        match self.graph.root() {
            Some(root) if root != invoked => Err(ExecutionError::WrongRoot {
                expected: root.as_str().to_string(),
                actual: invoked.as_str().to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("root", &self.graph.root())
            .field("nodes", &self.graph.node_names())
            .finish_non_exhaustive()
    }
}
