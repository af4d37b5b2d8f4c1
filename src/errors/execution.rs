// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! Error types for node and pipeline execution.
//!
//! Node implementations return [`NodeError`]; the executor wraps the first
//! failure into [`ExecutionError::NodeFailed`] and aborts the run. Store
//! failures surface through [`StoreError`] and convert into `NodeError`
//! inside store-backed nodes.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by document store implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No document with the requested id exists in the store.
    #[error("Document '{0}' not found")]
    DocumentNotFound(String),

    /// Backend-specific failure (lock poisoning, connection loss, ...).
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Errors returned by node implementations.
#[derive(Error, Debug)]
pub enum NodeError {
    /// The merged input payload is missing a field this node requires.
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// A run parameter had an unusable type or value.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// File I/O failure while reading or converting documents.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document store failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The node could not route its input to any declared branch.
    #[error("Unroutable input: {0}")]
    Unroutable(String),

    /// Anything else a node wants to abort the run with.
    #[error("{0}")]
    Other(String),
}

/// Errors that can occur while executing a pipeline.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// A node returned an error; the run was aborted.
    #[error("Node '{node_id}' failed: {source}")]
    NodeFailed {
        node_id: String,
        #[source]
        source: NodeError,
    },

    /// A node selected a branch outside its declared range.
    #[error("Node '{node_id}' selected output_{selected} but declares {declared} outgoing edge(s)")]
    UndeclaredBranch {
        node_id: String,
        selected: usize,
        declared: usize,
    },

    /// The invocation surface does not match the pipeline's root.
    #[error("Pipeline is rooted at '{expected}' and cannot be invoked with '{actual}' input")]
    WrongRoot { expected: String, actual: String },

    /// The pipeline has no nodes to execute.
    #[error("Pipeline is empty")]
    EmptyPipeline,

    /// A scheduled node was not found in the graph.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Invariant breakage that validation should have caught.
    #[error("Internal error: {message}")]
    InternalError { message: String },
}
