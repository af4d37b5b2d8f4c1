// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! Message types for node execution and lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Node execution lifecycle (start, completion, failure)
//! * Branch selection
//! * Nodes skipped for lack of active incoming edges

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Node execution started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use gleaner::observability::messages::node::NodeExecutionStarted;
///
/// let msg = NodeExecutionStarted {
///     node_id: "Retriever",
///     node_type: "bm25_retriever",
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct NodeExecutionStarted<'a> {
    pub node_id: &'a str,
    pub node_type: &'a str,
}

impl Display for NodeExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' ({}) execution started",
            self.node_id, self.node_type
        )
    }
}

impl StructuredLog for NodeExecutionStarted<'_> {
    fn log(&self) {
        tracing::info!(
            node_id = self.node_id,
            node_type = self.node_type,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "node_execution",
            span_name = name,
            node_id = self.node_id,
            node_type = self.node_type,
        )
    }
}

/// Node execution completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use gleaner::observability::messages::node::NodeExecutionCompleted;
/// use std::time::Duration;
///
/// let msg = NodeExecutionCompleted {
///     node_id: "Retriever",
///     branch: 1,
///     duration: Duration::from_millis(10),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct NodeExecutionCompleted<'a> {
    pub node_id: &'a str,
    pub branch: usize,
    pub duration: std::time::Duration,
}

impl Display for NodeExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' completed on output_{} in {:?}",
            self.node_id, self.branch, self.duration
        )
    }
}

impl StructuredLog for NodeExecutionCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            node_id = self.node_id,
            branch = self.branch,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "node_execution_completed",
            span_name = name,
            node_id = self.node_id,
            branch = self.branch,
            duration = ?self.duration,
        )
    }
}

/// Node execution failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use gleaner::observability::messages::node::NodeExecutionFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
/// let msg = NodeExecutionFailed {
///     node_id: "Retriever",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct NodeExecutionFailed<'a> {
    pub node_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for NodeExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' execution failed: {}",
            self.node_id, self.error
        )
    }
}

impl StructuredLog for NodeExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            node_id = self.node_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "node_execution_failed",
            span_name = name,
            node_id = self.node_id,
            error = %self.error,
        )
    }
}

/// Node skipped because no active incoming edge carried data to it.
///
/// # Log Level
/// `debug!` - Routine routing outcome
///
/// # Example
/// ```
/// use gleaner::observability::messages::node::NodeSkipped;
///
/// let msg = NodeSkipped {
///     node_id: "KeywordRetriever",
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct NodeSkipped<'a> {
    pub node_id: &'a str,
}

impl Display for NodeSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' skipped: no active incoming edges",
            self.node_id
        )
    }
}
