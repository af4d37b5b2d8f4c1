// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! Message types for pipeline run lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Pipeline run lifecycle (start, completion, failure)
//! * Execution scheduling
//! * Branch routing decisions at the run level

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Pipeline run started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use gleaner::observability::messages::engine::RunStarted;
///
/// let msg = RunStarted {
///     root: "Query",
///     node_count: 5,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted<'a> {
    pub root: &'a str,
    pub node_count: usize,
}

impl Display for RunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting pipeline run from {} root: {} nodes",
            self.root, self.node_count
        )
    }
}

impl StructuredLog for RunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            root = self.root,
            node_count = self.node_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_run",
            span_name = name,
            root = self.root,
            node_count = self.node_count,
        )
    }
}

/// Pipeline run completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use gleaner::observability::messages::engine::RunCompleted;
/// use std::time::Duration;
///
/// let msg = RunCompleted {
///     root: "Query",
///     executed: 5,
///     skipped: 1,
///     duration: Duration::from_millis(250),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunCompleted<'a> {
    pub root: &'a str,
    pub executed: usize,
    pub skipped: usize,
    pub duration: std::time::Duration,
}

impl Display for RunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline run from {} root completed: {} nodes executed, {} skipped in {:?}",
            self.root, self.executed, self.skipped, self.duration
        )
    }
}

impl StructuredLog for RunCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            root = self.root,
            executed = self.executed,
            skipped = self.skipped,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_run_completed",
            span_name = name,
            root = self.root,
            executed = self.executed,
            skipped = self.skipped,
            duration = ?self.duration,
        )
    }
}

/// Pipeline run failed.
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use gleaner::observability::messages::engine::RunFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
/// let msg = RunFailed {
///     node_id: "Retriever",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct RunFailed<'a> {
    pub node_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for RunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline run failed at node '{}': {}",
            self.node_id, self.error
        )
    }
}

impl StructuredLog for RunFailed<'_> {
    fn log(&self) {
        tracing::error!(
            node_id = self.node_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "pipeline_run_failed",
            span_name = name,
            node_id = self.node_id,
            error = %self.error,
        )
    }
}

/// Execution order computed for a run.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use gleaner::observability::messages::engine::ExecutionOrderComputed;
///
/// let order = vec!["Retriever".to_string(), "Reader".to_string()];
/// let msg = ExecutionOrderComputed { order: &order };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ExecutionOrderComputed<'a> {
    pub order: &'a [String],
}

impl Display for ExecutionOrderComputed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Computed execution order for {} nodes",
            self.order.len()
        )
    }
}

impl StructuredLog for ExecutionOrderComputed<'_> {
    fn log(&self) {
        tracing::info!(
            node_count = self.order.len(),
            order = ?self.order,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution_order",
            span_name = name,
            node_count = self.order.len(),
            order = ?self.order,
        )
    }
}
