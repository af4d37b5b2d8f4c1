// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! Message types for configuration validation warnings and errors.
//!
//! This module contains message types for logging events related to:
//! * Pipeline definition validation
//! * Cyclic dependency detection
//! * Unresolved inputs, duplicate names, and branch range violations
//! * Unused component warnings

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Configuration validation started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use gleaner::observability::messages::validation::ValidationStarted;
///
/// let msg = ValidationStarted {
///     component_count: 6,
///     pipeline_count: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ValidationStarted {
    pub component_count: usize,
    pub pipeline_count: usize,
}

impl Display for ValidationStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting configuration validation for {} components across {} pipelines",
            self.component_count, self.pipeline_count
        )
    }
}

impl StructuredLog for ValidationStarted {
    fn log(&self) {
        tracing::info!(
            component_count = self.component_count,
            pipeline_count = self.pipeline_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "span_name",
            name = name,
            component_count = self.component_count,
            pipeline_count = self.pipeline_count,
        )
    }
}

/// Configuration validation completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use gleaner::observability::messages::validation::ValidationCompleted;
///
/// let msg = ValidationCompleted {
///     pipeline_count: 2,
///     warning_count: 1,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ValidationCompleted {
    pub pipeline_count: usize,
    pub warning_count: usize,
}

impl Display for ValidationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.warning_count > 0 {
            write!(
                f,
                "Configuration validation completed for {} pipelines with {} warnings",
                self.pipeline_count, self.warning_count
            )
        } else {
            write!(
                f,
                "Configuration validation completed successfully for {} pipelines",
                self.pipeline_count
            )
        }
    }
}

impl StructuredLog for ValidationCompleted {
    fn log(&self) {
        tracing::info!(
            pipeline_count = self.pipeline_count,
            warning_count = self.warning_count,
            has_warnings = self.warning_count > 0,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "span_name",
            name = name,
            pipeline_count = self.pipeline_count,
            warning_count = self.warning_count,
            has_warnings = self.warning_count > 0,
        )
    }
}

/// Configuration validation failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use gleaner::observability::messages::validation::ValidationFailed;
///
/// let msg = ValidationFailed {
///     error_count: 3,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ValidationFailed {
    pub error_count: usize,
}

impl Display for ValidationFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration validation failed with {} errors",
            self.error_count
        )
    }
}

impl StructuredLog for ValidationFailed {
    fn log(&self) {
        tracing::error!(
            error_count = self.error_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            error_count = self.error_count,
        )
    }
}

/// Component defined but not used by any pipeline.
///
/// # Log Level
/// `warn!` - Potential issue or degraded behavior
///
/// # Example
/// ```
/// use gleaner::observability::messages::validation::UnusedComponent;
///
/// let msg = UnusedComponent {
///     component: "SparseRetriever",
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct UnusedComponent<'a> {
    pub component: &'a str,
}

impl Display for UnusedComponent<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Component '{}' is defined but not used by any pipeline",
            self.component
        )
    }
}

impl StructuredLog for UnusedComponent<'_> {
    fn log(&self) {
        tracing::warn!(
            component = self.component,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::WARN,
            "span_name",
            name = name,
            component = self.component,
        )
    }
}

/// Cyclic dependency detected in a pipeline definition.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use gleaner::observability::messages::validation::CyclicDependencyDetected;
///
/// let cycle = vec!["A".to_string(), "B".to_string(), "A".to_string()];
/// let msg = CyclicDependencyDetected {
///     pipeline: "query",
///     cycle: &cycle,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct CyclicDependencyDetected<'a> {
    pub pipeline: &'a str,
    pub cycle: &'a [String],
}

impl Display for CyclicDependencyDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Cyclic dependency detected in pipeline '{}': {}",
            self.pipeline,
            self.cycle.join(" -> ")
        )
    }
}

impl StructuredLog for CyclicDependencyDetected<'_> {
    fn log(&self) {
        tracing::error!(
            pipeline = self.pipeline,
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            pipeline = self.pipeline,
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
        )
    }
}

/// Unresolved input reference detected in a pipeline definition.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use gleaner::observability::messages::validation::UnresolvedInput;
///
/// let msg = UnresolvedInput {
///     node_id: "Reader",
///     input: "MissingRetriever",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct UnresolvedInput<'a> {
    pub node_id: &'a str,
    pub input: &'a str,
}

impl Display for UnresolvedInput<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' takes input from missing node '{}'",
            self.node_id, self.input
        )
    }
}

impl StructuredLog for UnresolvedInput<'_> {
    fn log(&self) {
        tracing::error!(
            node_id = self.node_id,
            input = self.input,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            node_id = self.node_id,
            input = self.input,
        )
    }
}

/// Duplicate node name detected in a pipeline definition.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use gleaner::observability::messages::validation::DuplicateNodeName;
///
/// let msg = DuplicateNodeName {
///     node_id: "Retriever",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct DuplicateNodeName<'a> {
    pub node_id: &'a str,
}

impl Display for DuplicateNodeName<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Duplicate node name: '{}'", self.node_id)
    }
}

impl StructuredLog for DuplicateNodeName<'_> {
    fn log(&self) {
        tracing::error!(
            node_id = self.node_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            node_id = self.node_id,
        )
    }
}

/// Input reference to an output branch the source node never declared.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use gleaner::observability::messages::validation::UndeclaredBranchReference;
///
/// let msg = UndeclaredBranchReference {
///     node_id: "Reader",
///     source: "Router",
///     branch: 3,
///     declared: 2,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct UndeclaredBranchReference<'a> {
    pub node_id: &'a str,
    pub source: &'a str,
    pub branch: usize,
    pub declared: usize,
}

impl Display for UndeclaredBranchReference<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' takes input from '{}.output_{}' but '{}' declares {} outgoing edge(s)",
            self.node_id, self.source, self.branch, self.source, self.declared
        )
    }
}

impl StructuredLog for UndeclaredBranchReference<'_> {
    fn log(&self) {
        tracing::error!(
            node_id = self.node_id,
            source = self.source,
            branch = self.branch,
            declared = self.declared,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            node_id = self.node_id,
            source = self.source,
            branch = self.branch,
            declared = self.declared,
        )
    }
}
