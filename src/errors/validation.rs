// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur during pipeline graph validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A cycle was detected among node input references
    CyclicDependency {
        /// The cycle path showing the circular references
        cycle: Vec<String>,
    },
    /// A node references an input that doesn't exist
    UnresolvedInput {
        /// The node that has the unresolved input
        node_id: String,
        /// The input reference that couldn't be resolved
        input: String,
    },
    /// An input reference could not be parsed
    MalformedInput {
        /// The node carrying the reference
        node_id: String,
        /// The reference as written
        input: String,
    },
    /// Two nodes in the same pipeline share a name
    DuplicateNodeId {
        /// The duplicate node name
        node_id: String,
    },
    /// A node references an output branch the source never declared
    UndeclaredBranch {
        /// The node carrying the reference
        node_id: String,
        /// The source node whose branch is referenced
        source: String,
        /// The referenced branch index (1-based)
        branch: usize,
        /// How many outgoing branches the source declares
        declared: usize,
    },
    /// A pipeline references both root kinds
    RootConflict {
        /// The root referenced first
        first: String,
        /// The conflicting root
        second: String,
    },
    /// No node in the pipeline is fed by the root
    MissingRoot,
    /// A node declares no inputs and can never receive an active edge
    DisconnectedNode {
        /// The node without inputs
        node_id: String,
    },
    /// A pipeline definition contains no nodes
    EmptyPipeline {
        /// The pipeline name
        pipeline: String,
    },
    /// A pipeline node names a component that isn't declared
    UnknownComponent {
        /// The undeclared component name
        node_id: String,
    },
    /// Two component or pipeline definitions share a name
    DuplicateDefinition {
        /// The duplicated name
        name: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::CyclicDependency { cycle } => {
                write!(f, "Cyclic input references: {}", cycle.join(" -> "))
            }
            ValidationError::UnresolvedInput { node_id, input } => {
                write!(
                    f,
                    "Node '{}' takes input from '{}' which does not exist",
                    node_id, input
                )
            }
            ValidationError::MalformedInput { node_id, input } => {
                write!(
                    f,
                    "Node '{}' has malformed input reference '{}' (expected 'Name' or 'Name.output_k')",
                    node_id, input
                )
            }
            ValidationError::DuplicateNodeId { node_id } => {
                write!(f, "Duplicate node name: '{}'", node_id)
            }
            ValidationError::UndeclaredBranch {
                node_id,
                source,
                branch,
                declared,
            } => {
                write!(
                    f,
                    "Node '{}' takes input from '{}.output_{}' but '{}' declares {} outgoing edge(s)",
                    node_id, source, branch, source, declared
                )
            }
            ValidationError::RootConflict { first, second } => {
                write!(
                    f,
                    "Pipeline mixes roots: '{}' and '{}' cannot feed the same pipeline",
                    first, second
                )
            }
            ValidationError::MissingRoot => {
                write!(f, "No node takes input from the pipeline root")
            }
            ValidationError::DisconnectedNode { node_id } => {
                write!(
                    f,
                    "Node '{}' declares no inputs and can never execute",
                    node_id
                )
            }
            ValidationError::EmptyPipeline { pipeline } => {
                write!(f, "Pipeline '{}' declares no nodes", pipeline)
            }
            ValidationError::UnknownComponent { node_id } => {
                write!(
                    f,
                    "Pipeline node '{}' is not declared in the components section",
                    node_id
                )
            }
            ValidationError::DuplicateDefinition { name } => {
                write!(f, "Duplicate component or pipeline definition: '{}'", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
