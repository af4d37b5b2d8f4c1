//! Definition validation for pipeline integrity and executability.
//!
//! This module provides comprehensive validation for pipeline definition
//! documents, ensuring that every declared pipeline is structurally
//! sound before any component is instantiated. The validation system
//! performs multiple checks in a specific order to provide meaningful
//! error messages and prevent invalid pipeline execution attempts.
//!
//! # Validation Pipeline
//!
//! The validation process follows a three-stage pipeline:
//!
//! 1. **Uniqueness Validation**: Ensures component names, pipeline names,
//!    and per-pipeline node names are unique
//! 2. **Reference Validation**: Verifies every node names a declared
//!    component and every input parses and resolves to the root or
//!    another node, with root references on the first branch
//! 3. **Cycle Detection**: Uses DFS to detect circular input chains
//!
//! This ordering is important because cycle detection requires a valid
//! graph structure, so reference validation must pass first.
//!
//! Branch ranges against each node's declared outgoing edges are checked
//! again after instantiation, when the actual node implementations are
//! known; this module checks only what the document alone can prove.
//!
//! # Algorithms
//!
//! ## Cycle Detection Algorithm
//! Uses **Depth-First Search (DFS) with recursion stack** to detect cycles:
//! - **Time Complexity**: O(V + E) where V = nodes, E = inputs
//! - **Space Complexity**: O(V) for visited set and recursion stack
//! - **Advantage**: Provides the actual cycle path for debugging
//! - **Detection Method**: Tracks nodes in current recursion path (gray nodes)
//!
//! ## Reference Validation
//! Uses **HashSet lookup** for efficient reference resolution:
//! - **Time Complexity**: O(V + E) where V = nodes, E = inputs
//! - **Space Complexity**: O(V) for the name sets
//! - **Method**: Build component and node name sets, then validate all references
//!
//! # Examples
//!
//! ## Basic validation usage
//! ```rust
//! use gleaner::config::{validate_config, PipelineConfig, ComponentConfig, PipelineDef, NodeDef};
//! use gleaner::schema::NodeParams;
//!
//! // Create a sample definition
//! let config = PipelineConfig {
//!     components: vec![ComponentConfig {
//!         name: "Reader".to_string(),
//!         kind: "overlap_reader".to_string(),
//!         params: NodeParams::new(),
//!     }],
//!     pipelines: vec![PipelineDef {
//!         name: "query".to_string(),
//!         nodes: vec![NodeDef {
//!             name: "Reader".to_string(),
//!             inputs: vec!["Query".to_string()],
//!         }],
//!     }],
//! };
//!
//! // Validate the definition
//! match validate_config(&config) {
//!     Ok(()) => println!("Definition is valid"),
//!     Err(errors) => {
//!         for error in errors {
//!             eprintln!("Validation error: {}", error);
//!         }
//!     }
//! }
//! ```

use std::collections::{HashMap, HashSet};

use crate::config::{PipelineConfig, PipelineDef};
use crate::errors::ValidationError;
use crate::observability::messages::validation::{
    CyclicDependencyDetected, UnusedComponent, ValidationCompleted, ValidationFailed,
    ValidationStarted,
};
use crate::observability::messages::StructuredLog;
use crate::pipeline::graph::detect_cycle;
use crate::pipeline::{InputRef, PipelineRoot};
use crate::traits::OutputBranch;

/// Validates a definition document for structural integrity and executability.
///
/// This is the main validation entry point that orchestrates all checks
/// in the correct order. The validation pipeline ensures that:
///
/// 1. **Names are unique** - No duplicate component names, pipeline
///    names, or node names within a pipeline
/// 2. **References are resolvable** - Every node names a declared
///    component, and every input parses and points to the root or an
///    existing node
/// 3. **Roots are consistent** - Each pipeline references exactly one
///    root kind, on its first branch
/// 4. **Graphs are acyclic** - No circular input chains that would
///    prevent scheduling
///
/// # Arguments
///
/// * `config` - The definition document to validate
///
/// # Returns
///
/// * `Ok(())` - Definition is valid and ready for instantiation
/// * `Err(Vec<ValidationError>)` - List of all validation errors found
///
/// # Examples
///
/// ```rust
/// use gleaner::config::{validate_config, PipelineConfig, ComponentConfig, PipelineDef, NodeDef};
/// use gleaner::errors::ValidationError;
/// use gleaner::schema::NodeParams;
///
/// // Create a definition with an unresolved input
/// let config = PipelineConfig {
///     components: vec![ComponentConfig {
///         name: "Reader".to_string(),
///         kind: "overlap_reader".to_string(),
///         params: NodeParams::new(),
///     }],
///     pipelines: vec![PipelineDef {
///         name: "query".to_string(),
///         nodes: vec![NodeDef {
///             name: "Reader".to_string(),
///             inputs: vec!["Missing".to_string()],
///         }],
///     }],
/// };
///
/// if let Err(errors) = validate_config(&config) {
///     for error in errors {
///         match error {
///             ValidationError::UnresolvedInput { node_id, input } => {
///                 eprintln!("Node '{}' references missing '{}'", node_id, input);
///             }
///             ValidationError::CyclicDependency { cycle } => {
///                 eprintln!("Cycle detected: {}", cycle.join(" -> "));
///             }
///             other => eprintln!("Validation failed: {}", other),
///         }
///     }
/// }
/// ```
///
/// # Error Accumulation
///
/// This function accumulates multiple errors when possible, allowing
/// users to see all validation issues at once rather than fixing them
/// one by one. However, cycle detection is skipped for a pipeline with
/// reference errors, since cycle detection requires a valid graph.
pub fn validate_config(config: &PipelineConfig) -> Result<(), Vec<ValidationError>> {
    ValidationStarted {
        component_count: config.components.len(),
        pipeline_count: config.pipelines.len(),
    }
    .log();

    let mut errors = Vec::new();

    if let Err(duplicate_errors) = validate_unique_names(config) {
        errors.extend(duplicate_errors);
    }

    for pipeline in &config.pipelines {
        if let Err(pipeline_errors) = validate_pipeline(pipeline, config) {
            errors.extend(pipeline_errors);
        }
    }

    let warning_count = warn_unused_components(config);

    if errors.is_empty() {
        ValidationCompleted {
            pipeline_count: config.pipelines.len(),
            warning_count,
        }
        .log();
        Ok(())
    } else {
        ValidationFailed {
            error_count: errors.len(),
        }
        .log();
        Err(errors)
    }
}

/// Validates that component and pipeline names are unique across the
/// document.
///
/// Component names must be unique because they serve as the key for:
/// - Node resolution from pipeline definitions
/// - Store resolution from `document_store` parameters
/// - Error reporting and debugging
///
/// This validation uses a `HashSet` to efficiently detect duplicates in
/// O(n) time.
fn validate_unique_names(config: &PipelineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen_components = HashSet::new();
    for component in &config.components {
        if !seen_components.insert(&component.name) {
            errors.push(ValidationError::DuplicateDefinition {
                name: component.name.clone(),
            });
        }
    }

    let mut seen_pipelines = HashSet::new();
    for pipeline in &config.pipelines {
        if !seen_pipelines.insert(&pipeline.name) {
            errors.push(ValidationError::DuplicateDefinition {
                name: pipeline.name.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates one pipeline definition: node uniqueness, component and
/// input resolution, root consistency, and acyclicity.
///
/// # Reference Resolution
///
/// Each input string must parse as `"Name"` or `"Name.output_k"` with
/// `k >= 1`. A parsed reference must name the pipeline root (`Query` or
/// `File`, first branch only) or another node in the same pipeline.
/// References to nodes declared later in the list are allowed; the
/// executor orders nodes topologically, not by declaration order.
///
/// # Root Consistency
///
/// A pipeline must reference exactly one root kind. Mixing `Query` and
/// `File` inputs in one pipeline is rejected, as is a non-empty pipeline
/// that never references a root (nothing could ever execute).
///
/// # Cycle Detection
///
/// Runs only when all references resolved, over the forward adjacency
/// (source -> dependents) in declaration order, so the reported cycle
/// path is deterministic.
fn validate_pipeline(
    pipeline: &PipelineDef,
    config: &PipelineConfig,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if pipeline.nodes.is_empty() {
        return Err(vec![ValidationError::EmptyPipeline {
            pipeline: pipeline.name.clone(),
        }]);
    }

    let mut node_names: HashSet<&String> = HashSet::new();
    let mut declared_order: Vec<String> = Vec::new();
    for node in &pipeline.nodes {
        if !node_names.insert(&node.name) {
            errors.push(ValidationError::DuplicateNodeId {
                node_id: node.name.clone(),
            });
        } else {
            declared_order.push(node.name.clone());
        }
    }

    let mut roots_seen: Vec<PipelineRoot> = Vec::new();
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    let mut references_resolve = true;

    for node in &pipeline.nodes {
        if config.component(&node.name).is_none() {
            errors.push(ValidationError::UnknownComponent {
                node_id: node.name.clone(),
            });
        }

        if node.inputs.is_empty() {
            errors.push(ValidationError::DisconnectedNode {
                node_id: node.name.clone(),
            });
            continue;
        }

        for input in &node.inputs {
            let Some(input_ref) = InputRef::parse(input) else {
                errors.push(ValidationError::MalformedInput {
                    node_id: node.name.clone(),
                    input: input.clone(),
                });
                references_resolve = false;
                continue;
            };

            if let Some(root) = PipelineRoot::parse(&input_ref.node) {
                if input_ref.branch != OutputBranch::FIRST {
                    errors.push(ValidationError::UndeclaredBranch {
                        node_id: node.name.clone(),
                        source: input_ref.node.clone(),
                        branch: input_ref.branch.index(),
                        declared: 1,
                    });
                }
                if !roots_seen.contains(&root) {
                    roots_seen.push(root);
                }
                continue;
            }

            if node_names.contains(&input_ref.node) {
                adjacency
                    .entry(input_ref.node.clone())
                    .or_default()
                    .push(node.name.clone());
            } else {
                errors.push(ValidationError::UnresolvedInput {
                    node_id: node.name.clone(),
                    input: input_ref.node.clone(),
                });
                references_resolve = false;
            }
        }
    }

    if roots_seen.len() > 1 {
        errors.push(ValidationError::RootConflict {
            first: roots_seen[0].as_str().to_string(),
            second: roots_seen[1].as_str().to_string(),
        });
    }
    if roots_seen.is_empty() {
        errors.push(ValidationError::MissingRoot);
    }

    if references_resolve {
        if let Some(cycle) = detect_cycle(&adjacency, &declared_order) {
            CyclicDependencyDetected {
                pipeline: &pipeline.name,
                cycle: &cycle,
            }
            .log();
            errors.push(ValidationError::CyclicDependency { cycle });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Warns about components no pipeline node and no store parameter
/// references. Unused components are legal, so this never fails
/// validation; it returns the number of warnings emitted.
fn warn_unused_components(config: &PipelineConfig) -> usize {
    let mut used: HashSet<&str> = HashSet::new();
    for pipeline in &config.pipelines {
        for node in &pipeline.nodes {
            used.insert(node.name.as_str());
        }
    }
    for component in &config.components {
        if let Ok(Some(store)) = component.params.get_str("document_store") {
            used.insert(store);
        }
    }

    let mut warning_count = 0;
    for component in &config.components {
        if !used.contains(component.name.as_str()) {
            UnusedComponent {
                component: &component.name,
            }
            .log();
            warning_count += 1;
        }
    }
    warning_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ComponentConfig, NodeDef};
    use crate::schema::NodeParams;

    fn component(name: &str, kind: &str) -> ComponentConfig {
        ComponentConfig {
            name: name.to_string(),
            kind: kind.to_string(),
            params: NodeParams::new(),
        }
    }

    fn node(name: &str, inputs: Vec<&str>) -> NodeDef {
        NodeDef {
            name: name.to_string(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn single_pipeline(nodes: Vec<NodeDef>) -> PipelineConfig {
        let components = nodes
            .iter()
            .map(|n| component(&n.name, "overlap_reader"))
            .collect();
        PipelineConfig {
            components,
            pipelines: vec![PipelineDef {
                name: "query".to_string(),
                nodes,
            }],
        }
    }

    #[test]
    fn valid_empty_document() {
        let config = PipelineConfig {
            components: vec![],
            pipelines: vec![],
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn valid_single_node() {
        let config = single_pipeline(vec![node("A", vec!["Query"])]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn valid_linear_chain() {
        let config = single_pipeline(vec![
            node("A", vec!["Query"]),
            node("B", vec!["A"]),
            node("C", vec!["B"]),
        ]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn valid_diamond_with_branches() {
        let config = single_pipeline(vec![
            node("Router", vec!["Query"]),
            node("B", vec!["Router.output_1"]),
            node("C", vec!["Router.output_2"]),
            node("Join", vec!["B", "C"]),
        ]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn forward_references_are_allowed() {
        let config = single_pipeline(vec![
            node("Tail", vec!["Head"]),
            node("Head", vec!["Query"]),
        ]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn duplicate_component_names_are_rejected() {
        let config = PipelineConfig {
            components: vec![
                component("Reader", "overlap_reader"),
                component("Reader", "bm25_retriever"),
            ],
            pipelines: vec![],
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ValidationError::DuplicateDefinition { name } if name == "Reader"
        ));
    }

    #[test]
    fn duplicate_pipeline_names_are_rejected() {
        let config = PipelineConfig {
            components: vec![component("A", "overlap_reader")],
            pipelines: vec![
                PipelineDef {
                    name: "query".to_string(),
                    nodes: vec![node("A", vec!["Query"])],
                },
                PipelineDef {
                    name: "query".to_string(),
                    nodes: vec![node("A", vec!["Query"])],
                },
            ],
        };

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::DuplicateDefinition { name } if name == "query")));
    }

    #[test]
    fn duplicate_node_in_pipeline_is_rejected() {
        let config = single_pipeline(vec![
            node("A", vec!["Query"]),
            node("A", vec!["Query"]),
        ]);

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::DuplicateNodeId { node_id } if node_id == "A")));
    }

    #[test]
    fn unknown_component_is_rejected() {
        let config = PipelineConfig {
            components: vec![],
            pipelines: vec![PipelineDef {
                name: "query".to_string(),
                nodes: vec![node("Ghost", vec!["Query"])],
            }],
        };

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::UnknownComponent { node_id } if node_id == "Ghost")));
    }

    #[test]
    fn malformed_input_is_rejected() {
        let config = single_pipeline(vec![
            node("Router", vec!["Query"]),
            node("B", vec!["Router.output_0"]),
        ]);

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::MalformedInput { node_id, input }
                if node_id == "B" && input == "Router.output_0"
        )));
    }

    #[test]
    fn unresolved_input_is_rejected() {
        let config = single_pipeline(vec![node("A", vec!["Missing"])]);

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::UnresolvedInput { node_id, input }
                if node_id == "A" && input == "Missing"
        )));
    }

    #[test]
    fn mixed_roots_are_rejected() {
        let config = single_pipeline(vec![
            node("A", vec!["Query"]),
            node("B", vec!["File"]),
            node("C", vec!["A", "B"]),
        ]);

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::RootConflict { .. })));
    }

    #[test]
    fn rootless_pipeline_is_rejected() {
        let config = single_pipeline(vec![node("A", vec!["B"]), node("B", vec!["A"])]);

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::MissingRoot)));
    }

    #[test]
    fn node_without_inputs_is_rejected() {
        let config = single_pipeline(vec![node("A", vec!["Query"]), node("B", vec![])]);

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::DisconnectedNode { node_id } if node_id == "B")));
    }

    #[test]
    fn root_reference_must_use_first_branch() {
        let config = single_pipeline(vec![node("A", vec!["Query.output_2"])]);

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::UndeclaredBranch { branch: 2, declared: 1, .. }
        )));
    }

    #[test]
    fn empty_pipeline_is_rejected() {
        let config = PipelineConfig {
            components: vec![],
            pipelines: vec![PipelineDef {
                name: "query".to_string(),
                nodes: vec![],
            }],
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ValidationError::EmptyPipeline { pipeline } if pipeline == "query"
        ));
    }

    #[test]
    fn cycle_reports_the_exact_path() {
        let config = single_pipeline(vec![
            node("A", vec!["Query", "C"]),
            node("B", vec!["A"]),
            node("C", vec!["B"]),
        ]);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ValidationError::CyclicDependency { cycle } => {
                assert_eq!(cycle, &vec!["A", "B", "C", "A"]);
            }
            other => panic!("Expected cycle error, got {:?}", other),
        }
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let config = single_pipeline(vec![node("A", vec!["Query", "A"])]);

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::CyclicDependency { .. })));
    }

    #[test]
    fn errors_accumulate_across_pipelines() {
        let config = PipelineConfig {
            components: vec![component("A", "overlap_reader")],
            pipelines: vec![
                PipelineDef {
                    name: "first".to_string(),
                    nodes: vec![node("Ghost", vec!["Query"])],
                },
                PipelineDef {
                    name: "second".to_string(),
                    nodes: vec![node("A", vec!["Missing"])],
                },
            ],
        };

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
