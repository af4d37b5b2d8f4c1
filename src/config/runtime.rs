// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::{load_and_validate_config, PipelineConfig, PipelineDef};
use crate::errors::{ConfigError, ValidationError};
use crate::nodes::NodeFactory;
use crate::pipeline::{InputRef, Pipeline, PipelineGraph};
use crate::traits::DocumentStore;

/// A fully instantiated definition document.
///
/// Stores are built once and shared: a writer in an indexing pipeline and
/// a retriever in a query pipeline that name the same store component
/// operate on the same instance, so documents indexed through one
/// pipeline are retrievable through the other.
pub struct Runtime {
    stores: HashMap<String, Arc<dyn DocumentStore>>,
    pipelines: HashMap<String, Pipeline>,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut stores: Vec<&str> = self.stores.keys().map(String::as_str).collect();
        stores.sort_unstable();
        f.debug_struct("Runtime")
            .field("stores", &stores)
            .field("pipelines", &self.pipeline_names())
            .finish()
    }
}

impl Runtime {
    /// Look up a pipeline by its definition name.
    pub fn pipeline(&self, name: &str) -> Option<&Pipeline> {
        self.pipelines.get(name)
    }

    /// Look up a store component by name.
    pub fn store(&self, name: &str) -> Option<Arc<dyn DocumentStore>> {
        self.stores.get(name).cloned()
    }

    /// Names of all instantiated pipelines, sorted for stable output.
    pub fn pipeline_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pipelines.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Pipeline runtime builder - orchestrates store and node creation from a
/// definition document.
///
/// The `RuntimeBuilder` provides a clean interface for turning a parsed
/// definition into runnable pipelines. It coordinates the creation of
/// stores and nodes, ensuring stores exist before the nodes whose
/// parameters reference them, and validates each assembled graph before
/// handing it over.
///
/// # Examples
///
/// ## Building a runtime from a definition
/// ```
/// use gleaner::config::{PipelineConfig, ComponentConfig, PipelineDef, NodeDef, RuntimeBuilder};
/// use gleaner::schema::NodeParams;
///
/// let config = PipelineConfig {
///     components: vec![
///         ComponentConfig {
///             name: "Store".to_string(),
///             kind: "memory_store".to_string(),
///             params: NodeParams::new(),
///         },
///         ComponentConfig {
///             name: "Retriever".to_string(),
///             kind: "bm25_retriever".to_string(),
///             params: NodeParams::new().set("document_store", "Store"),
///         },
///     ],
///     pipelines: vec![PipelineDef {
///         name: "query".to_string(),
///         nodes: vec![NodeDef {
///             name: "Retriever".to_string(),
///             inputs: vec!["Query".to_string()],
///         }],
///     }],
/// };
///
/// let runtime = RuntimeBuilder::from_config(&config).unwrap();
///
/// // Runtime is ready for pipeline execution
/// assert!(runtime.pipeline("query").is_some());
/// assert!(runtime.store("Store").is_some());
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build every pipeline in the document against one shared set of
    /// stores.
    ///
    /// # Arguments
    /// * `config` - Definition containing component and pipeline declarations
    ///
    /// # Returns
    /// A [`Runtime`] holding all instantiated stores and pipelines
    pub fn from_config(config: &PipelineConfig) -> Result<Runtime, ConfigError> {
        let stores = Self::build_stores(config)?;
        let mut pipelines = HashMap::new();
        for definition in &config.pipelines {
            let pipeline = Self::assemble(definition, config, &stores)?;
            pipelines.insert(definition.name.clone(), pipeline);
        }
        Ok(Runtime { stores, pipelines })
    }

    /// Build a single named pipeline.
    ///
    /// Stores are still created for the whole document, since any node's
    /// parameters may reference them. Pipelines built through separate
    /// `build` calls do NOT share stores; use [`from_config`](Self::from_config)
    /// when an indexing and a query pipeline must see the same documents.
    pub fn build(config: &PipelineConfig, pipeline_name: &str) -> Result<Pipeline, ConfigError> {
        let definition = config
            .pipeline(pipeline_name)
            .ok_or_else(|| ConfigError::UnknownPipeline(pipeline_name.to_string()))?;
        let stores = Self::build_stores(config)?;
        Self::assemble(definition, config, &stores)
    }

    /// Instantiate every store-typed component, keyed by component name.
    fn build_stores(
        config: &PipelineConfig,
    ) -> Result<HashMap<String, Arc<dyn DocumentStore>>, ConfigError> {
        let mut stores = HashMap::new();
        for component in &config.components {
            if NodeFactory::is_store_type(&component.kind) {
                stores.insert(component.name.clone(), NodeFactory::create_store(component)?);
            }
        }
        Ok(stores)
    }

    /// Assemble one pipeline definition into a validated [`Pipeline`].
    ///
    /// Nodes are inserted permissively in declaration order (definitions
    /// may reference nodes declared later), then the whole graph is
    /// validated in one pass. Branch ranges against each node's declared
    /// outgoing edges are checked here for the first time, since they
    /// require the instantiated node implementations.
    fn assemble(
        definition: &PipelineDef,
        config: &PipelineConfig,
        stores: &HashMap<String, Arc<dyn DocumentStore>>,
    ) -> Result<Pipeline, ConfigError> {
        let mut graph = PipelineGraph::new();

        for node_def in &definition.nodes {
            let component = config.component(&node_def.name).ok_or_else(|| {
                ConfigError::Invalid(vec![ValidationError::UnknownComponent {
                    node_id: node_def.name.clone(),
                }])
            })?;
            let node = NodeFactory::create_node(component, stores)?;

            let mut inputs = Vec::with_capacity(node_def.inputs.len());
            for input in &node_def.inputs {
                match InputRef::parse(input) {
                    Some(input_ref) => inputs.push(input_ref),
                    None => {
                        return Err(ConfigError::Invalid(vec![ValidationError::MalformedInput {
                            node_id: node_def.name.clone(),
                            input: input.clone(),
                        }]))
                    }
                }
            }

            graph
                .insert(&node_def.name, node, inputs)
                .map_err(|e| ConfigError::Invalid(vec![e]))?;
        }

        graph.validate().map_err(ConfigError::Invalid)?;
        Ok(Pipeline::from_graph(graph))
    }
}

/// Load a definition file and instantiate every pipeline in it.
pub fn load_runtime<P: AsRef<Path>>(path: P) -> Result<Runtime, ConfigError> {
    let config = load_and_validate_config(path)?;
    RuntimeBuilder::from_config(&config)
}

/// Load a definition file and instantiate one named pipeline from it.
pub fn load_pipeline<P: AsRef<Path>>(path: P, pipeline_name: &str) -> Result<Pipeline, ConfigError> {
    let config = load_and_validate_config(path)?;
    RuntimeBuilder::build(&config, pipeline_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ComponentConfig, NodeDef};
    use crate::pipeline::PipelineRoot;
    use crate::schema::NodeParams;

    fn component(name: &str, kind: &str, params: NodeParams) -> ComponentConfig {
        ComponentConfig {
            name: name.to_string(),
            kind: kind.to_string(),
            params,
        }
    }

    fn node(name: &str, inputs: Vec<&str>) -> NodeDef {
        NodeDef {
            name: name.to_string(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn query_config() -> PipelineConfig {
        PipelineConfig {
            components: vec![
                component("Store", "memory_store", NodeParams::new()),
                component(
                    "Retriever",
                    "bm25_retriever",
                    NodeParams::new().set("document_store", "Store"),
                ),
                component("Reader", "overlap_reader", NodeParams::new()),
            ],
            pipelines: vec![PipelineDef {
                name: "query".to_string(),
                nodes: vec![
                    node("Retriever", vec!["Query"]),
                    node("Reader", vec!["Retriever"]),
                ],
            }],
        }
    }

    #[test]
    fn builds_a_named_pipeline() {
        let pipeline = RuntimeBuilder::build(&query_config(), "query").unwrap();
        assert_eq!(pipeline.node_names(), &["Retriever", "Reader"]);
        assert_eq!(pipeline.root(), Some(PipelineRoot::Query));
    }

    #[test]
    fn unknown_pipeline_name_is_rejected() {
        let err = RuntimeBuilder::build(&query_config(), "indexing").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPipeline(name) if name == "indexing"));
    }

    #[test]
    fn from_config_instantiates_every_pipeline() {
        let mut config = query_config();
        config
            .components
            .push(component(
                "Writer",
                "document_writer",
                NodeParams::new().set("document_store", "Store"),
            ));
        config.pipelines.push(PipelineDef {
            name: "indexing".to_string(),
            nodes: vec![node("Writer", vec!["File"])],
        });

        let runtime = RuntimeBuilder::from_config(&config).unwrap();
        assert_eq!(runtime.pipeline_names(), vec!["indexing", "query"]);
        assert!(runtime.store("Store").is_some());
        assert_eq!(
            runtime.pipeline("indexing").unwrap().root(),
            Some(PipelineRoot::File)
        );
    }

    #[test]
    fn unknown_component_type_fails_the_build() {
        let config = PipelineConfig {
            components: vec![component("X", "transformer_reader", NodeParams::new())],
            pipelines: vec![PipelineDef {
                name: "query".to_string(),
                nodes: vec![node("X", vec!["Query"])],
            }],
        };

        let err = RuntimeBuilder::build(&config, "query").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownComponentType { kind, .. } if kind == "transformer_reader"));
    }

    #[test]
    fn branch_outside_the_declared_range_fails_validation() {
        let config = PipelineConfig {
            components: vec![
                component("Router", "query_router", NodeParams::new()),
                component("Reader", "overlap_reader", NodeParams::new()),
            ],
            pipelines: vec![PipelineDef {
                name: "query".to_string(),
                nodes: vec![
                    node("Router", vec!["Query"]),
                    node("Reader", vec!["Router.output_3"]),
                ],
            }],
        };

        let err = RuntimeBuilder::build(&config, "query").unwrap_err();
        match err {
            ConfigError::Invalid(errors) => {
                assert!(errors.iter().any(|e| matches!(
                    e,
                    ValidationError::UndeclaredBranch { branch: 3, declared: 2, .. }
                )));
            }
            other => panic!("Expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn node_definition_without_a_component_is_rejected() {
        let config = PipelineConfig {
            components: vec![],
            pipelines: vec![PipelineDef {
                name: "query".to_string(),
                nodes: vec![node("Ghost", vec!["Query"])],
            }],
        };

        let err = RuntimeBuilder::build(&config, "query").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
