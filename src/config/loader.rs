// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

use crate::errors::ConfigError;
use crate::schema::NodeParams;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level declarative pipeline definition.
///
/// A definition document declares reusable components (node and store
/// instances with their construction parameters) and named pipelines
/// that wire those components into DAGs. It is typically loaded from a
/// YAML file and handed to the runtime builder.
///
/// # Fields
/// * `components` - Component instances available to every pipeline
/// * `pipelines` - Named pipelines wiring components into DAGs
///
/// # Example
/// ```yaml
/// components:
///   - name: Store
///     type: memory_store
///   - name: Retriever
///     type: bm25_retriever
///     params:
///       document_store: Store
///       top_k: 5
/// pipelines:
///   - name: query
///     nodes:
///       - name: Retriever
///         inputs: [Query]
/// ```
#[derive(Debug, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
    #[serde(default)]
    pub pipelines: Vec<PipelineDef>,
}

impl PipelineConfig {
    /// The component definition with the given name, if any.
    pub fn component(&self, name: &str) -> Option<&ComponentConfig> {
        self.components.iter().find(|c| c.name == name)
    }

    /// The pipeline definition with the given name, if any.
    pub fn pipeline(&self, name: &str) -> Option<&PipelineDef> {
        self.pipelines.iter().find(|p| p.name == name)
    }
}

/// Configuration for a single reusable component.
///
/// A component is one node or store instance. The `type` field selects
/// the implementation from the factory's registry; `params` carries
/// construction parameters specific to that type.
///
/// # Fields
/// * `name` - Unique name, referenced from pipeline node lists
/// * `type` - Implementation type name registered with the factory
/// * `params` - Construction parameters for this instance
///
/// # Example
/// ```yaml
/// name: Retriever
/// type: bm25_retriever
/// params:
///   document_store: Store
///   top_k: 5
/// ```
#[derive(Debug, Deserialize)]
pub struct ComponentConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: NodeParams,
}

/// A named pipeline wiring components into a DAG.
///
/// # Fields
/// * `name` - Pipeline name, selected at build time
/// * `nodes` - Node list in declaration order
#[derive(Debug, Deserialize)]
pub struct PipelineDef {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
}

/// One node in a pipeline: a component reference plus its inputs.
///
/// The node name must match a declared component. Inputs reference the
/// pipeline root (`Query` or `File`) or another node, optionally with an
/// explicit branch (`Router.output_2`).
#[derive(Debug, Deserialize)]
pub struct NodeDef {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<String>,
}

/// Load a pipeline definition from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let cfg: PipelineConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load and validate a pipeline definition from a YAML file.
///
/// This function loads the document and validates every declared
/// pipeline: component references must resolve, inputs must parse and
/// resolve within declared branch ranges, and the node graphs must be
/// acyclic with exactly one root kind each.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}
