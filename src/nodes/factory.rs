use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ComponentConfig;
use crate::errors::ConfigError;
use crate::nodes::{
    Bm25Retriever, DocumentSplitter, DocumentWriter, FileTypeRouter, JoinDocuments,
    MarkdownConverter, OverlapReader, QueryRouter, TextConverter,
};
use crate::store::InMemoryDocumentStore;
use crate::traits::{DocumentStore, PipelineNode};

/// Factory for creating node and store instances from component definitions.
pub struct NodeFactory;

impl NodeFactory {
    /// Whether a component type builds a document store rather than a node.
    ///
    /// Stores are built before nodes so node params can reference them by
    /// component name.
    pub fn is_store_type(kind: &str) -> bool {
        matches!(kind, "memory_store")
    }

    /// Create a document store instance from a component definition.
    pub fn create_store(
        component: &ComponentConfig,
    ) -> Result<Arc<dyn DocumentStore>, ConfigError> {
        match component.kind.as_str() {
            "memory_store" => Ok(Arc::new(InMemoryDocumentStore::new())),
            other => Err(ConfigError::UnknownComponentType {
                component: component.name.clone(),
                kind: other.to_string(),
            }),
        }
    }

    /// Create a node instance from a component definition.
    ///
    /// The `type` field selects the implementation:
    /// - "text_converter" -> TextConverter
    /// - "markdown_converter" -> MarkdownConverter
    /// - "document_splitter" -> DocumentSplitter (split_length, split_overlap)
    /// - "bm25_retriever" -> Bm25Retriever (document_store required; top_k, k1, b)
    /// - "overlap_reader" -> OverlapReader (top_k)
    /// - "query_router" -> QueryRouter
    /// - "file_type_router" -> FileTypeRouter (routes required)
    /// - "join_documents" -> JoinDocuments (join_mode, top_k)
    /// - "document_writer" -> DocumentWriter (document_store required)
    pub fn create_node(
        component: &ComponentConfig,
        stores: &HashMap<String, Arc<dyn DocumentStore>>,
    ) -> Result<Arc<dyn PipelineNode>, ConfigError> {
        match component.kind.as_str() {
            "text_converter" => Ok(Arc::new(TextConverter::new())),
            "markdown_converter" => Ok(Arc::new(MarkdownConverter::new())),

            "document_splitter" => {
                let length = component
                    .params
                    .get_usize("split_length")
                    .map_err(|e| Self::bad(component, e))?
                    .unwrap_or(200);
                let overlap = component
                    .params
                    .get_usize("split_overlap")
                    .map_err(|e| Self::bad(component, e))?
                    .unwrap_or(0);
                if overlap >= length {
                    return Err(ConfigError::BadComponent {
                        component: component.name.clone(),
                        reason: format!(
                            "split_overlap ({}) must be smaller than split_length ({})",
                            overlap, length
                        ),
                    });
                }
                Ok(Arc::new(DocumentSplitter::with_window(length, overlap)))
            }

            "bm25_retriever" => {
                let store = Self::require_store(component, stores)?;
                let top_k = component
                    .params
                    .get_usize("top_k")
                    .map_err(|e| Self::bad(component, e))?
                    .unwrap_or(10);
                let k1 = component
                    .params
                    .get_f32("k1")
                    .map_err(|e| Self::bad(component, e))?
                    .unwrap_or(1.2);
                let b = component
                    .params
                    .get_f32("b")
                    .map_err(|e| Self::bad(component, e))?
                    .unwrap_or(0.75);
                Ok(Arc::new(Bm25Retriever::with_parameters(store, top_k, k1, b)))
            }

            "overlap_reader" => {
                let top_k = component
                    .params
                    .get_usize("top_k")
                    .map_err(|e| Self::bad(component, e))?;
                Ok(Arc::new(match top_k {
                    Some(k) => OverlapReader::with_top_k(k),
                    None => OverlapReader::new(),
                }))
            }

            "query_router" => Ok(Arc::new(QueryRouter::new())),

            "file_type_router" => {
                let routes = Self::extension_routes(component)?;
                FileTypeRouter::new(routes)
                    .map(|router| Arc::new(router) as Arc<dyn PipelineNode>)
                    .map_err(|e| Self::bad(component, e))
            }

            "join_documents" => {
                let top_k = component
                    .params
                    .get_usize("top_k")
                    .map_err(|e| Self::bad(component, e))?;
                match component
                    .params
                    .get_str("join_mode")
                    .map_err(|e| Self::bad(component, e))?
                {
                    Some(mode) => JoinDocuments::with_mode(mode, top_k)
                        .map(|join| Arc::new(join) as Arc<dyn PipelineNode>)
                        .map_err(|e| Self::bad(component, e)),
                    None => Ok(Arc::new(JoinDocuments::new())),
                }
            }

            "document_writer" => {
                let store = Self::require_store(component, stores)?;
                Ok(Arc::new(DocumentWriter::new(store)))
            }

            other => Err(ConfigError::UnknownComponentType {
                component: component.name.clone(),
                kind: other.to_string(),
            }),
        }
    }

    /// List all available component types, stores included.
    pub fn list_available_types() -> Vec<&'static str> {
        vec![
            "memory_store",
            "text_converter",
            "markdown_converter",
            "document_splitter",
            "bm25_retriever",
            "overlap_reader",
            "query_router",
            "file_type_router",
            "join_documents",
            "document_writer",
        ]
    }

    fn require_store(
        component: &ComponentConfig,
        stores: &HashMap<String, Arc<dyn DocumentStore>>,
    ) -> Result<Arc<dyn DocumentStore>, ConfigError> {
        let reference = component
            .params
            .get_str("document_store")
            .map_err(|e| Self::bad(component, e))?
            .ok_or_else(|| ConfigError::BadComponent {
                component: component.name.clone(),
                reason: "missing required 'document_store' parameter".to_string(),
            })?;
        stores
            .get(reference)
            .cloned()
            .ok_or_else(|| ConfigError::BadComponent {
                component: component.name.clone(),
                reason: format!("'document_store' references unknown store '{}'", reference),
            })
    }

    /// Parse the `routes` parameter: a list of extension lists, one per
    /// outgoing branch.
    fn extension_routes(component: &ComponentConfig) -> Result<Vec<Vec<String>>, ConfigError> {
        let value = component.params.get("routes").ok_or_else(|| {
            ConfigError::BadComponent {
                component: component.name.clone(),
                reason: "missing required 'routes' parameter".to_string(),
            }
        })?;
        let serde_json::Value::Array(outer) = value else {
            return Err(ConfigError::BadComponent {
                component: component.name.clone(),
                reason: "'routes' must be a list of extension lists".to_string(),
            });
        };
        outer
            .iter()
            .map(|entry| match entry {
                serde_json::Value::Array(exts) => exts
                    .iter()
                    .map(|ext| {
                        ext.as_str().map(str::to_string).ok_or_else(|| {
                            ConfigError::BadComponent {
                                component: component.name.clone(),
                                reason: format!("'routes' entries must be strings, got {}", ext),
                            }
                        })
                    })
                    .collect::<Result<Vec<_>, _>>(),
                other => Err(ConfigError::BadComponent {
                    component: component.name.clone(),
                    reason: format!("'routes' must be a list of extension lists, got {}", other),
                }),
            })
            .collect()
    }

    fn bad(component: &ComponentConfig, error: impl std::fmt::Display) -> ConfigError {
        ConfigError::BadComponent {
            component: component.name.clone(),
            reason: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NodeParams;
    use serde_json::json;

    fn component(name: &str, kind: &str, params: NodeParams) -> ComponentConfig {
        ComponentConfig {
            name: name.to_string(),
            kind: kind.to_string(),
            params,
        }
    }

    fn stores_with_memory() -> HashMap<String, Arc<dyn DocumentStore>> {
        let mut stores: HashMap<String, Arc<dyn DocumentStore>> = HashMap::new();
        stores.insert("Store".to_string(), Arc::new(InMemoryDocumentStore::new()));
        stores
    }

    #[test]
    fn creates_every_registered_node_type() {
        let stores = stores_with_memory();
        let with_store = NodeParams::new().set("document_store", "Store");
        let routed = NodeParams::new().set("routes", json!([["txt"], ["md"]]));

        let cases = vec![
            component("C", "text_converter", NodeParams::new()),
            component("M", "markdown_converter", NodeParams::new()),
            component("S", "document_splitter", NodeParams::new()),
            component("R", "bm25_retriever", with_store.clone()),
            component("Rd", "overlap_reader", NodeParams::new()),
            component("Q", "query_router", NodeParams::new()),
            component("F", "file_type_router", routed),
            component("J", "join_documents", NodeParams::new()),
            component("W", "document_writer", with_store),
        ];
        for case in cases {
            let node = NodeFactory::create_node(&case, &stores);
            assert!(node.is_ok(), "failed to create '{}': {:?}", case.kind, node.err());
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = NodeFactory::create_node(
            &component("X", "transformer_reader", NodeParams::new()),
            &HashMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownComponentType { .. }));
    }

    #[test]
    fn store_backed_node_requires_store_reference() {
        let err = NodeFactory::create_node(
            &component("R", "bm25_retriever", NodeParams::new()),
            &HashMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::BadComponent { .. }));
    }

    #[test]
    fn dangling_store_reference_is_rejected() {
        let params = NodeParams::new().set("document_store", "Nowhere");
        let err = NodeFactory::create_node(
            &component("R", "bm25_retriever", params),
            &HashMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::BadComponent { .. }));
    }

    #[test]
    fn splitter_rejects_overlap_not_smaller_than_length() {
        let params = NodeParams::new().set("split_length", 4).set("split_overlap", 4);
        let err = NodeFactory::create_node(
            &component("S", "document_splitter", params),
            &HashMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::BadComponent { .. }));
    }

    #[test]
    fn memory_store_is_the_only_store_type() {
        assert!(NodeFactory::is_store_type("memory_store"));
        assert!(!NodeFactory::is_store_type("bm25_retriever"));
        let store = NodeFactory::create_store(&component("S", "memory_store", NodeParams::new()));
        assert!(store.is_ok());
    }
}
