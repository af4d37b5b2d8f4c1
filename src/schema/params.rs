//! Run-time node options.
//!
//! Parameters arrive from two places with the same shape: the `params`
//! block of a component definition (constructor defaults) and the
//! [`RunParams`] passed to an invocation (per-run overrides). Nodes read
//! the merged map through the typed getters, which turn type mismatches
//! into [`NodeError::InvalidParam`] instead of panicking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::NodeError;

/// Reserved key enabling the debug trace for a single node.
pub const PARAM_DEBUG: &str = "debug";

/// An option map for one node invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeParams(pub BTreeMap<String, Value>);

impl NodeParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `self` on top of `base`; `self` wins on key collisions.
    pub fn layered_over(&self, base: &NodeParams) -> NodeParams {
        let mut merged = base.0.clone();
        merged.extend(self.0.clone());
        NodeParams(merged)
    }

    pub fn get_usize(&self, key: &str) -> Result<Option<usize>, NodeError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .map(|n| Some(n as usize))
                .ok_or_else(|| NodeError::InvalidParam {
                    name: key.to_string(),
                    reason: format!("expected a non-negative integer, got {}", value),
                }),
        }
    }

    pub fn get_f32(&self, key: &str) -> Result<Option<f32>, NodeError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(|n| Some(n as f32))
                .ok_or_else(|| NodeError::InvalidParam {
                    name: key.to_string(),
                    reason: format!("expected a number, got {}", value),
                }),
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, NodeError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| NodeError::InvalidParam {
                    name: key.to_string(),
                    reason: format!("expected a boolean, got {}", value),
                }),
        }
    }

    pub fn get_str(&self, key: &str) -> Result<Option<&str>, NodeError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| NodeError::InvalidParam {
                    name: key.to_string(),
                    reason: format!("expected a string, got {}", value),
                }),
        }
    }

    /// A list of strings, e.g. router extension lists.
    pub fn get_str_list(&self, key: &str) -> Result<Option<Vec<String>>, NodeError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| NodeError::InvalidParam {
                            name: key.to_string(),
                            reason: format!("expected a list of strings, got element {}", item),
                        })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => Err(NodeError::InvalidParam {
                name: key.to_string(),
                reason: format!("expected a list of strings, got {}", other),
            }),
        }
    }

    /// Whether this invocation asked for a debug trace via the reserved key.
    pub fn debug_requested(&self) -> bool {
        matches!(self.0.get(PARAM_DEBUG), Some(Value::Bool(true)))
    }
}

impl From<BTreeMap<String, Value>> for NodeParams {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

/// Per-run parameter overrides: one global layer plus per-node layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
    /// Options applied to every node in the run.
    #[serde(default)]
    pub global: NodeParams,
    /// Options applied to a single node, keyed by node instance name.
    #[serde(default)]
    pub per_node: BTreeMap<String, NodeParams>,
}

impl RunParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style global option.
    pub fn with_global(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.global.0.insert(key.into(), value.into());
        self
    }

    /// Builder-style option for a single node.
    pub fn for_node(
        mut self,
        node_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.per_node
            .entry(node_id.into())
            .or_default()
            .0
            .insert(key.into(), value.into());
        self
    }

    /// The effective option map for one node: global layered under
    /// per-node, per-node winning on collisions.
    pub fn resolve(&self, node_id: &str) -> NodeParams {
        match self.per_node.get(node_id) {
            Some(specific) => specific.layered_over(&self.global),
            None => self.global.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_node_params_override_global() {
        let params = RunParams::new()
            .with_global("top_k", 10)
            .for_node("Retriever", "top_k", 3);

        let resolved = params.resolve("Retriever");
        assert_eq!(resolved.get_usize("top_k").unwrap(), Some(3));

        let other = params.resolve("Reader");
        assert_eq!(other.get_usize("top_k").unwrap(), Some(10));
    }

    #[test]
    fn typed_getter_rejects_wrong_type() {
        let params = NodeParams::new().set("top_k", "ten");
        let err = params.get_usize("top_k").unwrap_err();
        assert!(err.to_string().contains("top_k"));
    }

    #[test]
    fn debug_key_is_only_honored_as_true() {
        assert!(NodeParams::new().set(PARAM_DEBUG, true).debug_requested());
        assert!(!NodeParams::new().set(PARAM_DEBUG, false).debug_requested());
        assert!(!NodeParams::new().set(PARAM_DEBUG, 1).debug_requested());
        assert!(!NodeParams::new().debug_requested());
    }
}
