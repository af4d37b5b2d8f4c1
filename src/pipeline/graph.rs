//! Pipeline graph structure and structural validation.
//!
//! A [`PipelineGraph`] maps node names to node instances plus their
//! ordered upstream [`InputRef`] lists. Edges are branch-aware: an input
//! reference names both a source and one of the source's declared output
//! branches, and only the branch the source selects at runtime carries
//! data.
//!
//! # Validation pipeline
//!
//! Structural validation runs three stages, accumulating errors:
//!
//! 1. **Reference validation**: every input resolves to the root or an
//!    existing node, within the source's declared branch range
//! 2. **Root validation**: exactly one root kind is referenced, by at
//!    least one node
//! 3. **Cycle detection**: DFS with recursion-stack tracking, reporting
//!    the exact cycle path
//!
//! Cycle detection only runs once references resolve, since it needs a
//! structurally valid graph.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::errors::ValidationError;
use crate::traits::{OutputBranch, PipelineNode};

/// The synthetic root of a pipeline: not a node instance, carries the
/// invocation payload, and is referenced by name in input lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineRoot {
    /// Query-rooted pipelines start from query text.
    Query,
    /// File-rooted pipelines start from a list of paths.
    File,
}

impl PipelineRoot {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineRoot::Query => "Query",
            PipelineRoot::File => "File",
        }
    }

    /// Parse a root name as used in input lists.
    pub fn parse(s: &str) -> Option<PipelineRoot> {
        match s {
            "Query" => Some(PipelineRoot::Query),
            "File" => Some(PipelineRoot::File),
            _ => None,
        }
    }
}

impl std::fmt::Display for PipelineRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to an upstream output: the source name (a node or the
/// root) and one of its branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRef {
    pub node: String,
    pub branch: OutputBranch,
}

impl InputRef {
    pub fn new(node: impl Into<String>, branch: OutputBranch) -> Self {
        Self {
            node: node.into(),
            branch,
        }
    }

    /// Parse `"Name"` (implicit first branch) or `"Name.output_k"`.
    pub fn parse(s: &str) -> Option<InputRef> {
        if s.is_empty() {
            return None;
        }
        match s.rsplit_once('.') {
            Some((node, branch)) => {
                if node.is_empty() {
                    return None;
                }
                Some(InputRef::new(node, OutputBranch::parse(branch)?))
            }
            None => Some(InputRef::new(s, OutputBranch::FIRST)),
        }
    }
}

impl std::fmt::Display for InputRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.branch == OutputBranch::FIRST {
            f.write_str(&self.node)
        } else {
            write!(f, "{}.{}", self.node, self.branch)
        }
    }
}

/// A node instance plus its ordered upstream references.
pub struct NodeEntry {
    pub node: Arc<dyn PipelineNode>,
    pub inputs: Vec<InputRef>,
}

/// Named node instances wired into a branch-aware DAG under one
/// synthetic root.
///
/// The graph records insertion order, which breaks topological-order
/// ties so execution order is fully deterministic.
#[derive(Default)]
pub struct PipelineGraph {
    root: Option<PipelineRoot>,
    nodes: HashMap<String, NodeEntry>,
    insertion_order: Vec<String>,
}

impl PipelineGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root kind referenced by this graph's nodes, once one is.
    pub fn root(&self) -> Option<PipelineRoot> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node names in insertion order.
    pub fn node_names(&self) -> &[String] {
        &self.insertion_order
    }

    pub fn entry(&self, name: &str) -> Option<&NodeEntry> {
        self.nodes.get(name)
    }

    /// Add a node, validating it immediately against the nodes already
    /// present.
    ///
    /// Inputs must reference the root or previously added nodes, which
    /// keeps incrementally built graphs acyclic by construction. The
    /// batch construction path used by the config loader inserts
    /// permissively instead and runs [`validate`](Self::validate) once
    /// at the end.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        node: Arc<dyn PipelineNode>,
        inputs: Vec<InputRef>,
    ) -> Result<(), ValidationError> {
        let name = name.into();
        if self.nodes.contains_key(&name) {
            return Err(ValidationError::DuplicateNodeId { node_id: name });
        }
        if inputs.is_empty() {
            return Err(ValidationError::DisconnectedNode { node_id: name });
        }
        for input in &inputs {
            self.check_input(&name, input, true)?;
        }
        self.insertion_order.push(name.clone());
        self.nodes.insert(name, NodeEntry { node, inputs });
        Ok(())
    }

    /// Insert without reference checks; callers must run
    /// [`validate`](Self::validate) before executing.
    ///
    /// The first root reference still binds the graph's root kind so the
    /// invocation surface can be checked; a conflicting second kind is
    /// left for [`validate`](Self::validate) to report.
    pub(crate) fn insert(
        &mut self,
        name: impl Into<String>,
        node: Arc<dyn PipelineNode>,
        inputs: Vec<InputRef>,
    ) -> Result<(), ValidationError> {
        let name = name.into();
        if self.nodes.contains_key(&name) {
            return Err(ValidationError::DuplicateNodeId { node_id: name });
        }
        for input in &inputs {
            if let Some(root) = PipelineRoot::parse(&input.node) {
                self.root.get_or_insert(root);
            }
        }
        self.insertion_order.push(name.clone());
        self.nodes.insert(name, NodeEntry { node, inputs });
        Ok(())
    }

    /// Check one input reference of `node_id`; when `commit_root` is
    /// set, an acceptable root reference is recorded on the graph.
    fn check_input(
        &mut self,
        node_id: &str,
        input: &InputRef,
        commit_root: bool,
    ) -> Result<(), ValidationError> {
        if let Some(root) = PipelineRoot::parse(&input.node) {
            if input.branch != OutputBranch::FIRST {
                return Err(ValidationError::UndeclaredBranch {
                    node_id: node_id.to_string(),
                    source: input.node.clone(),
                    branch: input.branch.index(),
                    declared: 1,
                });
            }
            match self.root {
                None => {
                    if commit_root {
                        self.root = Some(root);
                    }
                }
                Some(existing) if existing != root => {
                    return Err(ValidationError::RootConflict {
                        first: existing.as_str().to_string(),
                        second: root.as_str().to_string(),
                    });
                }
                Some(_) => {}
            }
            return Ok(());
        }
        match self.nodes.get(&input.node) {
            None => Err(ValidationError::UnresolvedInput {
                node_id: node_id.to_string(),
                input: input.node.clone(),
            }),
            Some(entry) => {
                let declared = entry.node.outgoing_edges();
                if input.branch.index() > declared {
                    Err(ValidationError::UndeclaredBranch {
                        node_id: node_id.to_string(),
                        source: input.node.clone(),
                        branch: input.branch.index(),
                        declared,
                    })
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Validate the whole graph, accumulating all structural errors.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut roots_seen: Vec<PipelineRoot> = Vec::new();

        for name in &self.insertion_order {
            let entry = &self.nodes[name];
            if entry.inputs.is_empty() {
                errors.push(ValidationError::DisconnectedNode {
                    node_id: name.clone(),
                });
            }
            for input in &entry.inputs {
                if let Some(root) = PipelineRoot::parse(&input.node) {
                    if input.branch != OutputBranch::FIRST {
                        errors.push(ValidationError::UndeclaredBranch {
                            node_id: name.clone(),
                            source: input.node.clone(),
                            branch: input.branch.index(),
                            declared: 1,
                        });
                    }
                    if !roots_seen.contains(&root) {
                        roots_seen.push(root);
                    }
                    continue;
                }
                match self.nodes.get(&input.node) {
                    None => errors.push(ValidationError::UnresolvedInput {
                        node_id: name.clone(),
                        input: input.node.clone(),
                    }),
                    Some(source) => {
                        let declared = source.node.outgoing_edges();
                        if input.branch.index() > declared {
                            errors.push(ValidationError::UndeclaredBranch {
                                node_id: name.clone(),
                                source: input.node.clone(),
                                branch: input.branch.index(),
                                declared,
                            });
                        }
                    }
                }
            }
        }

        if roots_seen.len() > 1 {
            errors.push(ValidationError::RootConflict {
                first: roots_seen[0].as_str().to_string(),
                second: roots_seen[1].as_str().to_string(),
            });
        }
        if roots_seen.is_empty() && !self.nodes.is_empty() {
            errors.push(ValidationError::MissingRoot);
        }

        // Cycle detection needs resolvable references.
        if errors.is_empty() {
            if let Some(cycle) = detect_cycle(&self.dependents(), &self.insertion_order) {
                errors.push(ValidationError::CyclicDependency { cycle });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Forward adjacency over node-to-node edges: source -> dependents,
    /// one entry per edge (parallel edges repeat the dependent).
    pub(crate) fn dependents(&self) -> HashMap<String, Vec<String>> {
        let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
        for name in &self.insertion_order {
            for input in &self.nodes[name].inputs {
                if PipelineRoot::parse(&input.node).is_some() {
                    continue;
                }
                adjacency
                    .entry(input.node.clone())
                    .or_default()
                    .push(name.clone());
            }
        }
        adjacency
    }

    /// Deterministic topological order: Kahn's algorithm seeded from
    /// root-fed nodes, insertion order breaking ties.
    ///
    /// The order is unique up to nodes the graph genuinely leaves
    /// unordered, and those ties always resolve the same way, so
    /// repeated runs schedule identically.
    pub fn execution_order(&self) -> Result<Vec<String>, ValidationError> {
        let index_of: HashMap<&str, usize> = self
            .insertion_order
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let mut in_degree: HashMap<&str, usize> = self
            .insertion_order
            .iter()
            .map(|name| (name.as_str(), 0))
            .collect();
        let adjacency = self.dependents();
        for dependents in adjacency.values() {
            for dependent in dependents {
                if let Some(count) = in_degree.get_mut(dependent.as_str()) {
                    *count += 1;
                }
            }
        }

        let mut ready: std::collections::BinaryHeap<std::cmp::Reverse<usize>> = in_degree
            .iter()
            .filter(|(_, &count)| count == 0)
            .map(|(name, _)| std::cmp::Reverse(index_of[name]))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(std::cmp::Reverse(idx)) = ready.pop() {
            let name = &self.insertion_order[idx];
            order.push(name.clone());
            if let Some(dependents) = adjacency.get(name) {
                for dependent in dependents {
                    let count = in_degree.get_mut(dependent.as_str()).unwrap();
                    *count -= 1;
                    if *count == 0 {
                        ready.push(std::cmp::Reverse(index_of[dependent.as_str()]));
                    }
                }
            }
        }

        if order.len() != self.nodes.len() {
            let cycle = detect_cycle(&adjacency, &self.insertion_order)
                .unwrap_or_else(|| {
                    self.insertion_order
                        .iter()
                        .filter(|name| !order.contains(name))
                        .cloned()
                        .collect()
                });
            return Err(ValidationError::CyclicDependency { cycle });
        }
        Ok(order)
    }
}

/// DFS cycle detection with recursion-stack tracking.
///
/// Walks the forward adjacency (source -> dependents) from every node in
/// the given deterministic start order. Hitting a node already on the
/// recursion stack means a back edge; the cycle path is extracted from
/// the current DFS path and closed with the repeated node.
pub(crate) fn detect_cycle(
    adjacency: &HashMap<String, Vec<String>>,
    start_order: &[String],
) -> Option<Vec<String>> {
    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for node in start_order {
        if !visited.contains(node.as_str()) {
            if let Some(cycle) =
                dfs_cycle(node, adjacency, &mut visited, &mut rec_stack, &mut path)
            {
                return Some(cycle);
            }
        }
    }
    None
}

fn dfs_cycle(
    node: &str,
    adjacency: &HashMap<String, Vec<String>>,
    visited: &mut HashSet<String>,
    rec_stack: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> Option<Vec<String>> {
    visited.insert(node.to_string());
    rec_stack.insert(node.to_string());
    path.push(node.to_string());

    if let Some(neighbors) = adjacency.get(node) {
        for neighbor in neighbors {
            if !visited.contains(neighbor.as_str()) {
                if let Some(cycle) = dfs_cycle(neighbor, adjacency, visited, rec_stack, path) {
                    return Some(cycle);
                }
            } else if rec_stack.contains(neighbor.as_str()) {
                let cycle_start = path.iter().position(|x| x == neighbor).unwrap();
                let mut cycle = path[cycle_start..].to_vec();
                cycle.push(neighbor.clone());
                return Some(cycle);
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    None
}
