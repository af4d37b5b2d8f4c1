use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::NodeError;
use crate::schema::{NodeParams, Payload};

/// 1-based index of an outgoing edge, as selected by a node at runtime.
///
/// Branches render as `output_1`, `output_2`, ... in pipeline definitions
/// and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutputBranch(pub usize);

impl OutputBranch {
    /// The default branch of single-output nodes.
    pub const FIRST: OutputBranch = OutputBranch(1);

    pub fn index(&self) -> usize {
        self.0
    }

    /// Parse `output_k` into a branch; returns `None` for anything else.
    pub fn parse(s: &str) -> Option<OutputBranch> {
        let digits = s.strip_prefix("output_")?;
        let index: usize = digits.parse().ok()?;
        if index == 0 {
            return None;
        }
        Some(OutputBranch(index))
    }
}

impl std::fmt::Display for OutputBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "output_{}", self.0)
    }
}

/// Everything a node receives for one invocation: the merged payload of
/// its active predecessors and the resolved option map for this run.
#[derive(Debug, Clone)]
pub struct NodeRequest {
    pub payload: Payload,
    pub params: NodeParams,
}

impl NodeRequest {
    pub fn new(payload: Payload, params: NodeParams) -> Self {
        Self { payload, params }
    }
}

/// What a node returns: the outgoing payload, the branch it routes to,
/// and an optional custom trace recorded when debugging is enabled.
#[derive(Debug, Clone)]
pub struct NodeResponse {
    pub payload: Payload,
    pub branch: OutputBranch,
    pub trace: Option<serde_json::Value>,
}

impl NodeResponse {
    /// Forward a payload on the default branch.
    pub fn forward(payload: Payload) -> Self {
        Self {
            payload,
            branch: OutputBranch::FIRST,
            trace: None,
        }
    }

    /// Route a payload to a specific branch.
    pub fn branched(payload: Payload, branch: usize) -> Self {
        Self {
            payload,
            branch: OutputBranch(branch),
            trace: None,
        }
    }

    /// Attach a custom trace value for the debug aggregator.
    pub fn with_trace(mut self, trace: serde_json::Value) -> Self {
        self.trace = Some(trace);
        self
    }
}

/// A unit of work in a pipeline.
///
/// Implementations declare how many outgoing edges they expose via
/// `outgoing_edges` and must select a branch in `[1, outgoing_edges]` on
/// every successful invocation; the executor rejects out-of-range
/// selections. Returning an error aborts the whole run.
#[async_trait]
pub trait PipelineNode: Send + Sync {
    async fn run(&self, req: NodeRequest) -> Result<NodeResponse, NodeError>;

    /// The node type name, as registered with the factory.
    fn name(&self) -> &'static str;

    /// Number of outgoing edges this node can route to.
    fn outgoing_edges(&self) -> usize {
        1
    }
}

impl std::fmt::Debug for dyn PipelineNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineNode")
            .field("name", &self.name())
            .field("outgoing_edges", &self.outgoing_edges())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_round_trips_through_display() {
        let branch = OutputBranch(3);
        assert_eq!(branch.to_string(), "output_3");
        assert_eq!(OutputBranch::parse("output_3"), Some(branch));
    }

    #[test]
    fn branch_parse_rejects_junk() {
        assert_eq!(OutputBranch::parse("output_0"), None);
        assert_eq!(OutputBranch::parse("output_"), None);
        assert_eq!(OutputBranch::parse("output_two"), None);
        assert_eq!(OutputBranch::parse("out_1"), None);
    }
}
