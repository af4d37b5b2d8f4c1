// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Instant;

use crate::engine::trace::{DebugAggregator, PipelineOutput};
use crate::errors::ExecutionError;
use crate::observability::messages::engine::{
    ExecutionOrderComputed, RunCompleted, RunFailed, RunStarted,
};
use crate::observability::messages::node::{
    NodeExecutionCompleted, NodeExecutionFailed, NodeExecutionStarted, NodeSkipped,
};
use crate::observability::messages::StructuredLog;
use crate::pipeline::{PipelineGraph, PipelineRoot};
use crate::schema::{Payload, RunParams};
use crate::traits::executor::PipelineExecutor;
use crate::traits::node::{NodeRequest, OutputBranch};

/// Sequential executor that runs nodes one at a time in deterministic
/// topological order with branch-aware edge routing.
///
/// This is the reference execution strategy: no two nodes ever run
/// concurrently, so a run is fully reproducible and node implementations
/// never contend for shared state.
///
/// ## Execution Strategy
///
/// The executor processes a run in distinct phases:
/// 1. **Scheduling**: Computes a total order over the graph using Kahn's
///    algorithm, breaking ties by node insertion order
/// 2. **Edge Activation**: Before each node, inspects its declared
///    inputs and keeps only the active ones: the root is always active,
///    a node output is active only if that node executed and selected
///    the referenced branch
/// 3. **Payload Merging**: Merges the payloads arriving over active
///    edges in declared input order, left to right
/// 4. **Node Execution**: Resolves run parameters for the node, invokes
///    it, and validates the selected branch against its declared range
///
/// ## Branch Routing
///
/// A node with no active incoming edges is skipped, not failed. Its own
/// outputs then never activate, so an entire unselected branch of the
/// graph prunes itself without any per-node bookkeeping.
///
/// ## Debug Traces
///
/// When the run requests tracing (or a node requests it via the reserved
/// `debug` parameter), the executor records the merged input and the
/// emitted output for exactly the nodes that executed. Skipped nodes
/// leave no entry.
pub struct SequentialExecutor;

impl SequentialExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SequentialExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PipelineExecutor for SequentialExecutor {
    async fn execute(
        &self,
        graph: &PipelineGraph,
        input: Payload,
        params: &RunParams,
        debug: bool,
    ) -> Result<PipelineOutput, ExecutionError> {
        if graph.is_empty() {
            return Err(ExecutionError::EmptyPipeline);
        }

        // Cycles at this point mean the graph bypassed validation.
        let order = graph
            .execution_order()
            .map_err(|e| ExecutionError::InternalError {
                message: format!(
                    "Scheduling failed (should have been caught during validation): {}",
                    e
                ),
            })?;

        let root_label = graph
            .root()
            .map(|root| root.as_str())
            .unwrap_or("unresolved");
        let start_msg = RunStarted {
            root: root_label,
            node_count: order.len(),
        };
        let run_span = start_msg.span("pipeline_execution");
        let _run_guard = run_span.enter();
        start_msg.log();
        ExecutionOrderComputed { order: &order }.log();
        let run_start = Instant::now();

        let mut responses: HashMap<String, (Payload, OutputBranch)> = HashMap::new();
        let mut aggregator = DebugAggregator::new();
        let mut skipped = 0usize;
        let mut last_executed: Option<&String> = None;

        for node_id in &order {
            let entry = graph
                .entry(node_id)
                .ok_or_else(|| ExecutionError::NodeNotFound(node_id.clone()))?;

            // Payloads arriving over active incoming edges, in declared
            // input order.
            let mut active: Vec<&Payload> = Vec::new();
            for input_ref in &entry.inputs {
                if PipelineRoot::parse(&input_ref.node).is_some() {
                    active.push(&input);
                    continue;
                }
                if let Some((payload, selected)) = responses.get(&input_ref.node) {
                    if *selected == input_ref.branch {
                        active.push(payload);
                    }
                }
            }

            if active.is_empty() {
                tracing::debug!("{}", NodeSkipped { node_id });
                skipped += 1;
                continue;
            }

            let mut merged = active[0].clone();
            for payload in &active[1..] {
                merged.merge((*payload).clone());
            }

            let node_params = params.resolve(node_id);
            let trace_this = debug || node_params.debug_requested();
            let input_snapshot = if trace_this { Some(merged.clone()) } else { None };

            let start_msg = NodeExecutionStarted {
                node_id,
                node_type: entry.node.name(),
            };
            let node_span = start_msg.span("node_execution");
            let _node_guard = node_span.enter();
            start_msg.log();
            let node_start = Instant::now();

            let mut response = match entry.node.run(NodeRequest::new(merged, node_params)).await {
                Ok(response) => response,
                Err(source) => {
                    NodeExecutionFailed {
                        node_id,
                        error: &source,
                    }
                    .log();
                    RunFailed {
                        node_id,
                        error: &source,
                    }
                    .log();
                    return Err(ExecutionError::NodeFailed {
                        node_id: node_id.clone(),
                        source,
                    });
                }
            };

            let declared = entry.node.outgoing_edges();
            let selected = response.branch;
            if selected.index() == 0 || selected.index() > declared {
                let err = ExecutionError::UndeclaredBranch {
                    node_id: node_id.clone(),
                    selected: selected.index(),
                    declared,
                };
                RunFailed {
                    node_id,
                    error: &err,
                }
                .log();
                return Err(err);
            }

            NodeExecutionCompleted {
                node_id,
                branch: selected.index(),
                duration: node_start.elapsed(),
            }
            .log();

            if let Some(snapshot) = input_snapshot {
                aggregator.record(node_id, &snapshot, &response.payload, response.trace.take());
            }

            responses.insert(node_id.clone(), (response.payload, selected));
            last_executed = Some(node_id);
        }

        let Some(last) = last_executed else {
            return Err(ExecutionError::InternalError {
                message: "No node executed; the graph has no root-fed node (should have been caught during validation)"
                    .into(),
            });
        };
        let payload = match responses.remove(last) {
            Some((payload, _)) => payload,
            None => {
                return Err(ExecutionError::InternalError {
                    message: format!("Result payload missing for node '{}'", last),
                })
            }
        };

        RunCompleted {
            root: root_label,
            executed: order.len() - skipped,
            skipped,
            duration: run_start.elapsed(),
        }
        .log();

        let trace = if aggregator.is_empty() {
            None
        } else {
            Some(aggregator.into_traces())
        };
        Ok(PipelineOutput { payload, trace })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::stub::StubNode;
    use crate::pipeline::InputRef;
    use std::sync::Arc;

    fn graph_of(edges: &[(&str, &[&str])]) -> PipelineGraph {
        let mut graph = PipelineGraph::new();
        for (name, inputs) in edges {
            let refs = inputs
                .iter()
                .map(|s| InputRef::parse(s).unwrap())
                .collect();
            graph
                .add_node(*name, Arc::new(StubNode::new(name.to_lowercase())), refs)
                .unwrap();
        }
        graph
    }

    #[tokio::test]
    async fn single_node_receives_root_payload() {
        let graph = graph_of(&[("A", &["Query"])]);
        let executor = SequentialExecutor::new();

        let output = executor
            .execute(
                &graph,
                Payload::from_query("hello"),
                &RunParams::new(),
                false,
            )
            .await
            .unwrap();

        assert_eq!(output.payload.query.as_deref(), Some("hello"));
        assert_eq!(output.payload.extras["visited"], serde_json::json!(["a"]));
    }

    #[tokio::test]
    async fn empty_graph_is_rejected() {
        let graph = PipelineGraph::new();
        let executor = SequentialExecutor::new();

        let err = executor
            .execute(&graph, Payload::new(), &RunParams::new(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::EmptyPipeline));
    }

    #[tokio::test]
    async fn result_is_the_last_executed_node_output() {
        let graph = graph_of(&[("A", &["Query"]), ("B", &["A"]), ("C", &["B"])]);
        let executor = SequentialExecutor::new();

        let output = executor
            .execute(
                &graph,
                Payload::from_query("q"),
                &RunParams::new(),
                false,
            )
            .await
            .unwrap();

        assert_eq!(
            output.payload.extras["visited"],
            serde_json::json!(["a", "b", "c"])
        );
    }
}
