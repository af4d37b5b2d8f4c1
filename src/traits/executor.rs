use async_trait::async_trait;

use crate::engine::PipelineOutput;
use crate::errors::ExecutionError;
use crate::pipeline::PipelineGraph;
use crate::schema::{Payload, RunParams};

#[async_trait]
pub trait PipelineExecutor: Send + Sync {
    /// Execute a pipeline graph on the given root payload.
    ///
    /// - `graph`: the assembled (and validated) node graph
    /// - `input`: the payload carried by the synthetic root
    /// - `params`: per-run option overrides, resolved per node
    /// - `debug`: when true, record a trace entry for every executed node
    ///
    /// Returns the output payload of the last executed node plus the
    /// debug trace when one was requested, or the first error that
    /// aborted the run.
    async fn execute(
        &self,
        graph: &PipelineGraph,
        input: Payload,
        params: &RunParams,
        debug: bool,
    ) -> Result<PipelineOutput, ExecutionError>;
}
