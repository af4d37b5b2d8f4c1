pub mod sequential;
pub mod trace;

pub use sequential::SequentialExecutor;
pub use trace::{DebugAggregator, NodeTrace, PipelineOutput};
