pub mod executor;
pub mod node;
pub mod store;

pub use executor::PipelineExecutor;
pub use node::{NodeRequest, NodeResponse, OutputBranch, PipelineNode};
pub use store::DocumentStore;
