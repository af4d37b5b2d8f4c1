// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

mod loader;
mod runtime;
mod validation;

#[cfg(test)]
mod integration_tests;

pub use loader::{
    load_and_validate_config, load_config, ComponentConfig, NodeDef, PipelineConfig, PipelineDef,
};
pub use runtime::{load_pipeline, load_runtime, Runtime, RuntimeBuilder};
pub use validation::validate_config;
