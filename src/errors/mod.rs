// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod validation;

pub use config::ConfigError;
pub use execution::{ExecutionError, NodeError, StoreError};
pub use validation::ValidationError;
