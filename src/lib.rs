// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

pub mod config;     // definition documents + runtime builder
pub mod engine;     // pipeline executors
pub mod errors;     // error handling
pub mod nodes;      // built-in node implementations
pub mod observability;
pub mod pipeline;   // graph assembly + invocation surfaces
pub mod schema;     // documents, answers, payloads, params
pub mod store;      // document stores
pub mod traits;     // unified abstractions
