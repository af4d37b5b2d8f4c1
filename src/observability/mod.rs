// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and
//! operational logging throughout Gleaner. Message types follow a
//! struct-based pattern with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Enable future internationalization without code changes
//! * Maintain Single Responsibility Principle (SRP)
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - Pipeline run lifecycle events
//! * `messages::node` - Node execution and lifecycle events
//! * `messages::validation` - Configuration validation warnings and errors
//!
//! # Usage
//!
//! ```rust
//! use gleaner::observability::messages::node::NodeExecutionFailed;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
//! let msg = NodeExecutionFailed {
//!     node_id: "Retriever",
//!     error: &error,
//! };
//!
//! tracing::error!("{}", msg);
//! ```

pub mod messages;
