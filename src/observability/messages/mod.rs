// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! This module contains all message types used throughout Gleaner for
//! diagnostic and operational logging. Each message type implements the
//! `Display` trait to provide consistent, human-readable output while
//! enabling future internationalization.
//!
//! # Organization
//!
//! Messages are organized by subsystem to maintain Single Responsibility
//! Principle:
//!
//! * `engine` - Pipeline run lifecycle events
//! * `node` - Node execution and lifecycle events
//! * `validation` - Configuration validation warnings and errors
//!
//! # Usage Pattern
//!
//! ```rust
//! use gleaner::observability::messages::engine::RunStarted;
//!
//! let msg = RunStarted {
//!     root: "Query",
//!     node_count: 5,
//! };
//!
//! tracing::info!("{}", msg);
//! ```

use std::fmt::Display;
use tracing::Span;

pub mod engine;
pub mod node;
pub mod validation;

/// Structured emission for message types.
///
/// `log()` emits the message at its documented level with each field
/// attached as a structured attribute; `span()` creates a tracing span
/// carrying the same fields so nested events inherit them.
pub trait StructuredLog: Display {
    /// Emit this message with structured fields at its documented level.
    fn log(&self);

    /// Create a span named for the calling context, carrying this
    /// message's fields.
    fn span(&self, name: &str) -> Span;
}
