// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! Data types flowing through pipelines: documents, answers, the payload
//! bag, and run-time parameters.

mod answer;
mod document;
mod params;
mod payload;

pub use answer::{Answer, Span};
pub use document::Document;
pub use params::{NodeParams, RunParams, PARAM_DEBUG};
pub use payload::Payload;
