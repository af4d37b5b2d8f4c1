// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! Built-in pipeline nodes.
//!
//! Converters turn files into documents, the splitter windows them, the
//! retriever and reader answer queries, routers steer branch selection,
//! and the join/writer nodes close fan-ins and indexing runs. All of
//! them are registered with [`NodeFactory`] under snake_case type names.

mod converter;
mod factory;
mod join;
pub(crate) mod lexical;
mod preprocessor;
mod reader;
mod retriever;
mod router;
mod writer;

#[cfg(test)]
pub mod stub;

pub use converter::{MarkdownConverter, TextConverter};
pub use factory::NodeFactory;
pub use join::JoinDocuments;
pub use preprocessor::DocumentSplitter;
pub use reader::OverlapReader;
pub use retriever::Bm25Retriever;
pub use router::{FileTypeRouter, QueryRouter};
pub use writer::DocumentWriter;
