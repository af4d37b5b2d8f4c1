// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

//! File-to-document converters.
//!
//! Converters consume `payload.file_paths` and emit one [`Document`] per
//! file, carrying `name` and `path` provenance in the document meta. An
//! unreadable file aborts the run.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::NodeError;
use crate::schema::Document;
use crate::traits::{NodeRequest, NodeResponse, PipelineNode};

async fn read_file(path: &Path) -> Result<String, NodeError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| NodeError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn provenance_meta(path: &Path) -> BTreeMap<String, Value> {
    let mut meta = BTreeMap::new();
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        meta.insert("name".to_string(), Value::from(name));
    }
    meta.insert("path".to_string(), Value::from(path.display().to_string()));
    meta
}

/// Reads plain-text files into documents.
pub struct TextConverter;

impl TextConverter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PipelineNode for TextConverter {
    async fn run(&self, req: NodeRequest) -> Result<NodeResponse, NodeError> {
        let mut payload = req.payload;
        let paths = std::mem::take(&mut payload.file_paths);
        for path in &paths {
            let content = read_file(path).await?;
            payload
                .documents
                .push(Document::with_meta(content, provenance_meta(path)));
        }
        Ok(NodeResponse::forward(payload))
    }

    fn name(&self) -> &'static str {
        "text_converter"
    }
}

/// Reads Markdown files into documents, stripping markup down to text.
pub struct MarkdownConverter;

impl MarkdownConverter {
    pub fn new() -> Self {
        Self
    }

    /// Reduce Markdown to plain text: drops fenced code blocks, heading
    /// markers, emphasis and inline-code characters, and link targets
    /// (keeping link text).
    fn strip_markdown(input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut in_fence = false;
        for line in input.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }
            let without_heading = trimmed.trim_start_matches('#').trim_start();
            let cleaned = Self::strip_inline(without_heading);
            if !cleaned.is_empty() {
                out.push_str(&cleaned);
                out.push('\n');
            }
        }
        out
    }

    fn strip_inline(line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '*' | '_' | '`' => {}
                // Image prefix: drop the bang, the bracket handling keeps the alt text.
                '!' if chars.peek() == Some(&'[') => {}
                '[' => {
                    let mut text = String::new();
                    let mut closed = false;
                    for n in chars.by_ref() {
                        if n == ']' {
                            closed = true;
                            break;
                        }
                        text.push(n);
                    }
                    if closed && chars.peek() == Some(&'(') {
                        for n in chars.by_ref() {
                            if n == ')' {
                                break;
                            }
                        }
                    }
                    out.push_str(&text);
                }
                _ => out.push(c),
            }
        }
        out.trim().to_string()
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PipelineNode for MarkdownConverter {
    async fn run(&self, req: NodeRequest) -> Result<NodeResponse, NodeError> {
        let mut payload = req.payload;
        let paths = std::mem::take(&mut payload.file_paths);
        for path in &paths {
            let raw = read_file(path).await?;
            payload
                .documents
                .push(Document::with_meta(Self::strip_markdown(&raw), provenance_meta(path)));
        }
        Ok(NodeResponse::forward(payload))
    }

    fn name(&self) -> &'static str {
        "markdown_converter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{NodeParams, Payload};
    use std::io::Write;

    #[tokio::test]
    async fn text_converter_reads_files_into_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"plain text body")
            .unwrap();

        let req = NodeRequest::new(Payload::from_files(vec![path]), NodeParams::new());
        let resp = TextConverter::new().run(req).await.unwrap();

        assert!(resp.payload.file_paths.is_empty());
        assert_eq!(resp.payload.documents.len(), 1);
        let doc = &resp.payload.documents[0];
        assert_eq!(doc.content, "plain text body");
        assert_eq!(doc.meta.get("name"), Some(&Value::from("note.txt")));
    }

    #[tokio::test]
    async fn text_converter_fails_on_missing_file() {
        let req = NodeRequest::new(
            Payload::from_files(vec!["/definitely/not/here.txt".into()]),
            NodeParams::new(),
        );
        let err = TextConverter::new().run(req).await.unwrap_err();
        assert!(matches!(err, NodeError::Io { .. }));
    }

    #[test]
    fn markdown_stripping_keeps_text_and_drops_markup() {
        let md = "# Title\n\nSome *emphasis* and `code` plus a [link](https://example.com).\n\n```rust\nfn hidden() {}\n```\nAfter the fence.\n";
        let text = MarkdownConverter::strip_markdown(md);
        assert_eq!(text, "Title\nSome emphasis and code plus a link.\nAfter the fence.\n");
    }

    #[test]
    fn markdown_stripping_keeps_image_alt_text() {
        let text = MarkdownConverter::strip_markdown("An ![diagram](img.png) inline.");
        assert_eq!(text, "An diagram inline.\n");
    }
}
