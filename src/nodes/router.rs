//! Routing nodes: the only built-ins that declare more than one outgoing
//! edge. Downstream of a router, only the selected branch's subgraph
//! executes.

use async_trait::async_trait;
use serde_json::json;

use crate::errors::NodeError;
use crate::traits::{NodeRequest, NodeResponse, PipelineNode};

/// Default interrogative markers for [`QueryRouter`].
const QUESTION_WORDS: &[&str] = &[
    "who", "what", "when", "where", "why", "how", "which", "whose", "whom", "is", "are", "was",
    "were", "do", "does", "did", "can", "could", "should", "would", "will",
];

/// Routes natural-language questions to `output_1` and keyword queries
/// to `output_2`.
///
/// A query counts as a question when it ends with `?` or starts with an
/// interrogative word. The word list can be overridden with the
/// `question_words` parameter.
pub struct QueryRouter;

impl QueryRouter {
    pub const BRANCH_QUESTION: usize = 1;
    pub const BRANCH_KEYWORD: usize = 2;

    pub fn new() -> Self {
        Self
    }

    fn is_question(query: &str, question_words: &[String]) -> bool {
        let trimmed = query.trim();
        if trimmed.ends_with('?') {
            return true;
        }
        match trimmed.split_whitespace().next() {
            Some(first) => {
                let first = first.to_lowercase();
                question_words.iter().any(|w| w == &first)
            }
            None => false,
        }
    }
}

impl Default for QueryRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PipelineNode for QueryRouter {
    async fn run(&self, req: NodeRequest) -> Result<NodeResponse, NodeError> {
        let query = req
            .payload
            .query
            .clone()
            .ok_or_else(|| NodeError::MissingInput("query".to_string()))?;
        let question_words = req
            .params
            .get_str_list("question_words")?
            .unwrap_or_else(|| QUESTION_WORDS.iter().map(|w| w.to_string()).collect());

        let (branch, route) = if Self::is_question(&query, &question_words) {
            (Self::BRANCH_QUESTION, "question")
        } else {
            (Self::BRANCH_KEYWORD, "keyword")
        };
        Ok(NodeResponse::branched(req.payload, branch).with_trace(json!({ "route": route })))
    }

    fn name(&self) -> &'static str {
        "query_router"
    }

    fn outgoing_edges(&self) -> usize {
        2
    }
}

/// Routes file-rooted payloads by extension.
///
/// Configured with one extension list per branch; all paths in the
/// payload must fall in the same list, and the node selects that list's
/// 1-based branch. Paths outside every list, extensionless paths, and
/// mixed-route path sets are errors.
pub struct FileTypeRouter {
    /// Lowercased extensions per branch, in branch order.
    routes: Vec<Vec<String>>,
}

impl FileTypeRouter {
    pub fn new(routes: Vec<Vec<String>>) -> Result<Self, NodeError> {
        if routes.is_empty() {
            return Err(NodeError::InvalidParam {
                name: "routes".to_string(),
                reason: "at least one extension list is required".to_string(),
            });
        }
        Ok(Self {
            routes: routes
                .into_iter()
                .map(|exts| exts.into_iter().map(|e| e.to_lowercase()).collect())
                .collect(),
        })
    }

    fn route_for(&self, extension: &str) -> Option<usize> {
        self.routes
            .iter()
            .position(|exts| exts.iter().any(|e| e == extension))
            .map(|idx| idx + 1)
    }
}

#[async_trait]
impl PipelineNode for FileTypeRouter {
    async fn run(&self, req: NodeRequest) -> Result<NodeResponse, NodeError> {
        if req.payload.file_paths.is_empty() {
            return Err(NodeError::MissingInput("file_paths".to_string()));
        }

        let mut selected: Option<usize> = None;
        for path in &req.payload.file_paths {
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
                .ok_or_else(|| {
                    NodeError::Unroutable(format!("'{}' has no extension", path.display()))
                })?;
            let branch = self.route_for(&extension).ok_or_else(|| {
                NodeError::Unroutable(format!(
                    "no route declared for extension '{}' ('{}')",
                    extension,
                    path.display()
                ))
            })?;
            match selected {
                None => selected = Some(branch),
                Some(existing) if existing != branch => {
                    return Err(NodeError::Unroutable(format!(
                        "paths map to different routes (output_{} and output_{})",
                        existing, branch
                    )));
                }
                Some(_) => {}
            }
        }

        // Non-empty path list guarantees a selection at this point.
        let branch = selected.ok_or_else(|| {
            NodeError::Unroutable("no route selected".to_string())
        })?;
        Ok(NodeResponse::branched(req.payload, branch))
    }

    fn name(&self) -> &'static str {
        "file_type_router"
    }

    fn outgoing_edges(&self) -> usize {
        self.routes.len()
    }
}
