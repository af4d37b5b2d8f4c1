use crate::config::{load_runtime, validate_config, PipelineConfig, RuntimeBuilder};
use crate::errors::ConfigError;
use crate::schema::Document;

/// Integration tests for the definition layer: YAML documents parsed,
/// validated, instantiated, and executed end to end, with stores shared
/// across the pipelines of one document.
#[cfg(test)]
mod tests {
    use super::*;

    const INDEX_AND_QUERY: &str = r#"
components:
  - name: Store
    type: memory_store
  - name: Converter
    type: text_converter
  - name: Splitter
    type: document_splitter
    params:
      split_length: 30
      split_overlap: 5
  - name: Writer
    type: document_writer
    params:
      document_store: Store
  - name: Retriever
    type: bm25_retriever
    params:
      document_store: Store
      top_k: 3
  - name: Reader
    type: overlap_reader
    params:
      top_k: 2

pipelines:
  - name: indexing
    nodes:
      - name: Converter
        inputs: [File]
      - name: Splitter
        inputs: [Converter]
      - name: Writer
        inputs: [Splitter]
  - name: query
    nodes:
      - name: Retriever
        inputs: [Query]
      - name: Reader
        inputs: [Retriever]
"#;

    const ROUTED_INDEXING: &str = r#"
components:
  - name: Store
    type: memory_store
  - name: Router
    type: file_type_router
    params:
      routes: [[txt], [md, markdown]]
  - name: TextConverter
    type: text_converter
  - name: MarkdownConverter
    type: markdown_converter
  - name: Join
    type: join_documents
  - name: Writer
    type: document_writer
    params:
      document_store: Store

pipelines:
  - name: indexing
    nodes:
      - name: Router
        inputs: [File]
      - name: TextConverter
        inputs: [Router.output_1]
      - name: MarkdownConverter
        inputs: [Router.output_2]
      - name: Join
        inputs: [TextConverter, MarkdownConverter]
      - name: Writer
        inputs: [Join]
"#;

    const QUERY_ONLY: &str = r#"
components:
  - name: Store
    type: memory_store
  - name: Retriever
    type: bm25_retriever
    params:
      document_store: Store
  - name: Reader
    type: overlap_reader

pipelines:
  - name: query
    nodes:
      - name: Retriever
        inputs: [Query]
      - name: Reader
        inputs: [Retriever]
"#;

    #[tokio::test]
    async fn indexing_then_query_through_one_shared_store() {
        let dir = tempfile::tempdir().unwrap();
        let rust_path = dir.path().join("rust.txt");
        std::fs::write(
            &rust_path,
            "Rust enforces memory safety through ownership and borrowing. \
             The borrow checker rejects aliased mutable references at compile time.",
        )
        .unwrap();
        let cooking_path = dir.path().join("cooking.txt");
        std::fs::write(
            &cooking_path,
            "Pasta needs salted boiling water. Fresh basil improves tomato sauce.",
        )
        .unwrap();
        let config_path = dir.path().join("pipelines.yaml");
        std::fs::write(&config_path, INDEX_AND_QUERY).unwrap();

        let runtime = load_runtime(&config_path).unwrap();

        runtime
            .pipeline("indexing")
            .unwrap()
            .run_files(vec![rust_path, cooking_path], None, false)
            .await
            .unwrap();
        assert_eq!(runtime.store("Store").unwrap().count().await.unwrap(), 2);

        let output = runtime
            .pipeline("query")
            .unwrap()
            .run("how does Rust enforce memory safety", None, false)
            .await
            .unwrap();

        assert!(!output.payload.answers.is_empty());
        assert!(output.payload.answers[0].answer.contains("memory safety"));
    }

    #[tokio::test]
    async fn file_type_router_selects_the_markdown_branch() {
        let dir = tempfile::tempdir().unwrap();
        let notes_path = dir.path().join("notes.md");
        std::fs::write(&notes_path, "# Heading\n\nPlain body text.\n").unwrap();

        let config: PipelineConfig = serde_yaml::from_str(ROUTED_INDEXING).unwrap();
        validate_config(&config).unwrap();
        let runtime = RuntimeBuilder::from_config(&config).unwrap();

        runtime
            .pipeline("indexing")
            .unwrap()
            .run_files(vec![notes_path], None, false)
            .await
            .unwrap();

        let store = runtime.store("Store").unwrap();
        let documents = store.all_documents().await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].content, "Heading\nPlain body text.\n");
        assert!(!documents[0].content.contains('#'));
    }

    #[tokio::test]
    async fn debug_flag_surfaces_traces_from_definition_built_pipelines() {
        let config: PipelineConfig = serde_yaml::from_str(QUERY_ONLY).unwrap();
        let runtime = RuntimeBuilder::from_config(&config).unwrap();
        runtime
            .store("Store")
            .unwrap()
            .write_documents(vec![Document::new("tokio schedules asynchronous tasks")])
            .await
            .unwrap();

        let output = runtime
            .pipeline("query")
            .unwrap()
            .run("how does tokio schedule tasks", None, true)
            .await
            .unwrap();

        let trace = output.trace.unwrap();
        let traced: Vec<_> = trace.keys().cloned().collect();
        assert_eq!(traced, vec!["Reader".to_string(), "Retriever".to_string()]);
    }

    #[tokio::test]
    async fn unknown_component_type_fails_instantiation() {
        let yaml = r#"
components:
  - name: Reader
    type: transformer_reader

pipelines:
  - name: query
    nodes:
      - name: Reader
        inputs: [Query]
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        // The document is structurally sound; only instantiation knows
        // the type registry.
        validate_config(&config).unwrap();

        let err = RuntimeBuilder::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownComponentType { kind, .. } if kind == "transformer_reader"
        ));
    }

    #[tokio::test]
    async fn bad_component_params_fail_instantiation() {
        let yaml = r#"
components:
  - name: Splitter
    type: document_splitter
    params:
      split_length: 10
      split_overlap: 10

pipelines:
  - name: indexing
    nodes:
      - name: Splitter
        inputs: [File]
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        let err = RuntimeBuilder::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::BadComponent { component, .. } if component == "Splitter"));
    }
}
