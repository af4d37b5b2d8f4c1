// Copyright (c) 2026 Gleaner Contributors
// SPDX-License-Identifier: MIT

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use gleaner::config::load_runtime;

fn usage(program: &str) {
    eprintln!(
        "Usage: {} <pipelines.yaml> [--pipeline NAME] [--index FILE]... [--debug] [\"query text\"]",
        program
    );
    eprintln!(
        "Example: {} configs/qa_pipelines.yaml --index demos/corpus/ownership.txt \"what does the borrow checker reject?\"",
        program
    );
    eprintln!(
        "Example: {} configs/routed_pipelines.yaml --pipeline query --debug \"bm25 ranking\"",
        program
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage(&args[0]);
        std::process::exit(1);
    }

    let mut config_path: Option<String> = None;
    let mut pipeline_name = "query".to_string();
    let mut index_files: Vec<PathBuf> = Vec::new();
    let mut debug = false;
    let mut query: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--pipeline" => match args.get(i + 1) {
                Some(name) => {
                    pipeline_name = name.clone();
                    i += 1;
                }
                None => {
                    eprintln!("--pipeline requires a name");
                    std::process::exit(1);
                }
            },
            "--index" => match args.get(i + 1) {
                Some(file) => {
                    index_files.push(PathBuf::from(file));
                    i += 1;
                }
                None => {
                    eprintln!("--index requires a file path");
                    std::process::exit(1);
                }
            },
            "--debug" => debug = true,
            other if config_path.is_none() => config_path = Some(other.to_string()),
            other => query = Some(other.to_string()),
        }
        i += 1;
    }

    let config_path = match config_path {
        Some(path) => path,
        None => {
            usage(&args[0]);
            std::process::exit(1);
        }
    };
    if index_files.is_empty() && query.is_none() {
        usage(&args[0]);
        std::process::exit(1);
    }

    println!("🔎 Gleaner Pipeline Runner");
    println!("══════════════════════════");
    println!("📋 Definition: {}", config_path);

    let start_time = Instant::now();
    let runtime = load_runtime(&config_path)?;
    println!("⚙️  Pipelines: {}", runtime.pipeline_names().join(", "));

    if !index_files.is_empty() {
        let indexing = runtime
            .pipeline("indexing")
            .ok_or_else(|| anyhow::anyhow!("definition has no 'indexing' pipeline"))?;
        let indexing_start = Instant::now();
        indexing.run_files(index_files.clone(), None, false).await?;
        println!(
            "📥 Indexed {} file(s) in {:?}",
            index_files.len(),
            indexing_start.elapsed()
        );
    }

    if let Some(query) = query {
        let pipeline = runtime.pipeline(&pipeline_name).ok_or_else(|| {
            anyhow::anyhow!("definition has no '{}' pipeline", pipeline_name)
        })?;

        println!("\n🔍 Query: \"{}\"", query);
        let query_start = Instant::now();
        let output = pipeline.run(query, None, debug).await?;
        let query_time = query_start.elapsed();

        if !output.payload.answers.is_empty() {
            println!("\n📊 Answers:");
            for (i, answer) in output.payload.answers.iter().enumerate() {
                println!("  {}. [{:.3}] \"{}\"", i + 1, answer.score, answer.answer);
                if !answer.context.is_empty() {
                    println!("     ...{}...", answer.context);
                }
            }
        } else if !output.payload.documents.is_empty() {
            println!("\n📄 Documents:");
            for (i, doc) in output.payload.documents.iter().enumerate() {
                let preview: String = doc.content.chars().take(100).collect();
                match doc.score {
                    Some(score) => println!("  {}. [{:.3}] {}", i + 1, score, preview),
                    None => println!("  {}. {}", i + 1, preview),
                }
            }
        } else {
            println!("\n📭 No answers and no documents.");
        }

        if let Some(trace) = &output.trace {
            println!("\n🧭 Debug trace:");
            println!("{}", serde_json::to_string_pretty(trace)?);
        }
        println!("\n⏱️  Query time: {:?}", query_time);
    }

    println!("⏱️  Total time (including definition load): {:?}", start_time.elapsed());
    Ok(())
}
