//! batch-analyzer: score one or many financial workbooks and emit a
//! ranked report.
//!
//! Usage:
//!   cargo run -p batch-analyzer -- --file acme.xlsx
//!   cargo run -p batch-analyzer -- --dir workbooks/ --out report.md
//!   cargo run -p batch-analyzer -- --dir workbooks/ --json --out report.json

mod report;

use analysis_core::EngineConfig;
use analysis_orchestrator::batch::{analyze_batch, rank};
use std::path::PathBuf;

const DEFAULT_CONCURRENCY: usize = 8;
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "ods"];

fn collect_dir(dir: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| WORKBOOK_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    // Directory iteration order is platform-dependent
    paths.sort();
    Ok(paths)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "batch_analyzer=info,analysis_orchestrator=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let as_json = args.iter().any(|a| a == "--json");

    let concurrency: usize = args
        .iter()
        .position(|a| a == "--concurrency")
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_CONCURRENCY);

    let out_path = args
        .iter()
        .position(|a| a == "--out")
        .and_then(|i| args.get(i + 1))
        .cloned();

    let paths: Vec<PathBuf> = if let Some(idx) = args.iter().position(|a| a == "--dir") {
        let dir = args
            .get(idx + 1)
            .ok_or_else(|| anyhow::anyhow!("--dir needs a path"))?;
        collect_dir(dir)?
    } else if args.iter().any(|a| a == "--file") {
        let mut files = Vec::new();
        for idx in args.iter().enumerate().filter(|(_, a)| *a == "--file").map(|(i, _)| i) {
            files.extend(
                args[idx + 1..]
                    .iter()
                    .take_while(|a| !a.starts_with("--"))
                    .map(PathBuf::from),
            );
        }
        files
    } else {
        eprintln!("Usage:");
        eprintln!("  batch-analyzer --file A.xlsx B.xlsx ...  Analyze specific workbooks");
        eprintln!("  batch-analyzer --dir PATH                Analyze every workbook in a directory");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --out PATH         Write the report to a file instead of stdout");
        eprintln!("  --json             Emit JSON instead of markdown");
        eprintln!("  --concurrency N    Max parallel workbooks (default: {})", DEFAULT_CONCURRENCY);
        std::process::exit(1);
    };

    if paths.is_empty() {
        anyhow::bail!("no workbook files to analyze");
    }
    tracing::info!(
        "batch-analyzer: {} workbooks, concurrency={}",
        paths.len(),
        concurrency
    );

    let outcomes = analyze_batch(paths, EngineConfig::default(), concurrency).await;

    let mut results = Vec::new();
    let mut failed = 0usize;
    for outcome in outcomes {
        match outcome.result {
            Ok(result) => results.push(result),
            Err(e) => {
                failed += 1;
                tracing::error!("{}: {e}", outcome.path.display());
            }
        }
    }
    tracing::info!("{} analyzed, {} failed", results.len(), failed);
    if results.is_empty() {
        anyhow::bail!("every workbook failed to analyze");
    }

    let ranked = rank(&results);
    let rendered = if as_json {
        report::render_json(&ranked)?
    } else {
        report::render_markdown(&ranked)
    };

    match out_path {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            tracing::info!("Report written to {}", path);
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
