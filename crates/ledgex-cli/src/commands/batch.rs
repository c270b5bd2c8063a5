//! Batch processing command for directories of statement PDFs.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use ledgex_core::models::config::LedgexConfig;
use ledgex_core::models::record::ResultTable;
use ledgex_core::pipeline::{ChunkedPipeline, RunStatus};

use super::process::{OutputFormat, render_table};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input directory or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output file for the merged table (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format for the merged table
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Emit only the resolved columns, dropping per-case diagnostics
    #[arg(long)]
    refined: bool,

    /// Also write a per-document summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue with the remaining documents when one fails
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single document.
struct DocumentResult {
    path: PathBuf,
    status: RunStatus,
    pages_total: u32,
    pages_with_text: u32,
    records: usize,
    error: Option<String>,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        LedgexConfig::from_file(std::path::Path::new(path))?
    } else {
        LedgexConfig::default()
    };

    let files = expand_input(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No matching PDF files found for: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let pipeline = ChunkedPipeline::from_config(&config);
    let mut merged = ResultTable::new();
    let mut results = Vec::with_capacity(files.len());

    // Documents are processed to completion one at a time, in input order.
    for path in files {
        let mut result = DocumentResult {
            path: path.clone(),
            status: RunStatus::Idle,
            pages_total: 0,
            pages_with_text: 0,
            records: 0,
            error: None,
        };

        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let outcome = pipeline.process_document(&path, |pages_done, total| {
            overall_pb.set_message(format!("{} {}/{} pages", name, pages_done, total));
        });

        match outcome {
            Ok(run) => {
                for warning in &run.warnings {
                    warn!("{}: {}", path.display(), warning);
                }
                result.status = run.status;
                result.pages_total = run.pages_total;
                result.pages_with_text = run.pages_with_text;
                result.records = run.table.len();
                merged.append(run.table);
            }
            Err(e) => {
                result.status = RunStatus::Failed;
                result.error = Some(e.to_string());
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), e);
                } else {
                    error!("Failed to process {}: {}", path.display(), e);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), e);
                }
            }
        }

        results.push(result);
        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    // Write the merged table
    if merged.is_empty() {
        println!("{} No records found in any document.", style("ℹ").blue());
    } else {
        let content = render_table(&merged, args.format, args.refined)?;
        if let Some(output_path) = &args.output {
            fs::write(output_path, content)?;
            debug!("Wrote merged output to {}", output_path.display());
        } else {
            println!("{}", content);
        }
    }

    // Per-document summary if requested
    if args.summary {
        let summary_path = args
            .output
            .as_ref()
            .and_then(|p| p.parent().map(|d| d.join("summary.csv")))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let done = results
        .iter()
        .filter(|r| r.status == RunStatus::Done)
        .count();
    let failed: Vec<_> = results
        .iter()
        .filter(|r| r.status == RunStatus::Failed)
        .collect();

    println!();
    println!(
        "{} Processed {} files in {:?}: {} records",
        style("✓").green(),
        results.len(),
        start.elapsed(),
        merged.len()
    );
    println!(
        "   {} successful, {} failed",
        style(done).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Expand a directory or glob pattern into an ordered list of PDF paths.
fn expand_input(input: &str) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = if std::path::Path::new(input).is_dir() {
        format!("{}/*.pdf", input.trim_end_matches('/'))
    } else {
        input.to_string()
    };

    let files: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    Ok(files)
}

fn write_summary(path: &PathBuf, results: &[DocumentResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "pages_total",
        "pages_with_text",
        "records",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        wtr.write_record([
            filename,
            result.status.as_str(),
            &result.pages_total.to_string(),
            &result.pages_with_text.to_string(),
            &result.records.to_string(),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
