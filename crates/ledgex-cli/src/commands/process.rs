//! Process command - extract records from a single statement PDF.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ledgex_core::models::config::LedgexConfig;
use ledgex_core::models::record::{RefinedTable, ResultTable};
use ledgex_core::pdf::{PageSource, PdfExtractor};
use ledgex_core::pipeline::ChunkedPipeline;
use ledgex_core::statement::normalize;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input statement PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Emit only the resolved columns, dropping per-case diagnostics
    #[arg(long)]
    refined: bool,

    /// Dump each page's normalized text for pattern debugging
    #[arg(long)]
    show_text: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV table
    Csv,
    /// JSON records
    Json,
    /// Plain text preview
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        LedgexConfig::from_file(std::path::Path::new(path))?
    } else {
        LedgexConfig::default()
    };

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let mut source = PdfExtractor::new();
    source.load_file(&args.input)?;

    let pb = ProgressBar::new(source.page_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages")
            .unwrap()
            .progress_chars("=>-"),
    );

    let pipeline = ChunkedPipeline::from_config(&config);
    let run = pipeline.process(&mut source, |pages_done, total| {
        pb.set_length(total as u64);
        pb.set_position(pages_done as u64);
    });
    pb.finish_with_message("Done");

    for warning in &run.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    if args.show_text {
        dump_normalized_text(&mut source)?;
    }

    if run.table.is_empty() {
        println!("{} No records found in the PDF.", style("ℹ").blue());
        return Ok(());
    }

    // Format output
    let output = render_table(&run.table, args.format, args.refined)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} records written to {}",
            style("✓").green(),
            run.table.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render a table in the requested format and projection.
pub fn render_table(
    table: &ResultTable,
    format: OutputFormat,
    refined: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Csv => {
            if refined {
                refined_csv(&table.refine())
            } else {
                full_csv(table)
            }
        }
        OutputFormat::Json => {
            if refined {
                Ok(serde_json::to_string_pretty(&table.refine())?)
            } else {
                Ok(serde_json::to_string_pretty(table)?)
            }
        }
        OutputFormat::Text => Ok(text_preview(&table.refine(), 50)),
    }
}

pub fn full_csv(table: &ResultTable) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(ResultTable::header())?;
    for record in table.records() {
        wtr.write_record(ResultTable::row(record))?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

pub fn refined_csv(table: &RefinedTable) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(RefinedTable::header())?;
    for record in table.records() {
        wtr.write_record(RefinedTable::row(record))?;
    }
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

/// First `limit` rows of the resolved columns as aligned text.
pub fn text_preview(table: &RefinedTable, limit: usize) -> String {
    let header = RefinedTable::header();
    let mut output = String::new();

    for (i, record) in table.records().iter().take(limit).enumerate() {
        output.push_str(&format!("Record {}\n", i + 1));
        for (name, value) in header.iter().zip(RefinedTable::row(record)) {
            if !value.is_empty() {
                output.push_str(&format!("  {:<20} {}\n", name, value));
            }
        }
        output.push('\n');
    }

    if table.len() > limit {
        output.push_str(&format!("... {} more records\n", table.len() - limit));
    }

    output
}

fn dump_normalized_text(source: &mut PdfExtractor) -> anyhow::Result<()> {
    println!("{}", style("Normalized page text:").bold());
    for page in 0..source.page_count() {
        if let Some(text) = source.page_text(page)? {
            println!("Page {}:\n{}\n{}", page + 1, normalize(&text), "-".repeat(40));
        }
    }
    Ok(())
}
