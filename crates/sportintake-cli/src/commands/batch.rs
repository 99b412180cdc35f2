//! Batch command - parse every document matching a glob pattern.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use sportintake_core::{DocumentKind, ParsedRecord, SubmissionGuard};

use super::output::{format_record, OutputFormat};
use super::{load_config, path_label, KindArg, Pipeline};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Document kind for every file
    #[arg(short, long, value_enum, default_value = "auto")]
    kind: KindArg,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Skip the remote extractor and use only the heuristic parser
    #[arg(long)]
    offline: bool,
}

enum Outcome {
    Parsed {
        record: ParsedRecord,
        path_label: &'static str,
    },
    Duplicate,
    Failed(String),
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    kind: Option<DocumentKind>,
    outcome: Outcome,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let pipeline = Pipeline::new(&config, args.offline);
    let guard = SubmissionGuard::from_config(&config.dedup);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();

        let (kind, outcome) = match fs::read_to_string(&path) {
            Ok(text) => {
                let kind = args.kind.resolve(&text);
                let outcome = if !guard.admit(kind, &text) {
                    warn!("Skipping duplicate document {}", path.display());
                    Outcome::Duplicate
                } else {
                    match pipeline.parse(kind, &text).await {
                        Ok(extraction) => Outcome::Parsed {
                            path_label: path_label(&extraction),
                            record: extraction.into_record(),
                        },
                        Err(e) => Outcome::Failed(e.to_string()),
                    }
                };
                (Some(kind), outcome)
            }
            Err(e) => (None, Outcome::Failed(e.to_string())),
        };

        if let Outcome::Failed(message) = &outcome {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", path.display(), message);
            } else {
                error!("Failed to process {}: {}", path.display(), message);
                anyhow::bail!("Processing failed for {}: {}", path.display(), message);
            }
        }

        results.push(FileResult {
            path,
            kind,
            outcome,
            processing_time_ms: file_start.elapsed().as_millis() as u64,
        });

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    // Write outputs
    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Outcome::Parsed { record, .. } = &result.outcome {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("document");
                let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_record(record, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let count = |f: fn(&Outcome) -> bool| results.iter().filter(|r| f(&r.outcome)).count();
    let successful = count(|o| matches!(o, Outcome::Parsed { .. }));
    let duplicates = count(|o| matches!(o, Outcome::Duplicate));
    let failed = count(|o| matches!(o, Outcome::Failed(_)));

    // Print summary
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} duplicate, {} failed",
        style(successful).green(),
        style(duplicates).yellow(),
        style(failed).red()
    );

    if failed > 0 {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &results {
            if let Outcome::Failed(message) = &result.outcome {
                println!("  - {}: {}", result.path.display(), message);
            }
        }
    }

    Ok(())
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "kind",
        "youth_name",
        "group_name",
        "start_date",
        "end_date",
        "path",
        "confidence",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let kind = result.kind.map(|k| k.as_str()).unwrap_or("");
        let time = result.processing_time_ms.to_string();

        match &result.outcome {
            Outcome::Parsed { record, path_label } => {
                wtr.write_record([
                    filename,
                    "success",
                    kind,
                    record.youth_name(),
                    record.group_name(),
                    &record.start_date().map(|d| d.to_string()).unwrap_or_default(),
                    &record.end_date().map(|d| d.to_string()).unwrap_or_default(),
                    *path_label,
                    &format!("{:.2}", record.confidence()),
                    &time,
                    "",
                ])?;
            }
            Outcome::Duplicate => {
                wtr.write_record([filename, "duplicate", kind, "", "", "", "", "", "", &time, ""])?;
            }
            Outcome::Failed(message) => {
                wtr.write_record([filename, "error", kind, "", "", "", "", "", "", &time, message])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
