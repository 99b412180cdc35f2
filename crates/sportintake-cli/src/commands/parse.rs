//! Parse command - extract a record from a single document.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use super::output::{format_record, OutputFormat};
use super::{load_config, path_label, KindArg, Pipeline};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input text file, or `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Document kind
    #[arg(short, long, value_enum, default_value = "auto")]
    kind: KindArg,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Skip the remote extractor and use only the heuristic parser
    #[arg(long)]
    offline: bool,

    /// Show extraction confidence and the path that produced the record
    #[arg(long)]
    show_confidence: bool,
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(fs::read_to_string(input)?)
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let text = read_input(&args.input)?;
    let kind = args.kind.resolve(&text);

    info!("Parsing {} as {}", args.input.display(), kind);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message(format!("Parsing {} document...", kind));

    let pipeline = Pipeline::new(&config, args.offline);
    let result = pipeline.parse(kind, &text).await;

    pb.finish_and_clear();

    let extraction = result?;
    let record = extraction.record();

    // Format output
    let output = format_record(record, args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(warning) = extraction.warning() {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    // Show summary
    if args.show_confidence {
        println!();
        println!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            record.confidence() * 100.0
        );
        println!(
            "{} Extraction path: {}",
            style("ℹ").blue(),
            path_label(&extraction)
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
