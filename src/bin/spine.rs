//! spine CLI — extract the significant backbone of a weighted edge list.
//!
//! Usage:
//!   spine <input.csv> <output.csv>                 # disparity filter, alpha 0.05
//!   spine <input.csv> <output.csv> --policy ncdf   # noise-corrected variant
//!   spine <input.csv> <output.csv> --alpha 0.01 --workers 8

use clap::Parser;
use spine::io::{read_edge_list, write_edge_list};
use spine::{extract_backbone, BackboneConfig, FilterPolicy};
use std::path::PathBuf;
use std::process;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "spine")]
#[command(version)]
#[command(about = "Backbone extraction for weighted undirected edge lists")]
struct Cli {
    /// Input CSV with source, target, weight columns.
    input: PathBuf,

    /// Output CSV for the backbone edge list.
    output: PathBuf,

    /// Significance threshold in (0, 1].
    #[arg(long, default_value_t = 0.05)]
    alpha: f64,

    /// Significance policy: disparity or ncdf.
    #[arg(long, default_value = "disparity")]
    policy: FilterPolicy,

    /// Worker count (default: available parallelism).
    #[arg(long)]
    workers: Option<usize>,

    /// Nodes per evaluation batch.
    #[arg(long, default_value_t = 256)]
    batch_size: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let report = match read_edge_list(&cli.input) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error reading '{}': {e}", cli.input.display());
            process::exit(1);
        }
    };
    if report.blank_lines > 0 {
        warn!(blank_lines = report.blank_lines, "skipped blank lines in input");
    }

    let config = BackboneConfig::new()
        .with_alpha_threshold(cli.alpha)
        .with_policy(cli.policy)
        .with_workers(cli.workers)
        .with_batch_size(cli.batch_size);

    let result = match extract_backbone(&report.records, &config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("backbone extraction failed: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = write_edge_list(&cli.output, &result.edges) {
        eprintln!("error writing '{}': {e}", cli.output.display());
        process::exit(1);
    }

    info!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        input_edges = result.stats.input_edges,
        backbone_edges = result.stats.backbone_edges,
        backbone_nodes = result.stats.backbone_nodes,
        "backbone written"
    );
}
