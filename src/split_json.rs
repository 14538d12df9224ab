/*
cargo run --bin split_json --release
    (no paths given: riot-output.json, then riot-output-2.json when present)

cargo run --bin split_json -- \
    match-history.json \
    -n 4
*/

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, LevelFilter};
use simplelog::{Config, WriteLogger};

use json_split::splitter::{plan_chunks, write_chunk, DEFAULT_NUM_SPLITS};

// Inputs attempted when none are given on the command line; the second is
// optional and skipped silently when absent.
const DEFAULT_INPUTS: &[(&str, bool)] = &[
    ("riot-output.json", true),
    ("riot-output-2.json", false),
];

// Split a JSON file (top-level array or object) into N roughly equal files.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    // JSON files to split, each a top-level array or object
    inputs: Vec<PathBuf>,

    // How many output files to aim for per input
    #[arg(short, long, default_value_t = DEFAULT_NUM_SPLITS)]
    num_splits: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ----- initialise logging ----------------------------------------------
    fs::create_dir_all("logs")?;
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    WriteLogger::init(
        LevelFilter::Info,
        Config::default(),
        fs::File::create(format!("logs/split_json_{timestamp}.log"))?,
    )?;

    // ----- resolve the input list ------------------------------------------
    let inputs: Vec<PathBuf> = if cli.inputs.is_empty() {
        DEFAULT_INPUTS
            .iter()
            .copied()
            .filter(|(path, required)| *required || Path::new(path).exists())
            .map(|(path, _)| PathBuf::from(path))
            .collect()
    } else {
        cli.inputs
    };

    info!("Started - inputs: {inputs:?}, num_splits: {}", cli.num_splits);

    // A failed input is reported and does not stop the remaining ones.
    let mut failures = 0usize;
    for (pos, input) in inputs.iter().enumerate() {
        if pos > 0 {
            println!("\n{}\n", "=".repeat(50));
        }
        if let Err(e) = split_one(input, cli.num_splits) {
            println!("Error: {e}");
            error!("{}: {e}", input.display());
            failures += 1;
        }
    }

    if failures > 0 {
        println!("\n{failures} input(s) failed, see logs/");
    }
    info!("Finished ({failures} failure(s))");
    Ok(())
}

fn split_one(input: &Path, num_splits: usize) -> Result<()> {
    println!("Reading {}...", input.display());
    info!("Reading {}", input.display());

    let plan = plan_chunks(input, num_splits)?;
    println!(
        "Total {}: {} ({} per split)",
        plan.shape.unit(),
        plan.total,
        plan.chunk_size
    );
    info!(
        "{} {} across {} chunk(s)",
        plan.total,
        plan.shape.unit(),
        plan.chunks.len()
    );

    let bar = ProgressBar::new(plan.chunks.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "{spinner:.green} {pos}/{len} {wide_bar:.cyan/blue} {elapsed_precise}",
    )?);

    for chunk in &plan.chunks {
        write_chunk(chunk)?;
        match chunk.range {
            Some((start, end)) => bar.println(format!(
                "Created {} with {} items (indices {}-{})",
                chunk.path.display(),
                chunk.items,
                start,
                end - 1
            )),
            None => bar.println(format!(
                "Created {} with {} keys",
                chunk.path.display(),
                chunk.items
            )),
        }
        info!("Created {} ({} {})", chunk.path.display(), chunk.items, plan.shape.unit());
        bar.inc(1);
    }
    bar.finish_and_clear();

    println!("\nSplitting complete!");
    info!("{}: {} file(s) written", input.display(), plan.chunks.len());
    Ok(())
}
