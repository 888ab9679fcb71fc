//! Higgs-pair candidate classification for four-jet events.
//!
//! # How to use
//!
//!     quadjet [--config CONFIG.toml] [--output OUT.json] EVENTFILE...
//!
//! Each event file holds a JSON array of events, each with a weight and a
//! list of jets:
//!
//!     [{"weight": 1.0, "jets": [{"pt": 85.1, "eta": 0.4, "phi": -2.2, "mass": 11.3}, ...]}, ...]
//!
//! Every file is analysed as its own dataset. The weighted cutflow is
//! printed at the end; with `--output` the cutflow and the four-jet mass
//! histograms are also written as JSON.
mod opt;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use quadjet::{Analysis, Config, Event, Output};

use crate::opt::Opt;

fn main() -> Result<()> {
    let opt = Opt::parse();

    let env = Env::default()
        .filter_or("QUADJET_LOG", opt.verbosity.as_str());
    env_logger::init_from_env(env);

    let config = match &opt.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    debug!("Configuration: {config:?}");
    anyhow::ensure!(opt.chunk_size > 0, "Chunk size has to be positive");

    let analysis = Analysis::new(config);
    let start = Instant::now();
    let mut output = Output::new(analysis.config().m4j_axis);
    for file in &opt.files {
        let dataset = file.display().to_string();
        info!("Processing dataset {dataset}");
        let events = import(file)?;
        for (n, chunk) in events.chunks(opt.chunk_size).enumerate() {
            let entry_start = n * opt.chunk_size;
            let entries = entry_start..(entry_start + chunk.len());
            // seeding by position makes results independent of the processing order
            let seed = opt.seed.wrapping_add(entry_start as u64);
            let res = analysis
                .run(&dataset, entries, chunk.to_vec(), seed)
                .with_context(|| format!("Failed to process {dataset}"))?;
            output.merge(res)?;
        }
    }
    let elapsed = start.elapsed().as_secs_f64();

    print_cutflow(&output);
    println!(
        "{} events in {elapsed:.2}s ({:.0} events/s), {} excluded from region assignment",
        output.n_event,
        output.n_event as f64 / elapsed,
        output.n_failed,
    );

    if let Some(path) = &opt.output {
        let out = File::create(path)
            .with_context(|| format!("Failed to open {path:?}"))?;
        serde_json::to_writer_pretty(BufWriter::new(out), &output)
            .with_context(|| format!("Failed to write output to {path:?}"))?;
        info!("Output written to {path:?}");
    }
    Ok(())
}

fn import(file: &Path) -> Result<Vec<Event>> {
    debug!("Importing events from {file:?}");
    let reader = File::open(file)
        .with_context(|| format!("Failed to open {file:?}"))?;
    let events: Vec<Event> = serde_json::from_reader(BufReader::new(reader))
        .with_context(|| format!("Failed to import events from {file:?}"))?;
    debug!("Read {} events", events.len());
    Ok(events)
}

fn print_cutflow(output: &Output) {
    println!(
        "{:<30} {:<14} {:<10} {:>14} {:>10}",
        "dataset", "cut", "region", "sumw", "entries"
    );
    for (dataset, cut, region, sum) in output.cutflow_rows() {
        println!(
            "{dataset:<30} {:<14} {:<10} {:>14.3} {:>10}",
            cut.to_string(),
            region.to_string(),
            sum.sumw,
            sum.entries
        );
    }
}
