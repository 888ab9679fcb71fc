use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "quadjet",
    about = "Classify four-jet events into Higgs-pair signal and sideband regions",
    version
)]
pub struct Opt {
    /// Verbosity level: 'off', 'error', 'warn', 'info', 'debug', 'trace'
    #[arg(short, long, default_value = "info")]
    pub verbosity: String,

    /// Configuration file (TOML), created with default values if missing
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for the tie-break random numbers
    #[arg(short, long, default_value_t = 0)]
    pub seed: u64,

    /// Number of events processed together
    #[arg(long, default_value_t = 100_000)]
    pub chunk_size: usize,

    /// Write the cutflow and histograms as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Event files (JSON), one dataset each
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}
