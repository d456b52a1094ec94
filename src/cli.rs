use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Empirical mode decomposition of one-dimensional signals.
#[derive(Parser)]
#[command(
    name = "sift",
    version,
    about = "Empirical mode decomposition (EMD, EEMD, CEEMDAN)"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Decompose a signal into IMFs and a residual.
    Decompose(DecomposeArgs),
    /// Print the local extrema of a signal as JSON.
    Extrema(ExtremaArgs),
    /// Print the natural number of output rows for a signal length.
    NumImfs(NumImfsArgs),
}

/// Arguments for the `decompose` subcommand.
#[derive(clap::Args, Debug, Default)]
pub struct DecomposeArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Input signal (CSV or Parquet); overrides `[io].input`.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output IMF table (CSV or Parquet); overrides `[io].output`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Column holding the signal: a zero-based index or a header name.
    #[arg(long)]
    pub column: Option<String>,

    /// Decomposition method: emd, eemd, or ceemdan.
    #[arg(short, long)]
    pub method: Option<String>,

    /// Number of output rows (IMFs plus residual).
    #[arg(long = "num-imfs")]
    pub num_imfs: Option<usize>,

    /// Number of ensemble members.
    #[arg(long = "ensemble-size")]
    pub ensemble_size: Option<usize>,

    /// Noise standard deviation relative to the signal's.
    #[arg(long = "noise-strength")]
    pub noise_strength: Option<f64>,

    /// S-number stopping criterion (0 disables).
    #[arg(long = "s-number", allow_negative_numbers = true)]
    pub s_number: Option<i64>,

    /// Maximum siftings per IMF (0 disables).
    #[arg(long = "num-siftings", allow_negative_numbers = true)]
    pub num_siftings: Option<i64>,

    /// RNG seed (0 draws from OS entropy).
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Run ensemble members on a single thread.
    #[arg(long)]
    pub sequential: bool,
}

/// Arguments for the `extrema` subcommand.
#[derive(clap::Args, Debug)]
pub struct ExtremaArgs {
    /// Input signal (CSV or Parquet).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Column holding the signal: a zero-based index or a header name.
    #[arg(long, default_value = "0")]
    pub column: String,

    /// Treat the first CSV line as data rather than a header.
    #[arg(long)]
    pub no_header: bool,

    /// Write the JSON report here instead of standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `num-imfs` subcommand.
#[derive(clap::Args, Debug)]
pub struct NumImfsArgs {
    /// Signal length.
    #[arg(allow_negative_numbers = true)]
    pub len: i64,
}
