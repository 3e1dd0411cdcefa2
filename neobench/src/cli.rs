use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "neobench",
    author,
    version,
    about = "Benchmark result aggregation and reporting",
    long_about = "neobench aggregates per-worker benchmark results into per-script throughput and latency statistics and reports them as interactive text, CSV, or Prometheus counters.",
    after_help = "Examples:\n  neobench replay results.ndjson\n  neobench replay results.ndjson --latency --output csv\n  neobench replay - --prometheus :2112 < results.ndjson"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay recorded worker results through the configured output
    #[command(
        long_about = "Read newline-delimited JSON events (init progress, worker results, checkpoints) and report them exactly as a live run would.\n\nAt end of input the final throughput report is written, or the latency report with --latency."
    )]
    Replay(ReplayArgs),
}

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// NDJSON event file, or `-` for stdin
    pub input: PathBuf,

    /// Output format: auto, interactive or csv
    #[arg(short = 'o', long, env = "NEOBENCH_OUTPUT", default_value = "auto")]
    pub output: String,

    /// Serve Prometheus counters on this address (e.g. :2112)
    #[arg(long, env = "NEOBENCH_PROMETHEUS", value_name = "ADDR")]
    pub prometheus: Option<String>,

    /// Report latency distributions instead of throughput
    #[arg(short = 'm', long)]
    pub latency: bool,

    /// Database the workload targeted
    #[arg(short = 'd', long, default_value = "")]
    pub database: String,

    /// Address of the target system
    #[arg(short = 'a', long, default_value = "neo4j://localhost:7687")]
    pub address: String,

    /// Scenario description (defaults to one naming the input)
    #[arg(long, allow_hyphen_values = true)]
    pub scenario: Option<String>,
}
