use std::io::IsTerminal as _;
use std::str::FromStr as _;

use neobench_core::{ProgressReport, RunResult};
use neobench_metrics::TransactionCounters;
use strum::VariantNames as _;

mod console;
mod error;
mod fanout;
mod format;
mod metrics;
mod progress;
mod summary;
mod tabular;
#[cfg(test)]
pub(crate) mod test_support;

pub(crate) use error::{Error, Result};

use console::ConsoleOutput;
use fanout::FanoutOutput;
use metrics::MetricsOutput;
use tabular::TabularOutput;

/// Receives lifecycle events of a benchmark run.
pub(crate) trait Output: Send {
    /// `scenario` describes the flags needed to run an equivalent load.
    fn benchmark_start(&mut self, database_name: &str, url: &str, scenario: &str) -> Result<()>;
    /// Dataset population progress; renderers rate-limit repeats.
    fn report_init_progress(&mut self, report: &ProgressReport) -> Result<()>;
    /// Periodic cumulative checkpoint during the timed run.
    fn report_workload_progress(&mut self, completeness: f64, checkpoint: &RunResult)
    -> Result<()>;
    /// Final result of a throughput run.
    fn report_throughput(&mut self, result: &RunResult) -> Result<()>;
    /// Final result of a latency run.
    fn report_latency(&mut self, result: &RunResult) -> Result<()>;
    /// The workload or its setup failed.
    fn errorf(&mut self, args: std::fmt::Arguments<'_>) -> Result<()>;
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::VariantNames,
)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum OutputMode {
    /// Interactive when stdout is a terminal, csv otherwise.
    Auto,
    Interactive,
    Csv,
}

impl OutputMode {
    /// Human-readable list of accepted names, e.g. `'auto', 'interactive' and 'csv'`.
    pub(crate) fn supported() -> String {
        let quoted: Vec<String> = Self::VARIANTS.iter().map(|v| format!("'{v}'")).collect();
        match quoted.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} and {last}", rest.join(", ")),
            Some((last, _)) => last.clone(),
            None => String::new(),
        }
    }

    fn resolve(self, stdout_is_terminal: bool) -> Self {
        match self {
            Self::Auto if stdout_is_terminal => Self::Interactive,
            Self::Auto => Self::Csv,
            other => other,
        }
    }
}

/// Builds the output named `name`. With a non-empty `metrics_address`, also
/// starts the metrics listener and returns an output publishing to both.
pub(crate) fn init_output(name: &str, metrics_address: Option<&str>) -> Result<Box<dyn Output>> {
    let mode = OutputMode::from_str(name).map_err(|_| Error::UnknownFormat {
        name: name.to_string(),
    })?;
    let mode = mode.resolve(std::io::stdout().is_terminal());
    tracing::debug!(requested = name, selected = %mode, "selected output");

    let primary: Box<dyn Output> = match mode {
        OutputMode::Interactive => Box::new(ConsoleOutput::stdio()),
        OutputMode::Csv | OutputMode::Auto => Box::new(TabularOutput::stdio()),
    };

    match metrics_address.filter(|a| !a.is_empty()) {
        None => Ok(primary),
        Some(addr) => {
            crate::web::start_metrics_listener(addr)?;
            Ok(Box::new(FanoutOutput::new(vec![
                primary,
                Box::new(MetricsOutput::new(TransactionCounters::global())),
            ])))
        }
    }
}
