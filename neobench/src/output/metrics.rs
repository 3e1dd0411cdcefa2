use neobench_core::{ProgressReport, RunResult};
use neobench_metrics::{CounterSnapshot, TransactionCounters};

use super::{Output, Result};

/// Publishes transaction totals to the scrape endpoint counters.
///
/// Checkpoints carry cumulative totals, so only growth since the previous
/// checkpoint is added.
#[derive(Debug)]
pub(crate) struct MetricsOutput<'a> {
    counters: &'a TransactionCounters,
    last: Option<CounterSnapshot>,
}

impl<'a> MetricsOutput<'a> {
    pub(crate) fn new(counters: &'a TransactionCounters) -> Self {
        Self {
            counters,
            last: None,
        }
    }
}

impl Output for MetricsOutput<'_> {
    fn benchmark_start(&mut self, _database_name: &str, _url: &str, _scenario: &str) -> Result<()> {
        Ok(())
    }

    fn report_init_progress(&mut self, _report: &ProgressReport) -> Result<()> {
        Ok(())
    }

    fn report_workload_progress(&mut self, _completeness: f64, checkpoint: &RunResult) -> Result<()> {
        let now = CounterSnapshot::new(checkpoint.total_succeeded(), checkpoint.total_failed());
        self.counters.add(now.delta_since(self.last));
        self.last = Some(now);
        Ok(())
    }

    fn report_throughput(&mut self, _result: &RunResult) -> Result<()> {
        Ok(())
    }

    fn report_latency(&mut self, _result: &RunResult) -> Result<()> {
        Ok(())
    }

    fn errorf(&mut self, _args: std::fmt::Arguments<'_>) -> Result<()> {
        Ok(())
    }
}
