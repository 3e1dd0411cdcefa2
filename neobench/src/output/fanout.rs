use neobench_core::{ProgressReport, RunResult};

use super::{Output, Result};

/// Forwards every event to each delegate in order. The first delegate error
/// stops forwarding for that event and is returned.
pub(crate) struct FanoutOutput {
    delegates: Vec<Box<dyn Output>>,
}

impl FanoutOutput {
    pub(crate) fn new(delegates: Vec<Box<dyn Output>>) -> Self {
        Self { delegates }
    }
}

impl Output for FanoutOutput {
    fn benchmark_start(&mut self, database_name: &str, url: &str, scenario: &str) -> Result<()> {
        for d in &mut self.delegates {
            d.benchmark_start(database_name, url, scenario)?;
        }
        Ok(())
    }

    fn report_init_progress(&mut self, report: &ProgressReport) -> Result<()> {
        for d in &mut self.delegates {
            d.report_init_progress(report)?;
        }
        Ok(())
    }

    fn report_workload_progress(&mut self, completeness: f64, checkpoint: &RunResult) -> Result<()> {
        for d in &mut self.delegates {
            d.report_workload_progress(completeness, checkpoint)?;
        }
        Ok(())
    }

    fn report_throughput(&mut self, result: &RunResult) -> Result<()> {
        for d in &mut self.delegates {
            d.report_throughput(result)?;
        }
        Ok(())
    }

    fn report_latency(&mut self, result: &RunResult) -> Result<()> {
        for d in &mut self.delegates {
            d.report_latency(result)?;
        }
        Ok(())
    }

    fn errorf(&mut self, args: std::fmt::Arguments<'_>) -> Result<()> {
        for d in &mut self.delegates {
            d.errorf(args)?;
        }
        Ok(())
    }
}
