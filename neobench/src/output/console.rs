use std::io::{Stderr, Stdout, Write};

use neobench_core::{ProgressReport, RunResult};

use super::format::format_percent;
use super::progress::ProgressThrottle;
use super::summary::{error_line, init_progress_line, render_latency, render_throughput, start_banner};
use super::{Output, Result};

/// Human-readable output: chatter on `status`, result bodies on `out`.
#[derive(Debug)]
pub(crate) struct ConsoleOutput<E, O> {
    status: E,
    out: O,
    throttle: ProgressThrottle,
}

impl ConsoleOutput<Stderr, Stdout> {
    pub(crate) fn stdio() -> Self {
        Self::new(std::io::stderr(), std::io::stdout())
    }
}

impl<E: Write, O: Write> ConsoleOutput<E, O> {
    pub(crate) fn new(status: E, out: O) -> Self {
        Self {
            status,
            out,
            throttle: ProgressThrottle::default(),
        }
    }

    fn write_status(&mut self, text: &str) -> Result<()> {
        self.status.write_all(text.as_bytes())?;
        self.status.flush()?;
        Ok(())
    }

    fn write_out(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl<E: Write + Send, O: Write + Send> Output for ConsoleOutput<E, O> {
    fn benchmark_start(&mut self, database_name: &str, url: &str, scenario: &str) -> Result<()> {
        self.write_status(&start_banner(database_name, url, scenario))
    }

    fn report_init_progress(&mut self, report: &ProgressReport) -> Result<()> {
        if !self.throttle.should_report(report) {
            return Ok(());
        }
        self.write_status(&init_progress_line(report))
    }

    fn report_workload_progress(&mut self, completeness: f64, checkpoint: &RunResult) -> Result<()> {
        let line = format!(
            "[{}%] {:.2} tps / {} failures\n",
            format_percent(completeness),
            checkpoint.total_rate(),
            checkpoint.total_failed()
        );
        self.write_status(&line)
    }

    fn report_throughput(&mut self, result: &RunResult) -> Result<()> {
        self.write_out(&render_throughput(result))
    }

    fn report_latency(&mut self, result: &RunResult) -> Result<()> {
        self.write_out(&render_latency(result))
    }

    fn errorf(&mut self, args: std::fmt::Arguments<'_>) -> Result<()> {
        self.write_status(&error_line(args))
    }
}
