use std::fmt::Write as _;
use std::io::{Stderr, Stdout, Write};

use neobench_core::{LatencySummary, ProgressReport, RunResult, ScriptResult};

use super::format::{format_count, format_float, format_percent, quoted};
use super::progress::ProgressThrottle;
use super::summary::{error_line, init_progress_line, start_banner, write_error_report};
use super::{Output, Result};

struct Column {
    name: &'static str,
    value: fn(&RunResult, &ScriptResult, &LatencySummary) -> String,
}

/// Row schema for latency results and checkpoints. Consumers rely on this order.
const LATENCY_COLUMNS: [Column; 14] = [
    Column {
        name: "db",
        value: |r, _, _| quoted(&r.database_name),
    },
    Column {
        name: "script",
        value: |_, s, _| quoted(&s.script_name),
    },
    Column {
        name: "rate",
        value: |_, s, _| format_float(s.rate),
    },
    // Recorded samples, which may differ from `ScriptResult::succeeded`.
    Column {
        name: "succeeded",
        value: |_, _, h| format_count(h.count),
    },
    Column {
        name: "failed",
        value: |_, s, _| format_count(s.failed),
    },
    Column {
        name: "mean",
        value: |_, _, h| format_float(h.mean),
    },
    // Milliseconds, like the other latency columns; older releases wrote microseconds.
    Column {
        name: "stddev",
        value: |_, _, h| format_float(h.stdev),
    },
    Column {
        name: "p0",
        value: |_, _, h| format_float(h.min),
    },
    Column {
        name: "p25",
        value: |_, _, h| format_float(h.p25),
    },
    Column {
        name: "p50",
        value: |_, _, h| format_float(h.p50),
    },
    Column {
        name: "p75",
        value: |_, _, h| format_float(h.p75),
    },
    Column {
        name: "p99",
        value: |_, _, h| format_float(h.p99),
    },
    Column {
        name: "p99999",
        value: |_, _, h| format_float(h.p99999),
    },
    Column {
        name: "p100",
        value: |_, _, h| format_float(h.max),
    },
];

const THROUGHPUT_COLUMNS: [&str; 4] = ["script", "succeeded", "failed", "transactions_per_second"];

const SEPARATOR: &str = ",";

pub(crate) fn latency_header() -> String {
    LATENCY_COLUMNS
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Comma-separated output for spreadsheets and scripts.
///
/// `out` only ever carries header and data rows; progress and failure
/// summaries go to `status`.
#[derive(Debug)]
pub(crate) struct TabularOutput<E, O> {
    status: E,
    out: O,
    throttle: ProgressThrottle,
}

impl TabularOutput<Stderr, Stdout> {
    pub(crate) fn stdio() -> Self {
        Self::new(std::io::stderr(), std::io::stdout())
    }
}

impl<E: Write, O: Write> TabularOutput<E, O> {
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

    fn write_failures(&mut self, result: &RunResult) -> Result<()> {
        if result.total_failed() == 0 {
            return Ok(());
        }
        let mut s = String::new();
        write_error_report(result, &mut s);
        self.write_status(&s)
    }

    fn write_latency_rows(&mut self, result: &RunResult) -> Result<()> {
        let mut s = String::new();
        for script in result.scripts.values() {
            let summary = LatencySummary::of(&script.latencies);
            let row = LATENCY_COLUMNS
                .iter()
                .map(|c| (c.value)(result, script, &summary))
                .collect::<Vec<_>>()
                .join(SEPARATOR);
            s.push_str(&row);
            s.push('\n');
        }
        self.write_out(&s)?;
        self.write_failures(result)
    }
}

impl<E: Write + Send, O: Write + Send> Output for TabularOutput<E, O> {
    fn benchmark_start(&mut self, database_name: &str, url: &str, scenario: &str) -> Result<()> {
        self.write_status(&start_banner(database_name, url, scenario))?;
        let header = latency_header();
        self.write_out(&format!("{header}\n"))
    }

    fn report_init_progress(&mut self, report: &ProgressReport) -> Result<()> {
        if !self.throttle.should_report(report) {
            return Ok(());
        }
        self.write_status(&init_progress_line(report))
    }

    fn report_workload_progress(&mut self, completeness: f64, checkpoint: &RunResult) -> Result<()> {
        self.write_status(&format!(
            "[workload] {}% done\n",
            format_percent(completeness)
        ))?;
        self.write_latency_rows(checkpoint)
    }

    fn report_throughput(&mut self, result: &RunResult) -> Result<()> {
        let mut s = THROUGHPUT_COLUMNS.join(SEPARATOR);
        s.push('\n');

        for script in result.scripts.values() {
            writeln!(
                s,
                "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
                quoted(&script.script_name),
                format_count(script.succeeded),
                format_count(script.failed),
                format_float(script.rate)
            )
            .ok();
        }

        self.write_out(&s)?;
        self.write_failures(result)
    }

    fn report_latency(&mut self, result: &RunResult) -> Result<()> {
        self.write_latency_rows(result)
    }

    fn errorf(&mut self, args: std::fmt::Arguments<'_>) -> Result<()> {
        self.write_status(&error_line(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::{SharedBuf, sample_result};
    use neobench_core::{WorkerResult, WorkerScriptResult};
    use neobench_metrics::histogram_from_samples;

    const HEADER: &str =
        "db,script,rate,succeeded,failed,mean,stddev,p0,p25,p50,p75,p99,p99999,p100";

    fn tabular() -> (TabularOutput<SharedBuf, SharedBuf>, SharedBuf, SharedBuf) {
        let status = SharedBuf::default();
        let out = SharedBuf::default();
        (TabularOutput::new(status.clone(), out.clone()), status, out)
    }

    #[test]
    fn start_emits_single_header_line() -> Result<()> {
        let (mut t, status, out) = tabular();
        t.benchmark_start("movies", "neo4j://localhost:7687", "-c 1")?;

        assert_eq!(out.contents(), format!("{HEADER}\n"));
        assert_eq!(HEADER.split(',').count(), 14);
        assert!(status.contents().contains("Starting workload on database movies"));
        Ok(())
    }

    #[test]
    fn header_precedes_rows() -> Result<()> {
        let (mut t, _, out) = tabular();
        t.benchmark_start("movies", "neo4j://localhost:7687", "-c 1")?;
        t.report_latency(&sample_result(0))?;

        let text = out.contents();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("\"movies\",\"tx\",12.500,3.000,0.000,"));
        assert_eq!(lines[1].split(',').count(), 14);
        Ok(())
    }

    #[test]
    fn succeeded_column_counts_histogram_samples() -> Result<()> {
        let latencies = match histogram_from_samples([500, 700]) {
            Ok(h) => h,
            Err(err) => panic!("record failed: {err}"),
        };
        let mut result = RunResult::new("", "");
        let worker = WorkerResult::new().with_script(
            "tx",
            WorkerScriptResult {
                rate: 2.0,
                succeeded: 10,
                failed: 0,
                latencies,
            },
        );
        if let Err(err) = result.add(&worker) {
            panic!("add failed: {err}");
        }

        let (mut t, _, out) = tabular();
        t.report_latency(&result)?;

        let cells: Vec<String> = out
            .contents()
            .trim_end()
            .split(',')
            .map(str::to_string)
            .collect();
        assert_eq!(cells[0], "\"\"");
        assert_eq!(cells[3], "2.000");
        assert_eq!(cells[5], "0.600");
        assert_eq!(cells[6], "0.100");
        assert_eq!(cells[7], "0.500");
        Ok(())
    }

    #[test]
    fn failures_go_to_status_only() -> Result<()> {
        let (mut t, status, out) = tabular();
        t.report_latency(&sample_result(1))?;

        assert!(status.contents().contains("Causes:"));
        assert!(!out.contents().contains("Causes:"));
        assert_eq!(out.contents().lines().count(), 1);
        Ok(())
    }

    #[test]
    fn no_failure_summary_without_failures() -> Result<()> {
        let (mut t, status, _) = tabular();
        t.report_throughput(&sample_result(0))?;

        assert!(status.contents().is_empty());
        Ok(())
    }

    #[test]
    fn throughput_rows() -> Result<()> {
        let (mut t, _, out) = tabular();
        t.report_throughput(&sample_result(1))?;

        assert_eq!(
            out.contents(),
            "script,succeeded,failed,transactions_per_second\n\"tx\",3.000,1.000,12.500\n"
        );
        Ok(())
    }

    #[test]
    fn workload_progress_emits_status_and_row() -> Result<()> {
        let (mut t, status, out) = tabular();
        t.report_workload_progress(0.25, &sample_result(0))?;

        assert_eq!(status.contents(), "[workload] 25.00% done\n");
        assert_eq!(out.contents().lines().count(), 1);
        assert_eq!(out.contents().trim_end().split(',').count(), 14);
        Ok(())
    }

    #[test]
    fn init_progress_is_rate_limited() -> Result<()> {
        let (mut t, status, out) = tabular();
        let report = ProgressReport::new("load", "nodes", 0.5);
        t.report_init_progress(&report)?;
        t.report_init_progress(&report)?;

        assert_eq!(status.contents(), "[load][nodes] 50.00%\n");
        assert!(out.contents().is_empty());
        Ok(())
    }
}
