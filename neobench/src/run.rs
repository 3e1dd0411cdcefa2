use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Context as _;
use neobench_core::{ProgressReport, RunResult};

use crate::cli::ReplayArgs;
use crate::exit_codes::ExitCode;
use crate::output::{self, Output};
use crate::replay::{self, ReplayEvent};
use crate::run_error::RunError;

/// Replays recorded events through the configured output.
///
/// Errors reported through the output's error channel come back as an exit
/// code; `Err` means nothing could be reported there.
pub async fn replay(args: ReplayArgs) -> Result<ExitCode, RunError> {
    // Input and report streams block.
    tokio::task::spawn_blocking(move || replay_blocking(args))
        .await
        .map_err(|err| {
            RunError::RuntimeError(anyhow::Error::new(err).context("replay task failed"))
        })?
}

fn replay_blocking(args: ReplayArgs) -> Result<ExitCode, RunError> {
    let mut output = output::init_output(&args.output, args.prometheus.as_deref())?;

    let scenario = args
        .scenario
        .clone()
        .unwrap_or_else(|| format!("replay of {}", args.input.display()));

    output.benchmark_start(&args.database, &args.address, &scenario)?;

    let reader = match open_input(&args.input) {
        Ok(r) => r,
        Err(err) => return report_fatal(output.as_mut(), &err, ExitCode::RuntimeError),
    };

    let mut result = RunResult::new(args.database.as_str(), scenario.as_str());
    let mut events = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = match line.with_context(|| format!("failed to read line {line_no}")) {
            Ok(v) => v,
            Err(err) => return report_fatal(output.as_mut(), &err, ExitCode::RuntimeError),
        };

        let event = match replay::parse_line(&line) {
            Ok(Some(ev)) => ev,
            Ok(None) => continue,
            Err(err) => {
                let err = err.context(format!("line {line_no}"));
                return report_fatal(output.as_mut(), &err, ExitCode::InvalidInput);
            }
        };
        events += 1;

        match event {
            ReplayEvent::Init {
                section,
                step,
                completeness,
            } => {
                output.report_init_progress(&ProgressReport::new(section, step, completeness))?;
            }
            ReplayEvent::Worker(record) => {
                let merged = record
                    .into_worker_result()
                    .and_then(|w| result.add(&w).map_err(anyhow::Error::from));
                if let Err(err) = merged {
                    let err = err.context(format!("line {line_no}"));
                    return report_fatal(output.as_mut(), &err, ExitCode::InvalidInput);
                }
            }
            ReplayEvent::Checkpoint { completeness } => {
                output.report_workload_progress(completeness, &result)?;
            }
        }
    }

    tracing::debug!(events, scripts = result.scripts.len(), "replay finished");

    if args.latency {
        output.report_latency(&result)?;
    } else {
        output.report_throughput(&result)?;
    }

    Ok(ExitCode::Success)
}

fn open_input(path: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufReader::new(std::io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn report_fatal(
    output: &mut dyn Output,
    err: &anyhow::Error,
    code: ExitCode,
) -> Result<ExitCode, RunError> {
    output.errorf(format_args!("{err:#}"))?;
    Ok(code)
}
