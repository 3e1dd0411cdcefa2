use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context as _;
use neobench_core::{FailureGroup, WorkerResult, WorkerScriptResult};
use neobench_metrics::histogram_from_samples;
use serde::Deserialize;

/// One line of a replay file.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ReplayEvent {
    Init {
        section: String,
        step: String,
        completeness: f64,
    },
    Worker(WorkerRecord),
    Checkpoint {
        completeness: f64,
    },
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkerRecord {
    #[serde(default)]
    scripts: BTreeMap<String, ScriptRecord>,
    #[serde(default)]
    failed_by_error_group: BTreeMap<String, FailureRecord>,
    #[serde(default)]
    window_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ScriptRecord {
    rate: f64,
    succeeded: u64,
    failed: u64,
    /// Raw latency samples in microseconds.
    #[serde(default)]
    latencies_us: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct FailureRecord {
    count: u64,
    first_failure: String,
}

impl WorkerRecord {
    pub(crate) fn into_worker_result(self) -> anyhow::Result<WorkerResult> {
        let mut out = WorkerResult::new();

        for (name, s) in self.scripts {
            let latencies = histogram_from_samples(s.latencies_us)
                .with_context(|| format!("invalid latency sample for script `{name}`"))?;
            out = out.with_script(
                name,
                WorkerScriptResult {
                    rate: s.rate,
                    succeeded: s.succeeded,
                    failed: s.failed,
                    latencies,
                },
            );
        }

        for (name, f) in self.failed_by_error_group {
            out = out.with_failure_group(name, FailureGroup::new(f.count, f.first_failure));
        }

        if let Some(ms) = self.window_ms {
            out = out.with_window(Duration::from_millis(ms));
        }

        Ok(out)
    }
}

/// Parses one input line; blank lines yield `None`.
pub(crate) fn parse_line(line: &str) -> anyhow::Result<Option<ReplayEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let event = serde_json::from_str(line).context("invalid replay event")?;
    Ok(Some(event))
}
