use std::collections::BTreeMap;
use std::time::Duration;

use neobench_metrics::LatencyHistogram;

use crate::error::{Error, Result};
use crate::worker::{WorkerResult, WorkerScriptResult};

/// Relative difference between measurement windows beyond which summed rates
/// are no longer comparable.
const WINDOW_TOLERANCE: f64 = 0.05;

/// Failures sharing one error classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureGroup {
    pub count: u64,
    /// Message of the first failure seen for this group; never replaced.
    pub first_failure: String,
}

impl FailureGroup {
    pub fn new(count: u64, first_failure: impl Into<String>) -> Self {
        Self {
            count,
            first_failure: first_failure.into(),
        }
    }
}

/// Results for one script, merged across every worker that ran it.
///
/// Latencies between different scripts mean different things, so they are
/// never merged across script names.
#[derive(Debug, Clone)]
pub struct ScriptResult {
    pub script_name: String,
    /// Transactions per second, succeeded and failed.
    pub rate: f64,
    pub succeeded: u64,
    pub failed: u64,
    pub latencies: LatencyHistogram,
}

impl ScriptResult {
    fn from_worker(name: &str, w: &WorkerScriptResult) -> Self {
        Self {
            script_name: name.to_string(),
            rate: w.rate,
            succeeded: w.succeeded,
            failed: w.failed,
            latencies: w.latencies.clone(),
        }
    }

    fn merge(&mut self, w: &WorkerScriptResult) -> Result<()> {
        self.latencies
            .add(&w.latencies)
            .map_err(|source| Error::MergeLatencies {
                script: self.script_name.clone(),
                source,
            })?;
        self.rate += w.rate;
        self.succeeded = self.succeeded.saturating_add(w.succeeded);
        self.failed = self.failed.saturating_add(w.failed);
        Ok(())
    }
}

/// Cumulative result of a run, built by merging [`WorkerResult`]s.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub database_name: String,
    pub scenario: String,
    pub failed_by_error_group: BTreeMap<String, FailureGroup>,
    pub scripts: BTreeMap<String, ScriptResult>,
    window: Option<Duration>,
    window_mismatch: bool,
}

impl RunResult {
    pub fn new(database_name: impl Into<String>, scenario: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            scenario: scenario.into(),
            failed_by_error_group: BTreeMap::new(),
            scripts: BTreeMap::new(),
            window: None,
            window_mismatch: false,
        }
    }

    pub fn total_succeeded(&self) -> u64 {
        self.scripts
            .values()
            .fold(0u64, |n, s| n.saturating_add(s.succeeded))
    }

    pub fn total_failed(&self) -> u64 {
        self.scripts
            .values()
            .fold(0u64, |n, s| n.saturating_add(s.failed))
    }

    pub fn total_rate(&self) -> f64 {
        self.scripts.values().map(|s| s.rate).sum()
    }

    /// Share of failed transactions, in percent.
    pub fn failure_percentage(&self) -> f64 {
        let failed = self.total_failed();
        let total = failed.saturating_add(self.total_succeeded());
        if total == 0 {
            return 0.0;
        }
        100.0 * failed as f64 / total as f64
    }

    /// False once contributions measured over noticeably different windows have
    /// been merged, in which case `total_rate` is not a meaningful sum.
    pub fn rate_windows_consistent(&self) -> bool {
        !self.window_mismatch
    }

    /// Merges one worker's contribution.
    ///
    /// The contribution's histograms are copied, never aliased. Either the whole
    /// contribution is merged or, on error, nothing is.
    pub fn add(&mut self, res: &WorkerResult) -> Result<()> {
        let mut staged = Vec::with_capacity(res.scripts.len());
        for (name, worker_script) in &res.scripts {
            let merged = match self.scripts.get(name) {
                Some(combined) => {
                    let mut next = combined.clone();
                    next.merge(worker_script)?;
                    next
                }
                None => ScriptResult::from_worker(name, worker_script),
            };
            staged.push((name.clone(), merged));
        }
        self.scripts.extend(staged);

        for (name, group) in &res.failed_by_error_group {
            self.failed_by_error_group
                .entry(name.clone())
                .and_modify(|existing| existing.count = existing.count.saturating_add(group.count))
                .or_insert_with(|| group.clone());
        }

        if let Some(window) = res.window {
            self.observe_window(window);
        }

        Ok(())
    }

    fn observe_window(&mut self, window: Duration) {
        let Some(first) = self.window else {
            self.window = Some(window);
            return;
        };

        let a = first.as_secs_f64();
        let b = window.as_secs_f64();
        let diff = (a - b).abs() / a.max(b).max(1e-9);
        if diff > WINDOW_TOLERANCE && !self.window_mismatch {
            self.window_mismatch = true;
            tracing::warn!(
                first_window_ms = first.as_millis() as u64,
                window_ms = window.as_millis() as u64,
                "worker measurement windows differ; summed rates are approximate"
            );
        }
    }
}
