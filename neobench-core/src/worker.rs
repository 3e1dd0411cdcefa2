use std::collections::BTreeMap;
use std::time::Duration;

use crate::result::FailureGroup;
use neobench_metrics::LatencyHistogram;

/// One worker's counters for a single script over its contribution window.
#[derive(Debug, Clone)]
pub struct WorkerScriptResult {
    /// Transactions per second, succeeded and failed.
    pub rate: f64,
    pub succeeded: u64,
    pub failed: u64,
    pub latencies: LatencyHistogram,
}

/// The contribution of a single worker, merged into a [`crate::RunResult`].
#[derive(Debug, Clone, Default)]
pub struct WorkerResult {
    pub scripts: BTreeMap<String, WorkerScriptResult>,
    pub failed_by_error_group: BTreeMap<String, FailureGroup>,
    /// Length of the window `rate` was measured over, when the worker knows it.
    pub window: Option<Duration>,
}

impl WorkerResult {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_script(mut self, name: impl Into<String>, script: WorkerScriptResult) -> Self {
        self.scripts.insert(name.into(), script);
        self
    }

    #[must_use]
    pub fn with_failure_group(mut self, name: impl Into<String>, group: FailureGroup) -> Self {
        self.failed_by_error_group.insert(name.into(), group);
        self
    }

    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = Some(window);
        self
    }
}
