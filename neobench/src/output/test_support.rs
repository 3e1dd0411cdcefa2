use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use neobench_core::{FailureGroup, ProgressReport, RunResult, WorkerResult, WorkerScriptResult};
use neobench_metrics::histogram_from_samples;

use super::{Output, Result};

/// Serializes tests that touch the process-wide metrics listener.
pub(crate) fn listener_guard() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A single-script result with three latency samples (1ms, 2ms, 4ms).
pub(crate) fn sample_result(failed: u64) -> RunResult {
    let latencies = match histogram_from_samples([1_000, 2_000, 4_000]) {
        Ok(h) => h,
        Err(err) => panic!("record failed: {err}"),
    };

    let mut worker = WorkerResult::new().with_script(
        "tx",
        WorkerScriptResult {
            rate: 12.5,
            succeeded: 3,
            failed,
            latencies,
        },
    );
    if failed > 0 {
        worker = worker.with_failure_group(
            "Neo.ClientError.Transaction",
            FailureGroup::new(failed, "transaction timed out"),
        );
    }

    let mut result = RunResult::new("movies", "-w builtin:tpcb-like");
    if let Err(err) = result.add(&worker) {
        panic!("add failed: {err}");
    }
    result
}

/// In-memory writer whose contents stay readable after the renderer takes it.
#[derive(Debug, Clone, Default)]
pub(crate) struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub(crate) fn contents(&self) -> String {
        let inner = self
            .0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        String::from_utf8_lossy(&inner).into_owned()
    }
}

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer that fails every write.
#[derive(Debug, Default)]
pub(crate) struct BrokenPipe;

impl io::Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Records every call as `<label>:<event>` into a shared log.
#[derive(Debug)]
pub(crate) struct Recorder {
    pub(crate) label: &'static str,
    pub(crate) log: Arc<Mutex<Vec<String>>>,
    pub(crate) fail: bool,
}

impl Recorder {
    pub(crate) fn new(label: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label,
            log: log.clone(),
            fail: false,
        }
    }

    #[must_use]
    pub(crate) fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn record(&mut self, event: String) -> Result<()> {
        self.log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(format!("{}:{event}", self.label));
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed").into());
        }
        Ok(())
    }
}

impl Output for Recorder {
    fn benchmark_start(&mut self, database_name: &str, url: &str, scenario: &str) -> Result<()> {
        self.record(format!("start({database_name},{url},{scenario})"))
    }

    fn report_init_progress(&mut self, report: &ProgressReport) -> Result<()> {
        self.record(format!("init({},{})", report.section, report.step))
    }

    fn report_workload_progress(
        &mut self,
        completeness: f64,
        checkpoint: &RunResult,
    ) -> Result<()> {
        self.record(format!(
            "progress({completeness},{})",
            checkpoint.total_succeeded()
        ))
    }

    fn report_throughput(&mut self, result: &RunResult) -> Result<()> {
        self.record(format!("throughput({})", result.total_succeeded()))
    }

    fn report_latency(&mut self, result: &RunResult) -> Result<()> {
        self.record(format!("latency({})", result.total_succeeded()))
    }

    fn errorf(&mut self, args: std::fmt::Arguments<'_>) -> Result<()> {
        self.record(format!("error({args})"))
    }
}
