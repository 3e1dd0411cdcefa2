mod error;
mod progress;
mod result;
mod worker;

pub use error::{Error, Result};
pub use neobench_metrics::{LatencyHistogram, LatencySummary};
pub use progress::ProgressReport;
pub use result::{FailureGroup, RunResult, ScriptResult};
pub use worker::{WorkerResult, WorkerScriptResult};
