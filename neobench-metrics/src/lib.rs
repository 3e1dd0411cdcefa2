pub mod counters;
pub mod error;
pub mod histogram;

pub use counters::{CounterSnapshot, TransactionCounters};
pub use error::{Error, Result};
pub use histogram::{
    LatencyHistogram, LatencySummary, histogram_from_samples, micros_to_ms, new_latency_histogram,
};
