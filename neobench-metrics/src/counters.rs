use std::sync::OnceLock;

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;

use crate::error::Result;

pub const METRIC_PREFIX: &str = "neobench";

/// Cumulative transaction totals as observed at one checkpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub succeeded: u64,
    pub failed: u64,
}

impl CounterSnapshot {
    pub fn new(succeeded: u64, failed: u64) -> Self {
        Self { succeeded, failed }
    }

    /// Growth since `prev`; a total that went backwards contributes nothing.
    pub fn delta_since(self, prev: Option<Self>) -> Self {
        match prev {
            Some(prev) => Self {
                succeeded: self.succeeded.saturating_sub(prev.succeeded),
                failed: self.failed.saturating_sub(prev.failed),
            },
            None => self,
        }
    }
}

/// The two transaction counters exposed on the scrape endpoint.
#[derive(Debug)]
pub struct TransactionCounters {
    registry: Registry,
    succeeded: Counter,
    failed: Counter,
}

impl Default for TransactionCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionCounters {
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix(METRIC_PREFIX);
        let succeeded = Counter::default();
        let failed = Counter::default();

        // The text encoder appends `_total` to counter names.
        registry.register(
            "successful_transactions",
            "The total number of successful transactions",
            succeeded.clone(),
        );
        registry.register(
            "failed_transactions",
            "The total number of failed transactions",
            failed.clone(),
        );

        Self {
            registry,
            succeeded,
            failed,
        }
    }

    /// Process-wide counters served by the metrics listener.
    pub fn global() -> &'static TransactionCounters {
        static GLOBAL: OnceLock<TransactionCounters> = OnceLock::new();
        GLOBAL.get_or_init(TransactionCounters::new)
    }

    pub fn add(&self, delta: CounterSnapshot) {
        self.succeeded.inc_by(delta.succeeded);
        self.failed.inc_by(delta.failed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot::new(self.succeeded.get(), self.failed.get())
    }

    /// Renders the counters in the OpenMetrics text exposition format.
    pub fn encode(&self) -> Result<String> {
        let mut out = String::new();
        encode(&mut out, &self.registry)?;
        Ok(out)
    }
}
