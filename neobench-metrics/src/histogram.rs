use hdrhistogram::Histogram;

/// Latency histogram as recorded by workers. Values are microseconds.
pub type LatencyHistogram = Histogram<u64>;

pub fn new_latency_histogram() -> LatencyHistogram {
    // Upper bound: 1 hour in microseconds.
    match Histogram::<u64>::new_with_bounds(1, 3_600_000_000, 3) {
        Ok(h) => h,
        Err(err) => panic!("failed to create histogram: {err}"),
    }
}

/// Builds a histogram from raw microsecond samples. Fails on samples beyond the
/// histogram's upper bound.
pub fn histogram_from_samples(
    samples: impl IntoIterator<Item = u64>,
) -> Result<LatencyHistogram, hdrhistogram::RecordError> {
    let mut h = new_latency_histogram();
    for v in samples {
        h.record(v)?;
    }
    Ok(h)
}

#[inline]
pub fn micros_to_ms(v: f64) -> f64 {
    v / 1000.0
}

/// Statistics read out of a latency histogram, converted to milliseconds.
///
/// An empty histogram summarizes to all zeroes with `count == 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatencySummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stdev: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
    pub p99: f64,
    pub p99999: f64,
    pub count: u64,
}

impl LatencySummary {
    pub fn of(h: &LatencyHistogram) -> Self {
        let count = h.len();
        if count == 0 {
            return Self::default();
        }

        let q = |quantile: f64| micros_to_ms(h.value_at_quantile(quantile) as f64);

        Self {
            min: micros_to_ms(h.min() as f64),
            max: micros_to_ms(h.max() as f64),
            mean: micros_to_ms(h.mean()),
            stdev: micros_to_ms(h.stdev()),
            p25: q(0.25),
            p50: q(0.50),
            p75: q(0.75),
            p95: q(0.95),
            p99: q(0.99),
            p99999: q(0.99999),
            count,
        }
    }

    /// The quantile ladder as `(label, value)` pairs, lowest first.
    pub fn ladder(&self) -> [(&'static str, f64); 7] {
        [
            ("P00.000", self.min),
            ("P25.000", self.p25),
            ("P50.000", self.p50),
            ("P75.000", self.p75),
            ("P95.000", self.p95),
            ("P99.000", self.p99),
            ("P99.999", self.p99999),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_empty_histogram_is_zeroed() {
        let h = new_latency_histogram();
        let s = LatencySummary::of(&h);
        assert_eq!(s, LatencySummary::default());
        assert_eq!(s.count, 0);
    }

    #[test]
    fn summary_converts_micros_to_millis() {
        let h = match histogram_from_samples([1_000, 2_000, 3_000]) {
            Ok(h) => h,
            Err(err) => panic!("record failed: {err}"),
        };

        let s = LatencySummary::of(&h);
        assert_eq!(s.count, 3);
        assert!((s.min - 1.0).abs() < 0.01);
        assert!((s.max - 3.0).abs() < 0.01);
        assert!((s.mean - 2.0).abs() < 0.01);
        assert!((s.p50 - 2.0).abs() < 0.01);
    }

    #[test]
    fn ladder_starts_at_min_and_is_ordered() {
        let h = match histogram_from_samples((1..=1000).map(|v| v * 10)) {
            Ok(h) => h,
            Err(err) => panic!("record failed: {err}"),
        };

        let ladder = LatencySummary::of(&h).ladder();
        assert_eq!(ladder[0].0, "P00.000");
        assert_eq!(ladder[6].0, "P99.999");
        for pair in ladder.windows(2) {
            assert!(pair[0].1 <= pair[1].1, "{pair:?}");
        }
    }

    #[test]
    fn samples_beyond_upper_bound_are_rejected() {
        assert!(histogram_from_samples([u64::MAX]).is_err());
    }
}
