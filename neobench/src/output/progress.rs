use std::time::{Duration, Instant};

use neobench_core::ProgressReport;

/// Minimum time between two reports for the same (section, step) pair.
pub(crate) const PROGRESS_INTERVAL: Duration = Duration::from_secs(10);

/// Suppresses repeated init progress lines. Each renderer owns its own instance.
#[derive(Debug, Default)]
pub(crate) struct ProgressThrottle {
    last: Option<(ProgressReport, Instant)>,
}

impl ProgressThrottle {
    pub(crate) fn should_report(&mut self, report: &ProgressReport) -> bool {
        self.should_report_at(report, Instant::now())
    }

    fn should_report_at(&mut self, report: &ProgressReport, now: Instant) -> bool {
        if let Some((last, at)) = &self.last
            && last.same_step(report)
            && now.saturating_duration_since(*at) < PROGRESS_INTERVAL
        {
            return false;
        }

        self.last = Some((report.clone(), now));
        true
    }
}
