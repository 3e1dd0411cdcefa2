/// Dataset population progress, reported while a workload initializes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressReport {
    pub section: String,
    pub step: String,
    /// Fraction in `[0, 1]`.
    pub completeness: f64,
}

impl ProgressReport {
    pub fn new(section: impl Into<String>, step: impl Into<String>, completeness: f64) -> Self {
        Self {
            section: section.into(),
            step: step.into(),
            completeness,
        }
    }

    /// Whether `other` describes the same (section, step) pair.
    pub fn same_step(&self, other: &ProgressReport) -> bool {
        self.section == other.section && self.step == other.step
    }
}
