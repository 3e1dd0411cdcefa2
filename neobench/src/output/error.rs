use super::OutputMode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "unknown output format: {name}, supported formats are {}",
        OutputMode::supported()
    )]
    UnknownFormat { name: String },

    #[error("metrics listener already running on {current}")]
    MetricsAlreadyListening { current: String },

    #[error("metrics listener needs a running tokio runtime")]
    NoRuntime,
}

impl Error {
    /// Whether the error comes from configuration rather than from the run itself.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::UnknownFormat { .. } | Self::MetricsAlreadyListening { .. }
        )
    }
}
