pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to merge latencies for script `{script}`: {source}")]
    MergeLatencies {
        script: String,
        #[source]
        source: hdrhistogram::AdditionError,
    },
}
