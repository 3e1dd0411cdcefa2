pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to encode metrics: {0}")]
    Encode(#[from] std::fmt::Error),
}
