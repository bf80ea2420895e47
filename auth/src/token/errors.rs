use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("OS entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}
