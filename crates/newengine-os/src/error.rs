use thiserror::Error;

use crate::lifecycle::Phase;

pub type HostResult<T> = Result<T, HostError>;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("unavailable: {0}")]
    Unavailable(&'static str),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("index {index} out of range (count {count})")]
    OutOfRange { index: usize, count: usize },

    #[error("can't open: {0}")]
    CantOpen(String),

    #[error("failed: {0}")]
    Failed(String),

    #[error("lifecycle error: {call} expects {expected:?}, host is in {actual:?}")]
    InvalidState {
        call: &'static str,
        expected: Phase,
        actual: Phase,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
