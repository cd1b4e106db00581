use thiserror::Error;

pub type SlidingAverageResult<T> = Result<T, SlidingAverageError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlidingAverageError {
    #[error("Invalid Argument: window radius must be non-negative, got {radius}")]
    InvalidArgument { radius: i64 },
    #[error("Invalid Argument: window radius {radius} is too large for this platform")]
    RadiusOutOfRange { radius: i64 },
}
